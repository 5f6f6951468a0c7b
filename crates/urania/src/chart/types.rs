use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aspects::{Aspect, AspectKind, AspectSettings};
use crate::ephemeris::{BodyPosition, CelestialBody, GeoLocation};
use crate::error::ChartWarning;
use crate::houses::{HousePositions, HouseSystem};
use crate::patterns::{Pattern, PatternSettings};
use crate::time::BirthDateTime;
use crate::western::{Element, Modality, ZodiacSign};

/// Options for one chart calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub house_system: HouseSystem,
    pub include_minor_aspects: bool,
    pub calculate_midpoints: bool,
    /// Bodies to place; the South Node is derived from the North Node.
    pub bodies: Vec<CelestialBody>,
    /// Bodies counted in the element and modality tallies.
    pub tally_bodies: Vec<CelestialBody>,
    /// Aspect orb overrides.
    pub orbs: BTreeMap<AspectKind, f64>,
    pub patterns: PatternSettings,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            house_system: HouseSystem::default(),
            include_minor_aspects: false,
            calculate_midpoints: false,
            bodies: CelestialBody::ALL.to_vec(),
            tally_bodies: CelestialBody::INNER.to_vec(),
            orbs: BTreeMap::new(),
            patterns: PatternSettings::default(),
        }
    }
}

impl ChartOptions {
    pub fn aspect_settings(&self) -> AspectSettings {
        AspectSettings {
            include_minor: self.include_minor_aspects,
            orbs: self.orbs.clone(),
        }
    }
}

/// A single calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub date_time: BirthDateTime,
    #[serde(alias = "position")]
    pub location: GeoLocation,
    #[serde(default)]
    pub options: ChartOptions,
}

/// Shorter-arc midpoint of a body pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Midpoint {
    pub body_a: CelestialBody,
    pub body_b: CelestialBody,
    pub longitude: f64,
    pub sign: ZodiacSign,
}

/// Element and modality counts over a chosen set of bodies. Every element
/// and modality is present, with zero when unoccupied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tallies {
    pub bodies: Vec<CelestialBody>,
    pub elements: BTreeMap<Element, usize>,
    pub modalities: BTreeMap<Modality, usize>,
}

impl Tallies {
    pub fn dominant_element(&self) -> Option<Element> {
        dominant(&Element::ALL, &self.elements)
    }

    pub fn dominant_modality(&self) -> Option<Modality> {
        dominant(&Modality::ALL, &self.modalities)
    }
}

/// Highest count, ties going to the earlier entry of `order`.
fn dominant<K: Ord + Copy>(order: &[K], counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for &key in order {
        let count = counts.get(&key).copied().unwrap_or(0);
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map(|(key, _)| key)
}

/// The complete birth chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthChart {
    pub julian_day: f64,
    pub utc: NaiveDateTime,
    pub time_zone: Option<String>,
    pub utc_offset_seconds: i32,
    pub location: GeoLocation,
    /// Name of the ephemeris backend that produced the positions.
    pub ephemeris: String,
    /// Positions in body catalog order.
    pub positions: Vec<BodyPosition>,
    pub houses: HousePositions,
    pub house_placements: BTreeMap<CelestialBody, u8>,
    pub aspects: Vec<Aspect>,
    pub patterns: Vec<Pattern>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub midpoints: Vec<Midpoint>,
    pub tallies: Tallies,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<ChartWarning>,
}

/// Natal-to-sky aspects at one instant, with any bodies the sky was missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitAspects {
    pub julian_day: f64,
    pub aspects: Vec<Aspect>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<ChartWarning>,
}

/// Small projection for prose generation and profile records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub sun_sign: Option<ZodiacSign>,
    pub moon_sign: Option<ZodiacSign>,
    pub ascendant_sign: ZodiacSign,
    /// Tightest aspects first.
    pub top_aspects: Vec<Aspect>,
    /// Largest aspect patterns first; distribution shapes are reported separately.
    pub top_patterns: Vec<Pattern>,
    pub shape: Option<Pattern>,
    pub dominant_element: Option<Element>,
    pub dominant_modality: Option<Modality>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_position_alias() {
        let json = r#"{
            "date_time": {"year": 1990, "month": 6, "day": 15, "hour": 14, "minute": 30},
            "position": {"latitude": 40.7128, "longitude": -74.006}
        }"#;
        let request: ChartRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.date_time.second, 0);
        assert_eq!(request.location.lat, 40.7128);
        assert_eq!(request.options, ChartOptions::default());
    }

    #[test]
    fn test_dominant_ties_go_to_catalog_order() {
        let counts = BTreeMap::from([(Element::Water, 2), (Element::Air, 2), (Element::Fire, 1)]);
        assert_eq!(dominant(&Element::ALL, &counts), Some(Element::Air));
        assert_eq!(dominant(&Element::ALL, &BTreeMap::new()), None);
    }
}
