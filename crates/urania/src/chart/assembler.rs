//! Joins positions, houses, aspects and patterns into one chart.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::angles::shorter_arc_midpoint;
use crate::aspects::AspectCalculator;
use crate::chart::types::{BirthChart, ChartOptions, ChartRequest, Midpoint, Tallies, TransitAspects};
use crate::ephemeris::{BodyPosition, CelestialBody, GeoLocation, PositionProvider};
use crate::error::{require_finite, ChartError};
use crate::houses::calculate_houses_with_fallback;
use crate::patterns::{detect_patterns, PatternDetector};
use crate::time::{julian_day_to_civil, NormalizedInstant, TimeNormalizer};
use crate::western::{Element, Modality, ZodiacSign};

/// Chart engine: a position backend chosen at startup plus the time normalizer.
///
/// Holds no per-chart state; one engine can serve concurrent requests.
pub struct ChartEngine {
    provider: Box<dyn PositionProvider>,
    normalizer: TimeNormalizer,
}

impl ChartEngine {
    pub fn new(provider: Box<dyn PositionProvider>, normalizer: TimeNormalizer) -> Self {
        Self {
            provider,
            normalizer,
        }
    }

    /// Engine with the geographic time-zone lookup.
    pub fn with_provider(provider: Box<dyn PositionProvider>) -> Self {
        Self::new(provider, TimeNormalizer::default())
    }

    pub fn provider(&self) -> &dyn PositionProvider {
        self.provider.as_ref()
    }

    pub fn normalizer(&self) -> &TimeNormalizer {
        &self.normalizer
    }

    /// Calculate a birth chart. Either the whole chart is returned or an error.
    pub fn calculate(&self, request: &ChartRequest) -> Result<BirthChart, ChartError> {
        let instant = self.normalizer.normalize(&request.date_time, &request.location)?;
        info!(
            "Calculating chart for {} UTC (JD {:.6}) at ({}, {})",
            instant.utc, instant.julian_day, request.location.lat, request.location.lon
        );
        self.assemble(instant, &request.location, &request.options)
    }

    /// Chart for an instant already on the UT scale (transits, progressions).
    pub fn calculate_at(
        &self,
        julian_day: f64,
        location: &GeoLocation,
        options: &ChartOptions,
    ) -> Result<BirthChart, ChartError> {
        let julian_day = require_finite("julian_day", julian_day)?;
        let instant = NormalizedInstant {
            julian_day,
            utc: julian_day_to_civil(julian_day)?,
            zone: None,
            utc_offset_seconds: 0,
            warning: None,
        };
        self.assemble(instant, location, options)
    }

    /// Aspects from the natal bodies to the sky at `julian_day`. Transit
    /// bodies the backend could not place are reported as warnings.
    pub fn transit_aspects(
        &self,
        natal: &BirthChart,
        julian_day: f64,
        options: &ChartOptions,
    ) -> Result<TransitAspects, ChartError> {
        let julian_day = require_finite("julian_day", julian_day)?;
        let transit = self.provider.positions(julian_day, &options.bodies)?;
        let natal_positions: BTreeMap<CelestialBody, BodyPosition> = natal
            .positions
            .iter()
            .map(|p| (p.body, p.clone()))
            .collect();
        let aspects = AspectCalculator::new(&options.aspect_settings())
            .cross_aspects(&natal_positions, &transit.positions);
        Ok(TransitAspects {
            julian_day,
            aspects,
            warnings: transit.warnings,
        })
    }

    fn assemble(
        &self,
        instant: NormalizedInstant,
        location: &GeoLocation,
        options: &ChartOptions,
    ) -> Result<BirthChart, ChartError> {
        let julian_day = instant.julian_day;

        let (houses, house_warning) =
            calculate_houses_with_fallback(julian_day, location, options.house_system)?;
        let set = self.provider.positions(julian_day, &options.bodies)?;

        let house_placements: BTreeMap<CelestialBody, u8> = set
            .positions
            .values()
            .map(|p| (p.body, houses.house_of(p.longitude)))
            .collect();

        let aspect_settings = options.aspect_settings();
        let aspects = AspectCalculator::new(&aspect_settings).aspects(&set.positions);

        let positions: Vec<BodyPosition> = set.positions.values().cloned().collect();
        let cusps: Vec<f64> = houses.cusps.iter().map(|c| c.longitude).collect();
        let detector = PatternDetector::new(&options.patterns, &aspect_settings);
        let patterns = detect_patterns(&set.positions, Some(cusps.as_slice()), &detector);

        let midpoints = if options.calculate_midpoints {
            midpoints(&positions)
        } else {
            Vec::new()
        };

        let tallies = tally(&set.positions, &options.tally_bodies);

        let mut warnings: Vec<_> = instant.warning.into_iter().chain(house_warning).collect();
        warnings.extend(set.warnings);

        debug!(
            "Chart assembled: {} bodies, {} aspects, {} patterns, {} warnings",
            positions.len(),
            aspects.len(),
            patterns.len(),
            warnings.len()
        );

        Ok(BirthChart {
            julian_day,
            utc: instant.utc,
            time_zone: instant.zone,
            utc_offset_seconds: instant.utc_offset_seconds,
            location: *location,
            ephemeris: self.provider.name().to_string(),
            positions,
            houses,
            house_placements,
            aspects,
            patterns,
            midpoints,
            tallies,
            warnings,
        })
    }
}

/// Shorter-arc midpoint of every body pair, in body catalog order.
pub fn midpoints(positions: &[BodyPosition]) -> Vec<Midpoint> {
    let mut out = Vec::new();
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            let longitude = shorter_arc_midpoint(a.longitude, b.longitude);
            out.push(Midpoint {
                body_a: a.body,
                body_b: b.body,
                longitude,
                sign: ZodiacSign::from_longitude(longitude),
            });
        }
    }
    out
}

/// Element and modality counts over the `bodies` that have a position.
pub fn tally(positions: &BTreeMap<CelestialBody, BodyPosition>, bodies: &[CelestialBody]) -> Tallies {
    let mut elements: BTreeMap<Element, usize> = Element::ALL.iter().map(|&e| (e, 0)).collect();
    let mut modalities: BTreeMap<Modality, usize> = Modality::ALL.iter().map(|&m| (m, 0)).collect();
    let mut counted = Vec::new();

    for body in bodies {
        if counted.contains(body) {
            continue;
        }
        if let Some(pos) = positions.get(body) {
            *elements.entry(pos.sign.element()).or_insert(0) += 1;
            *modalities.entry(pos.sign.modality()).or_insert(0) += 1;
            counted.push(*body);
        }
    }

    Tallies {
        bodies: counted,
        elements,
        modalities,
    }
}
