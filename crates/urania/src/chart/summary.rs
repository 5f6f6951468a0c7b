//! Read-only views derived from a finished chart.

use std::collections::BTreeMap;

use crate::aspects::Aspect;
use crate::chart::types::{BirthChart, ChartSummary};
use crate::ephemeris::{BodyPosition, CelestialBody};
use crate::patterns::Pattern;
use crate::western::ZodiacSign;

impl BirthChart {
    pub fn position(&self, body: CelestialBody) -> Option<&BodyPosition> {
        self.positions.iter().find(|p| p.body == body)
    }

    pub fn house_of(&self, body: CelestialBody) -> Option<u8> {
        self.house_placements.get(&body).copied()
    }

    /// Bodies in each house 1-12, every house present.
    pub fn house_occupancy(&self) -> BTreeMap<u8, Vec<CelestialBody>> {
        let mut occupancy: BTreeMap<u8, Vec<CelestialBody>> = (1..=12).map(|h| (h, Vec::new())).collect();
        for (&body, &house) in &self.house_placements {
            occupancy.entry(house).or_default().push(body);
        }
        occupancy
    }

    pub fn bodies_in_house(&self, house: u8) -> Vec<CelestialBody> {
        self.house_placements
            .iter()
            .filter(|&(_, &h)| h == house)
            .map(|(&body, _)| body)
            .collect()
    }

    pub fn aspects_for(&self, body: CelestialBody) -> Vec<&Aspect> {
        self.aspects.iter().filter(|a| a.involves(body)).collect()
    }

    /// Aspect list per body; bodies without aspects map to an empty list.
    pub fn aspects_by_body(&self) -> BTreeMap<CelestialBody, Vec<&Aspect>> {
        self.positions
            .iter()
            .map(|p| (p.body, self.aspects_for(p.body)))
            .collect()
    }

    pub fn patterns_with(&self, body: CelestialBody) -> Vec<&Pattern> {
        self.patterns.iter().filter(|p| p.bodies.contains(&body)).collect()
    }

    /// Sun, Moon and Ascendant signs plus the `n` most significant aspects and patterns.
    ///
    /// Aspects rank by orb (tightest first) and patterns by number of bodies
    /// (largest first); ties keep chart order.
    pub fn summary(&self, n: usize) -> ChartSummary {
        let mut aspects: Vec<&Aspect> = self.aspects.iter().collect();
        aspects.sort_by(|a, b| a.orb.total_cmp(&b.orb));

        let mut patterns: Vec<&Pattern> = self
            .patterns
            .iter()
            .filter(|p| !p.name.is_distribution_shape())
            .collect();
        patterns.sort_by(|a, b| b.arity().cmp(&a.arity()));

        ChartSummary {
            sun_sign: self.position(CelestialBody::Sun).map(|p| p.sign),
            moon_sign: self.position(CelestialBody::Moon).map(|p| p.sign),
            ascendant_sign: ZodiacSign::from_longitude(self.houses.ascendant),
            top_aspects: aspects.into_iter().take(n).cloned().collect(),
            top_patterns: patterns.into_iter().take(n).cloned().collect(),
            shape: self
                .patterns
                .iter()
                .find(|p| p.name.is_distribution_shape())
                .cloned(),
            dominant_element: self.tallies.dominant_element(),
            dominant_modality: self.tallies.dominant_modality(),
        }
    }
}
