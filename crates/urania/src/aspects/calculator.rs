use log::debug;
use std::collections::BTreeMap;

use crate::angles::{separation, signed_difference};
use crate::aspects::types::{Aspect, AspectDefinition, AspectSettings};
use crate::ephemeris::{BodyPosition, CelestialBody};

/// Orb below which an aspect counts as exact.
const EXACT_ORB: f64 = 0.1;

/// Look-ahead used to decide whether an aspect is closing, in days.
const APPLYING_TIME_STEP: f64 = 0.1;

/// Aspect calculator
#[derive(Debug, Clone)]
pub struct AspectCalculator {
    catalog: Vec<AspectDefinition>,
}

impl AspectCalculator {
    pub fn new(settings: &AspectSettings) -> Self {
        Self {
            catalog: settings.catalog(),
        }
    }

    pub fn catalog(&self) -> &[AspectDefinition] {
        &self.catalog
    }

    /// Aspects between every unordered pair of bodies in `positions`,
    /// in body catalog order.
    pub fn aspects(&self, positions: &BTreeMap<CelestialBody, BodyPosition>) -> Vec<Aspect> {
        let bodies: Vec<&BodyPosition> = positions.values().collect();
        let mut aspects = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if let Some(aspect) = self.calculate_aspect(bodies[i], bodies[j]) {
                    aspects.push(aspect);
                }
            }
        }
        debug!(
            "{} aspects among {} bodies ({} catalog entries)",
            aspects.len(),
            bodies.len(),
            self.catalog.len()
        );
        aspects
    }

    /// Aspects from each body of one chart to each body of another
    /// (natal against transit). `body_a` always comes from `first`.
    pub fn cross_aspects(
        &self,
        first: &BTreeMap<CelestialBody, BodyPosition>,
        second: &BTreeMap<CelestialBody, BodyPosition>,
    ) -> Vec<Aspect> {
        first
            .values()
            .flat_map(|a| second.values().filter_map(move |b| self.calculate_aspect(a, b)))
            .collect()
    }

    /// First catalog entry matched by the pair, if any.
    pub fn calculate_aspect(&self, a: &BodyPosition, b: &BodyPosition) -> Option<Aspect> {
        let measured = separation(a.longitude, b.longitude);
        let definition = self
            .catalog
            .iter()
            .find(|def| (measured - def.angle).abs() <= def.orb)?;
        let orb = (measured - definition.angle).abs();

        Some(Aspect {
            body_a: a.body,
            body_b: b.body,
            kind: definition.kind,
            exact_angle: definition.angle,
            measured_angle: measured,
            orb,
            applying: is_applying(
                a.longitude,
                b.longitude,
                a.longitude_speed,
                b.longitude_speed,
                definition.angle,
            ),
            exact: orb < EXACT_ORB,
            retrograde: a.retrograde || b.retrograde,
        })
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new(&AspectSettings::default())
    }
}

/// Whether two bodies are moving toward the exact `aspect_angle`.
///
/// Projects both longitudes a short step forward with their current speeds
/// and compares the distance from exact before and after. Pairs with no
/// relative motion are never applying.
pub fn is_applying(lon1: f64, lon2: f64, speed1: f64, speed2: f64, aspect_angle: f64) -> bool {
    let relative_speed = speed1 - speed2;
    if relative_speed.abs() < 1e-9 {
        return false;
    }

    let current = signed_difference(lon1, lon2);
    let future = signed_difference(current + relative_speed * APPLYING_TIME_STEP, 0.0);

    let current_distance = (current.abs() - aspect_angle).abs();
    let future_distance = (future.abs() - aspect_angle).abs();
    future_distance < current_distance
}
