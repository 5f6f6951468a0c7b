//! Whole-chart distribution shapes (Jones patterns).
//!
//! These look at how the bodies spread around the circle rather than at
//! pairwise aspects. At most one shape is reported, checked from the most
//! to the least concentrated.

use std::collections::BTreeSet;

use crate::angles::forward_arc;
use crate::ephemeris::BodyPosition;
use crate::houses::assign_house;
use crate::patterns::types::{Pattern, PatternKind, ShapeThresholds};
use crate::western::sign_index;

/// Empty arc following each body, in longitude order.
struct Spread {
    gaps: Vec<f64>,
}

impl Spread {
    fn new(bodies: &[BodyPosition]) -> Self {
        let mut lons: Vec<f64> = bodies.iter().map(|b| b.longitude).collect();
        lons.sort_by(|a, b| a.total_cmp(b));
        let n = lons.len();
        let gaps = (0..n).map(|i| forward_arc(lons[i], lons[(i + 1) % n])).collect();
        Self { gaps }
    }

    fn largest_gap(&self) -> f64 {
        self.gaps.iter().copied().fold(0.0, f64::max)
    }

    /// Smallest arc containing every body.
    fn span(&self) -> f64 {
        360.0 - self.largest_gap()
    }

    /// A single body flanked by two wide gaps, with everything else inside a bowl.
    fn has_handle(&self, min_gap: f64, bowl_max_span: f64) -> bool {
        let n = self.gaps.len();
        (0..n).any(|i| {
            let before = self.gaps[(i + n - 1) % n];
            let after = self.gaps[i];
            before >= min_gap && after >= min_gap && 360.0 - (before + after) <= bowl_max_span
        })
    }

    fn gaps_at_least(&self, min_gap: f64) -> usize {
        self.gaps.iter().filter(|&&g| g >= min_gap).count()
    }
}

/// Classify the spread of `bodies`, or `None` when no shape applies.
pub fn classify_distribution(
    bodies: &[BodyPosition],
    cusps: Option<&[f64]>,
    thresholds: &ShapeThresholds,
) -> Option<Pattern> {
    if bodies.len() < thresholds.min_bodies.max(2) {
        return None;
    }

    let spread = Spread::new(bodies);
    let span = spread.span();

    let kind = if span <= thresholds.bundle_max_span {
        PatternKind::Bundle
    } else if span <= thresholds.bowl_max_span {
        PatternKind::Bowl
    } else if spread.has_handle(thresholds.bucket_handle_gap, thresholds.bowl_max_span) {
        PatternKind::Bucket
    } else if spread.largest_gap() >= thresholds.locomotive_min_gap {
        PatternKind::Locomotive
    } else if spread.gaps_at_least(thresholds.seesaw_min_gap) >= 2 {
        PatternKind::Seesaw
    } else if occupied(bodies, cusps) >= thresholds.splash_min_occupied {
        PatternKind::Splash
    } else {
        return None;
    };

    Some(Pattern::new(kind, bodies.iter().map(|b| b.body).collect()))
}

/// Distinct houses occupied, or distinct signs without cusps.
fn occupied(bodies: &[BodyPosition], cusps: Option<&[f64]>) -> usize {
    let slots: BTreeSet<usize> = match cusps {
        Some(cusps) if cusps.len() == 12 => bodies
            .iter()
            .map(|b| assign_house(b.longitude, cusps) as usize)
            .collect(),
        _ => bodies.iter().map(|b| sign_index(b.longitude)).collect(),
    };
    slots.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::CelestialBody;

    fn shape(lons: &[f64]) -> Option<PatternKind> {
        let bodies: Vec<BodyPosition> = lons
            .iter()
            .zip(CelestialBody::ALL.iter())
            .map(|(&lon, &body)| BodyPosition::at_longitude(body, lon))
            .collect();
        classify_distribution(&bodies, None, &ShapeThresholds::default()).map(|p| p.name)
    }

    #[test]
    fn test_bundle_and_bowl() {
        assert_eq!(shape(&[350.0, 0.0, 20.0, 40.0, 60.0, 80.0, 100.0]), Some(PatternKind::Bundle));
        assert_eq!(shape(&[0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 175.0]), Some(PatternKind::Bowl));
    }

    #[test]
    fn test_bucket_handle() {
        // Bowl over 0-150 plus a lone body at 260
        assert_eq!(
            shape(&[0.0, 25.0, 50.0, 75.0, 100.0, 125.0, 150.0, 260.0]),
            Some(PatternKind::Bucket)
        );
    }

    #[test]
    fn test_locomotive() {
        // Even spread over 220 degrees: one 140 degree gap
        assert_eq!(
            shape(&[0.0, 36.0, 72.0, 110.0, 146.0, 183.0, 220.0]),
            Some(PatternKind::Locomotive)
        );
    }

    #[test]
    fn test_seesaw() {
        // Two groups with 90 and 95 degree empty arcs between them
        assert_eq!(
            shape(&[0.0, 20.0, 40.0, 60.0, 80.0, 175.0, 200.0, 225.0, 250.0, 270.0]),
            Some(PatternKind::Seesaw)
        );
    }

    #[test]
    fn test_splash() {
        let lons: Vec<f64> = (0..10).map(|i| 5.0 + 36.0 * i as f64).collect();
        assert_eq!(shape(&lons), Some(PatternKind::Splash));
    }

    #[test]
    fn test_too_few_bodies() {
        assert_eq!(shape(&[0.0, 10.0, 20.0]), None);
    }
}
