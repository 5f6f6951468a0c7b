use std::collections::BTreeMap;

use approx::assert_abs_diff_eq;
use urania::aspects::{is_applying, AspectCalculator, AspectKind, AspectSettings};
use urania::ephemeris::{BodyPosition, CelestialBody};

fn positions(entries: &[(CelestialBody, f64, f64)]) -> BTreeMap<CelestialBody, BodyPosition> {
    entries
        .iter()
        .map(|&(body, lon, speed)| (body, BodyPosition::new(body, lon, 0.0, 1.0, speed)))
        .collect()
}

#[test]
fn test_square_at_ten_and_hundred() {
    let calculator = AspectCalculator::default();
    let aspects = calculator.aspects(&positions(&[
        (CelestialBody::Sun, 10.0, 1.0),
        (CelestialBody::Moon, 100.0, 13.0),
    ]));

    assert_eq!(aspects.len(), 1);
    let aspect = &aspects[0];
    assert_eq!(aspect.kind, AspectKind::Square);
    assert_eq!(aspect.exact_angle, 90.0);
    assert_abs_diff_eq!(aspect.measured_angle, 90.0, epsilon = 1e-12);
    assert_abs_diff_eq!(aspect.orb, 0.0, epsilon = 1e-12);
}

#[test]
fn test_separation_uses_shorter_arc() {
    let calculator = AspectCalculator::default();
    let aspects = calculator.aspects(&positions(&[
        (CelestialBody::Venus, 355.0, 1.2),
        (CelestialBody::Mars, 3.0, 0.6),
    ]));
    assert_eq!(aspects.len(), 1);
    assert_eq!(aspects[0].kind, AspectKind::Conjunction);
    assert_abs_diff_eq!(aspects[0].measured_angle, 8.0, epsilon = 1e-9);
}

#[test]
fn test_one_aspect_per_pair() {
    let calculator = AspectCalculator::new(&AspectSettings::with_minor());
    let mut lon = 0.0;
    while lon < 360.0 {
        let set = positions(&[(CelestialBody::Sun, 0.0, 1.0), (CelestialBody::Moon, lon, 13.0)]);
        let aspects = calculator.aspects(&set);
        assert!(aspects.len() <= 1, "pair at {lon} matched {} aspects", aspects.len());
        if let Some(aspect) = aspects.first() {
            assert!(aspect.orb <= calculator
                .catalog()
                .iter()
                .find(|d| d.kind == aspect.kind)
                .map(|d| d.orb)
                .unwrap());
        }
        lon += 0.5;
    }
}

#[test]
fn test_orb_and_exact_flags() {
    let calculator = AspectCalculator::default();
    let aspects = calculator.aspects(&positions(&[
        (CelestialBody::Sun, 0.0, 1.0),
        (CelestialBody::Jupiter, 120.05, -0.1),
        (CelestialBody::Saturn, 184.0, 0.05),
    ]));

    let trine = aspects
        .iter()
        .find(|a| a.kind == AspectKind::Trine && a.involves(CelestialBody::Jupiter) && a.involves(CelestialBody::Sun))
        .unwrap();
    assert!(trine.exact);
    assert!(trine.retrograde);

    let opposition = aspects
        .iter()
        .find(|a| a.kind == AspectKind::Opposition)
        .unwrap();
    assert_eq!(opposition.partner(CelestialBody::Sun), Some(CelestialBody::Saturn));
    assert_abs_diff_eq!(opposition.orb, 4.0, epsilon = 1e-9);
    assert!(!opposition.exact);
}

#[test]
fn test_pairs_follow_body_catalog_order() {
    let calculator = AspectCalculator::default();
    let aspects = calculator.aspects(&positions(&[
        (CelestialBody::Mars, 0.0, 0.5),
        (CelestialBody::Sun, 120.0, 1.0),
        (CelestialBody::Moon, 240.0, 13.0),
    ]));
    let pairs: Vec<(CelestialBody, CelestialBody)> = aspects.iter().map(|a| (a.body_a, a.body_b)).collect();
    assert_eq!(
        pairs,
        vec![
            (CelestialBody::Sun, CelestialBody::Moon),
            (CelestialBody::Sun, CelestialBody::Mars),
            (CelestialBody::Moon, CelestialBody::Mars),
        ]
    );
}

#[test]
fn test_applying_is_pure() {
    for _ in 0..3 {
        assert!(is_applying(52.0, 0.0, 1.5, 0.5, 60.0));
        assert!(!is_applying(62.0, 0.0, 1.5, 0.5, 60.0));
    }
}
