use std::collections::BTreeMap;

use urania::aspects::AspectKind;
use urania::chart::{ChartEngine, ChartOptions, ChartRequest};
use urania::ephemeris::{AnalyticEphemeris, BodyPosition, CelestialBody, GeoLocation, PositionProvider};
use urania::houses::HouseSystem;
use urania::patterns::PatternKind;
use urania::time::FixedZoneResolver;
use urania::western::{Element, Modality, ZodiacSign};
use urania::{BirthDateTime, ChartError, ChartWarning, TimeNormalizer};

const NEW_YORK: GeoLocation = GeoLocation { lat: 40.7128, lon: -74.0060 };

/// Fixed longitudes for the five essential bodies; everything else is unavailable.
struct FixedSky {
    longitudes: BTreeMap<CelestialBody, f64>,
}

impl FixedSky {
    fn kite() -> Self {
        Self {
            longitudes: BTreeMap::from([
                (CelestialBody::Sun, 0.0),
                (CelestialBody::Moon, 120.0),
                (CelestialBody::Mercury, 240.0),
                (CelestialBody::Venus, 180.0),
                (CelestialBody::Mars, 300.0),
            ]),
        }
    }
}

impl PositionProvider for FixedSky {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn position(&self, body: CelestialBody, _julian_day: f64) -> Result<BodyPosition, ChartError> {
        self.longitudes
            .get(&body)
            .map(|&lon| BodyPosition::new(body, lon, 0.0, 1.0, 0.5))
            .ok_or_else(|| ChartError::EphemerisUnavailable {
                message: format!("{body} is not in the fixed sky"),
            })
    }
}

fn new_york_engine(provider: Box<dyn PositionProvider>) -> ChartEngine {
    ChartEngine::new(
        provider,
        TimeNormalizer::new(Box::new(FixedZoneResolver(chrono_tz::America::New_York))),
    )
}

fn essential_options() -> ChartOptions {
    ChartOptions {
        bodies: CelestialBody::ESSENTIAL.to_vec(),
        ..ChartOptions::default()
    }
}

fn request() -> ChartRequest {
    ChartRequest {
        date_time: BirthDateTime::new(1990, 6, 15, 14, 30, 0),
        location: NEW_YORK,
        options: ChartOptions::default(),
    }
}

#[test]
fn test_fixed_sky_chart() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let chart = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();

    assert_eq!(chart.ephemeris, "fixed");
    let bodies: Vec<CelestialBody> = chart.positions.iter().map(|p| p.body).collect();
    assert_eq!(bodies, CelestialBody::ESSENTIAL.to_vec());
    assert!(chart.warnings.is_empty());

    // Every pair of these five longitudes sits on an exact major aspect
    assert_eq!(chart.aspects.len(), 10);
    assert!(chart.aspects.iter().all(|a| a.exact && a.orb < 1e-9));

    let kinds: Vec<PatternKind> = chart.patterns.iter().map(|p| p.name).collect();
    assert!(kinds.contains(&PatternKind::GrandTrine));
    assert!(kinds.contains(&PatternKind::Kite));
    assert!(!kinds.contains(&PatternKind::TSquare));

    assert_eq!(chart.tallies.elements[&Element::Fire], 3);
    assert_eq!(chart.tallies.elements[&Element::Air], 2);
    assert_eq!(chart.tallies.dominant_element(), Some(Element::Fire));
    assert_eq!(chart.tallies.dominant_modality(), Some(Modality::Cardinal));
}

#[test]
fn test_house_views_agree() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let chart = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();

    let occupancy = chart.house_occupancy();
    assert_eq!(occupancy.len(), 12);
    let placed: usize = occupancy.values().map(Vec::len).sum();
    assert_eq!(placed, chart.positions.len());

    for position in &chart.positions {
        let house = chart.house_of(position.body).unwrap();
        assert!((1..=12).contains(&house));
        assert_eq!(house, chart.houses.house_of(position.longitude));
        assert!(chart.bodies_in_house(house).contains(&position.body));
    }
}

#[test]
fn test_aspect_and_pattern_views() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let chart = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();

    let by_body = chart.aspects_by_body();
    assert_eq!(by_body.len(), 5);
    // Each body aspects the other four
    assert!(by_body.values().all(|list| list.len() == 4));

    let sun_patterns = chart.patterns_with(CelestialBody::Sun);
    assert!(sun_patterns.iter().all(|p| p.bodies.contains(&CelestialBody::Sun)));
    assert!(!sun_patterns.is_empty());
}

#[test]
fn test_summary() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let chart = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();
    let summary = chart.summary(3);

    assert_eq!(summary.sun_sign, Some(ZodiacSign::Aries));
    assert_eq!(summary.moon_sign, Some(ZodiacSign::Leo));
    assert_eq!(summary.ascendant_sign, ZodiacSign::from_longitude(chart.houses.ascendant));
    assert_eq!(summary.top_aspects.len(), 3);
    assert!(summary.top_patterns.len() <= 3);
    assert!(summary
        .top_patterns
        .windows(2)
        .all(|w| w[0].arity() >= w[1].arity()));
    // Five bodies are too few for a distribution shape
    assert!(summary.shape.is_none());
    assert_eq!(summary.dominant_element, Some(Element::Fire));
}

#[test]
fn test_missing_essential_body_fails_the_chart() {
    let mut sky = FixedSky::kite();
    sky.longitudes.remove(&CelestialBody::Venus);
    let engine = new_york_engine(Box::new(sky));
    let err = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap_err();
    assert!(matches!(
        err,
        ChartError::MissingEssentialBody {
            body: CelestialBody::Venus,
            ..
        }
    ));
}

#[test]
fn test_analytic_chart() {
    let engine = new_york_engine(Box::new(AnalyticEphemeris::new()));
    let chart = engine.calculate(&request()).unwrap();

    assert_eq!(chart.ephemeris, "analytic");
    assert_eq!(chart.time_zone.as_deref(), Some("America/New_York"));
    assert_eq!(chart.utc_offset_seconds, -4 * 3600);
    assert_eq!(chart.houses.system, HouseSystem::Placidus);
    assert_eq!(chart.houses.cusps.len(), 12);

    // Chiron has no analytic theory; it is omitted with a warning
    assert_eq!(chart.positions.len(), CelestialBody::ALL.len() - 1);
    assert!(chart.position(CelestialBody::Chiron).is_none());
    assert!(chart.warnings.iter().any(|w| matches!(
        w,
        ChartWarning::BodyOmitted {
            body: CelestialBody::Chiron,
            ..
        }
    )));

    for position in &chart.positions {
        assert!((0.0..360.0).contains(&position.longitude), "{}", position.body);
    }
    assert_eq!(chart.position(CelestialBody::Sun).unwrap().sign, ZodiacSign::Gemini);

    let north = chart.position(CelestialBody::NorthNode).unwrap().longitude;
    let south = chart.position(CelestialBody::SouthNode).unwrap().longitude;
    assert!((urania::angles::separation(north, south) - 180.0).abs() < 1e-9);

    for aspect in &chart.aspects {
        assert!(aspect.orb >= 0.0);
        assert!(aspect.body_a < aspect.body_b);
    }
}

#[test]
fn test_same_input_same_chart() {
    let engine = new_york_engine(Box::new(AnalyticEphemeris::new()));
    let first = serde_json::to_string(&engine.calculate(&request()).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.calculate(&request()).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_latitude_rejected() {
    let engine = new_york_engine(Box::new(AnalyticEphemeris::new()));
    let mut bad = request();
    bad.location.lat = 91.0;
    let err = engine.calculate(&bad).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_midpoints_on_request() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let options = ChartOptions {
        calculate_midpoints: true,
        ..essential_options()
    };
    let chart = engine.calculate_at(2_448_058.27, &NEW_YORK, &options).unwrap();
    assert_eq!(chart.midpoints.len(), 10);
    let sun_moon = &chart.midpoints[0];
    assert_eq!((sun_moon.body_a, sun_moon.body_b), (CelestialBody::Sun, CelestialBody::Moon));
    assert!((sun_moon.longitude - 60.0).abs() < 1e-9);

    let without = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();
    assert!(without.midpoints.is_empty());
}

#[test]
fn test_transits_against_the_same_instant() {
    let engine = new_york_engine(Box::new(AnalyticEphemeris::new()));
    let options = ChartOptions {
        bodies: CelestialBody::PLANETS.to_vec(),
        ..ChartOptions::default()
    };
    let natal = engine.calculate_at(2_451_545.0, &NEW_YORK, &options).unwrap();
    let transits = engine.transit_aspects(&natal, 2_451_545.0, &options).unwrap();
    for body in CelestialBody::PLANETS {
        assert!(
            transits
                .aspects
                .iter()
                .any(|a| a.body_a == body && a.body_b == body && a.kind == AspectKind::Conjunction && a.exact),
            "{body} should conjoin itself"
        );
    }
    assert_eq!(transits.julian_day, 2_451_545.0);
    assert!(transits.warnings.is_empty());
}

#[test]
fn test_transit_warnings_reach_the_caller() {
    let engine = new_york_engine(Box::new(FixedSky::kite()));
    let natal = engine
        .calculate_at(2_448_058.27, &NEW_YORK, &essential_options())
        .unwrap();
    let mut options = essential_options();
    options.bodies.push(CelestialBody::Jupiter);

    let transits = engine.transit_aspects(&natal, 2_448_100.0, &options).unwrap();
    assert!(!transits.aspects.is_empty());
    assert_eq!(transits.warnings.len(), 1);
    assert!(matches!(
        transits.warnings[0],
        ChartWarning::BodyOmitted {
            body: CelestialBody::Jupiter,
            ..
        }
    ));
}

#[test]
fn test_default_options_work_inside_the_arctic_circle() {
    let tromso = GeoLocation { lat: 69.65, lon: 18.96 };
    let engine = ChartEngine::new(
        Box::new(AnalyticEphemeris::new()),
        TimeNormalizer::new(Box::new(FixedZoneResolver(chrono_tz::Europe::Oslo))),
    );
    let options = ChartOptions::default();
    let mut fallbacks = 0;
    for hour in 0..24 {
        let chart = engine
            .calculate_at(2_448_057.5 + hour as f64 / 24.0, &tromso, &options)
            .unwrap();
        let fell_back = chart.warnings.iter().any(|w| {
            matches!(
                w,
                ChartWarning::HouseSystemFallback {
                    requested: HouseSystem::Placidus,
                    used: HouseSystem::Porphyry,
                    ..
                }
            )
        });
        if fell_back {
            fallbacks += 1;
            assert_eq!(chart.houses.system, HouseSystem::Porphyry);
        } else {
            assert_eq!(chart.houses.system, HouseSystem::Placidus);
        }
        assert_eq!(chart.houses.cusps.len(), 12);
    }
    assert!(fallbacks > 0);

    let birth = ChartRequest {
        date_time: BirthDateTime::new(1990, 6, 15, 14, 30, 0),
        location: tromso,
        options,
    };
    assert!(engine.calculate(&birth).is_ok());
}
