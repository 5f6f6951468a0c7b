use approx::assert_abs_diff_eq;
use chrono::{Datelike, NaiveDate, Timelike};
use urania::ephemeris::GeoLocation;
use urania::time::{
    julian_day, julian_day_to_civil, FixedZoneResolver, UnresolvableZone, J2000_JD,
};
use urania::{BirthDateTime, ChartWarning, TimeNormalizer};

const NEW_YORK: GeoLocation = GeoLocation { lat: 40.7128, lon: -74.0060 };

fn new_york() -> TimeNormalizer {
    TimeNormalizer::new(Box::new(FixedZoneResolver(chrono_tz::America::New_York)))
}

#[test]
fn test_j2000_epoch() {
    assert_eq!(julian_day(2000, 1, 1, 12.0), J2000_JD);
    let civil = julian_day_to_civil(J2000_JD).unwrap();
    assert_eq!(civil, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap());
}

#[test]
fn test_gregorian_reform_boundary() {
    // 1582-10-04 (Julian) is followed by 1582-10-15 (Gregorian)
    let before = julian_day(1582, 10, 4, 0.0);
    let after = julian_day(1582, 10, 15, 0.0);
    assert_abs_diff_eq!(after - before, 1.0, epsilon = 1e-9);
}

#[test]
fn test_round_trip_within_a_minute() {
    let normalizer = new_york();
    let births = [
        BirthDateTime::new(1955, 2, 24, 19, 15, 0),
        BirthDateTime::new(1987, 7, 4, 6, 45, 30),
        BirthDateTime::new(2003, 11, 2, 23, 59, 0),
        BirthDateTime::new(2024, 3, 15, 8, 1, 0),
    ];
    for birth in births {
        let instant = normalizer.normalize(&birth, &NEW_YORK).unwrap();
        let local = normalizer.julian_day_to_local(instant.julian_day, &NEW_YORK).unwrap();
        let expected = birth.to_naive().unwrap();
        let drift = (local - expected).num_seconds().abs();
        assert!(drift <= 60, "{expected} came back as {local}");
    }
}

#[test]
fn test_winter_and_summer_offsets() {
    let normalizer = new_york();
    let winter = normalizer
        .normalize(&BirthDateTime::new(1990, 1, 15, 12, 0, 0), &NEW_YORK)
        .unwrap();
    assert_eq!(winter.utc_offset_seconds, -5 * 3600);
    assert_eq!(winter.utc.hour(), 17);

    let summer = normalizer
        .normalize(&BirthDateTime::new(1990, 7, 15, 12, 0, 0), &NEW_YORK)
        .unwrap();
    assert_eq!(summer.utc_offset_seconds, -4 * 3600);
    assert_eq!(summer.utc.hour(), 16);
}

#[test]
fn test_ambiguous_time_takes_earlier_instant() {
    // 2021-11-07 01:30 happens twice in New York
    let instant = new_york()
        .normalize(&BirthDateTime::new(2021, 11, 7, 1, 30, 0), &NEW_YORK)
        .unwrap();
    assert_eq!(instant.utc.hour(), 5);
    assert_eq!(instant.utc.minute(), 30);
}

#[test]
fn test_late_evening_crosses_utc_midnight() {
    let instant = new_york()
        .normalize(&BirthDateTime::new(1999, 12, 31, 22, 0, 0), &NEW_YORK)
        .unwrap();
    assert_eq!(instant.utc.year(), 2000);
    assert_eq!(instant.utc.day(), 1);
    assert_eq!(instant.utc.hour(), 3);
}

#[test]
fn test_utc_fallback_carries_warning() {
    let normalizer = TimeNormalizer::new(Box::new(UnresolvableZone));
    let instant = normalizer
        .normalize(&BirthDateTime::new(1990, 7, 15, 12, 0, 0), &NEW_YORK)
        .unwrap();
    assert_eq!(instant.utc_offset_seconds, 0);
    assert!(instant.zone.is_none());
    match instant.warning {
        Some(ChartWarning::TimeZoneFallback { latitude, longitude, .. }) => {
            assert_eq!(latitude, NEW_YORK.lat);
            assert_eq!(longitude, NEW_YORK.lon);
        }
        other => panic!("expected a fallback warning, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_location_rejected() {
    let normalizer = new_york();
    let birth = BirthDateTime::new(1990, 7, 15, 12, 0, 0);
    for location in [
        GeoLocation { lat: 91.0, lon: 0.0 },
        GeoLocation { lat: 0.0, lon: 181.0 },
        GeoLocation { lat: f64::NAN, lon: 0.0 },
    ] {
        let err = normalizer.normalize(&birth, &location).unwrap_err();
        assert!(err.is_validation(), "{location:?}");
    }
}
