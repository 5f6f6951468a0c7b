//! Calendar date <-> Julian Day conversions.
//!
//! Calendar dates (year, month, day) follow the historical calendar: Julian
//! before 1582-10-15, Gregorian from then on. `NaiveDateTime` values are
//! chrono's proleptic Gregorian instants, so a Julian-calendar birth date is
//! carried as the proleptic date of the same day.
//!
//! Sources: Meeus, "Astronomical Algorithms" (2nd ed), Chapter 7.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::ChartError;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// First day of the Gregorian calendar (1582-10-15) as a Julian Day at 0h.
const GREGORIAN_START_JD: f64 = 2_299_160.5;

/// Julian Day at 0h of proleptic Gregorian 0000-12-31, chrono's day 0 from CE.
const CE_DAY_ZERO_JD: f64 = 1_721_424.5;

/// Julian centuries elapsed since J2000.0.
pub fn centuries_since_j2000(julian_day: f64) -> f64 {
    (julian_day - J2000_JD) / DAYS_PER_CENTURY
}

/// Julian Day for a calendar date and a fractional hour of that day (UT).
///
/// January and February are counted as months 13 and 14 of the previous
/// year; the Gregorian correction applies from 1582-10-15 onwards.
pub fn julian_day(year: i32, month: u32, day: u32, hour: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };

    let is_gregorian = (year, month, day) >= (1582, 10, 15);
    let b = if is_gregorian {
        let a = (y / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + hour / 24.0 + b
        - 1524.5
}

/// Whether the date exists in the historical calendar. Julian leap years
/// apply before the reform and the ten days 1582-10-05..14 never happened.
pub fn is_calendar_date(year: i32, month: u32, day: u32) -> bool {
    if (year, month) == (1582, 10) && (5..=14).contains(&day) {
        return false;
    }
    let leap = if (year, month, day) >= (1582, 10, 15) {
        (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
    } else {
        year.rem_euclid(4) == 0
    };
    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if leap => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}

/// Proleptic Gregorian date of a historical calendar date, `None` when the
/// date does not exist.
pub fn calendar_to_naive_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if !is_calendar_date(year, month, day) {
        return None;
    }
    let days = julian_day(year, month, day, 0.0) - CE_DAY_ZERO_JD;
    NaiveDate::from_num_days_from_ce_opt(days.round() as i32)
}

/// Historical calendar date of a proleptic Gregorian date.
pub fn naive_date_to_calendar(date: NaiveDate) -> (i32, u32, u32) {
    calendar_date(CE_DAY_ZERO_JD + date.num_days_from_ce() as f64)
}

/// Inverse of [`julian_day`] for the date part: the historical calendar
/// date of the civil day containing `julian_day`.
pub fn calendar_date(julian_day: f64) -> (i32, u32, u32) {
    let z = (julian_day + 0.5).floor();
    let a = if z >= GREGORIAN_START_JD + 0.5 {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    } else {
        z
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = (b - d - (30.6001 * e).floor()) as u32;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 } as u32;
    let year = if month > 2 { c - 4716.0 } else { c - 4715.0 } as i32;
    (year, month, day)
}

/// Julian Day for a UTC instant.
pub fn julian_day_from_datetime(utc: &NaiveDateTime) -> f64 {
    let seconds = utc.num_seconds_from_midnight() as f64 + utc.nanosecond() as f64 * 1e-9;
    CE_DAY_ZERO_JD + utc.num_days_from_ce() as f64 + seconds / 86_400.0
}

/// Inverse of [`julian_day_from_datetime`]: UTC instant for a Julian Day.
///
/// Rounded to the nearest millisecond.
pub fn julian_day_to_civil(julian_day: f64) -> Result<NaiveDateTime, ChartError> {
    if !julian_day.is_finite() || julian_day < 0.0 {
        return Err(ChartError::validation(
            "julian_day",
            julian_day,
            "must be a finite, non-negative Julian Day",
        ));
    }

    let shifted = julian_day - CE_DAY_ZERO_JD;
    let whole_days = shifted.floor();
    let f = shifted - whole_days;

    let date = i32::try_from(whole_days as i64)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            ChartError::validation("julian_day", julian_day, "does not map to a calendar date")
        })?;

    let millis = (f * 86_400_000.0).round() as i64;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        ChartError::validation("julian_day", julian_day, "does not map to a calendar date")
    })?;
    Ok(midnight + chrono::Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_epoch() {
        assert_eq!(julian_day(2000, 1, 1, 12.0), J2000_JD);
    }

    #[test]
    fn test_meeus_reference_dates() {
        // Meeus example 7.a: 1957 October 4.81
        assert!((julian_day(1957, 10, 4, 0.81 * 24.0) - 2_436_116.31).abs() < 1e-6);
        // Meeus example 7.b: 333 January 27.5 (Julian calendar)
        assert!((julian_day(333, 1, 27, 12.0) - 1_842_713.0).abs() < 1e-6);
        assert_eq!(julian_day(1582, 10, 15, 0.0), GREGORIAN_START_JD);
    }

    #[test]
    fn test_inverse_recovers_date() {
        let dt = julian_day_to_civil(2_436_116.31).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1957, 10, 4));
        assert_eq!(dt.hour(), 19);
        assert_eq!(dt.minute(), 26);
    }

    #[test]
    fn test_julian_calendar_leap_days() {
        // 1500 is a leap year only in the Julian calendar
        assert!(is_calendar_date(1500, 2, 29));
        assert!(!is_calendar_date(1700, 2, 29));
        assert!(is_calendar_date(1600, 2, 29));
        assert!(!is_calendar_date(1582, 10, 10));
        assert!(is_calendar_date(1582, 10, 4));
        assert!(!is_calendar_date(2001, 4, 31));
        assert!(!is_calendar_date(2001, 13, 1));
    }

    #[test]
    fn test_reform_dates_are_consecutive_days() {
        let thursday = calendar_to_naive_date(1582, 10, 4).unwrap();
        let friday = calendar_to_naive_date(1582, 10, 15).unwrap();
        assert_eq!(friday - thursday, chrono::Duration::days(1));
        assert_eq!(naive_date_to_calendar(thursday), (1582, 10, 4));
        assert_eq!(naive_date_to_calendar(friday), (1582, 10, 15));
    }

    #[test]
    fn test_julian_leap_day_maps_to_proleptic_date() {
        let date = calendar_to_naive_date(1500, 2, 29).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (1500, 3, 10));
        assert_eq!(naive_date_to_calendar(date), (1500, 2, 29));
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(julian_day_from_datetime(&noon), julian_day(1500, 2, 29, 12.0));
        assert_eq!(julian_day_to_civil(julian_day(1500, 2, 29, 12.0)).unwrap(), noon);
    }

    #[test]
    fn test_inverse_rejects_nan() {
        assert!(julian_day_to_civil(f64::NAN).is_err());
    }

    #[test]
    fn test_centuries() {
        assert_eq!(centuries_since_j2000(J2000_JD), 0.0);
        assert!((centuries_since_j2000(J2000_JD + DAYS_PER_CENTURY) - 1.0).abs() < 1e-12);
    }
}
