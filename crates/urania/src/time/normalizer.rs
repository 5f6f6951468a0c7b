//! Civil birth time + birth place -> Julian Day (UT).

use chrono::{Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::ephemeris::GeoLocation;
use crate::error::{validate_latitude, validate_longitude, ChartError, ChartWarning};
use crate::time::julian::{
    calendar_to_naive_date, julian_day_from_datetime, julian_day_to_civil, naive_date_to_calendar,
};
use crate::time::zone::{GeographicZoneResolver, ZoneResolver};

/// Civil (wall-clock) date and time at the birth place. Dates before
/// 1582-10-15 are read in the Julian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    #[serde(default)]
    pub second: u32,
}

impl BirthDateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Checked conversion to a naive (proleptic Gregorian) date-time.
    pub fn to_naive(&self) -> Result<NaiveDateTime, ChartError> {
        if !(1..=12).contains(&self.month) {
            return Err(ChartError::validation("month", self.month, "must be between 1 and 12"));
        }
        let date = calendar_to_naive_date(self.year, self.month, self.day).ok_or_else(|| {
            ChartError::validation(
                "date",
                format!("{:04}-{:02}-{:02}", self.year, self.month, self.day),
                "is not a valid calendar date (Julian calendar before 1582-10-15)",
            )
        })?;
        date.and_hms_opt(self.hour, self.minute, self.second)
            .ok_or_else(|| {
                ChartError::validation(
                    "time",
                    format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second),
                    "is not a valid time of day",
                )
            })
    }
}

impl From<NaiveDateTime> for BirthDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        use chrono::Timelike;
        let (year, month, day) = naive_date_to_calendar(dt.date());
        Self::new(year, month, day, dt.hour(), dt.minute(), dt.second())
    }
}

/// A birth instant on the continuous UT time scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInstant {
    pub julian_day: f64,
    pub utc: NaiveDateTime,
    /// IANA zone used for the conversion; `None` when the UTC fallback applied.
    pub zone: Option<String>,
    pub utc_offset_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<ChartWarning>,
}

/// Converts civil birth data into Julian Days using a geographic zone lookup.
pub struct TimeNormalizer {
    resolver: Box<dyn ZoneResolver>,
}

impl TimeNormalizer {
    pub fn new(resolver: Box<dyn ZoneResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve the zone at `location`, convert local time to UTC, and compute the Julian Day.
    ///
    /// A failed zone lookup does not abort: the civil time is read as UTC and
    /// the returned instant carries a [`ChartWarning::TimeZoneFallback`].
    pub fn normalize(
        &self,
        date_time: &BirthDateTime,
        location: &GeoLocation,
    ) -> Result<NormalizedInstant, ChartError> {
        let lat = validate_latitude(location.lat)?;
        let lon = validate_longitude(location.lon)?;
        let local = date_time.to_naive()?;

        match self.resolver.resolve(lat, lon) {
            Ok(tz) => {
                let utc = local_to_utc(&tz, local);
                let offset = (local - utc).num_seconds() as i32;
                debug!("Resolved zone {} at ({}, {}), UTC offset {}s", tz.name(), lat, lon, offset);
                Ok(NormalizedInstant {
                    julian_day: julian_day_from_datetime(&utc),
                    utc,
                    zone: Some(tz.name().to_string()),
                    utc_offset_seconds: offset,
                    warning: None,
                })
            }
            Err(reason) => {
                warn!("Time zone lookup failed at ({}, {}): {}. Falling back to UTC", lat, lon, reason);
                Ok(NormalizedInstant {
                    julian_day: julian_day_from_datetime(&local),
                    utc: local,
                    zone: None,
                    utc_offset_seconds: 0,
                    warning: Some(ChartWarning::TimeZoneFallback {
                        latitude: lat,
                        longitude: lon,
                        reason,
                    }),
                })
            }
        }
    }

    /// Inverse of [`normalize`](Self::normalize): local civil time at `location` for a Julian Day.
    pub fn julian_day_to_local(
        &self,
        julian_day: f64,
        location: &GeoLocation,
    ) -> Result<NaiveDateTime, ChartError> {
        let lat = validate_latitude(location.lat)?;
        let lon = validate_longitude(location.lon)?;
        let utc = julian_day_to_civil(julian_day)?;
        match self.resolver.resolve(lat, lon) {
            Ok(tz) => Ok(tz.from_utc_datetime(&utc).naive_local()),
            Err(_) => Ok(utc),
        }
    }
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::new(Box::new(GeographicZoneResolver))
    }
}

/// Local wall-clock time -> UTC under the zone's historical rules.
///
/// Ambiguous times (clocks turned back) take the earlier instant; times
/// skipped by a forward jump are moved past the gap.
fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> NaiveDateTime {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.naive_utc(),
        LocalResult::Ambiguous(earliest, _) => {
            debug!("{} is ambiguous in {}; using the earlier instant", local, tz.name());
            earliest.naive_utc()
        }
        LocalResult::None => {
            debug!("{} falls in a DST gap in {}; moving forward one hour", local, tz.name());
            let shifted = local + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.naive_utc(),
                LocalResult::None => shifted,
            }
        }
    }
}
