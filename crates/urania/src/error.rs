use crate::ephemeris::CelestialBody;
use crate::houses::HouseSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur during a chart calculation.
///
/// Every stage either completes or returns one of these; no partially
/// assembled chart is ever handed back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Malformed or out-of-range input, rejected before any calculation.
    #[error("Invalid {field}: {value} ({reason})")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The ephemeris backend or its data files could not be used.
    #[error("Ephemeris unavailable: {message}")]
    EphemerisUnavailable { message: String },

    /// One of the bodies every downstream stage relies on has no position.
    #[error("Failed to calculate position for essential body {body} at JD {julian_day}: {message}")]
    MissingEssentialBody {
        body: CelestialBody,
        julian_day: f64,
        message: String,
    },

    /// Trigonometry produced a non-finite or undefined result.
    #[error("{operation} is undefined at latitude {latitude}, JD {julian_day}: {message}")]
    GeometryDomain {
        operation: &'static str,
        latitude: f64,
        julian_day: f64,
        message: String,
    },
}

impl ChartError {
    pub(crate) fn validation(field: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        ChartError::Validation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// True for input errors the caller should report back to the user as-is.
    pub fn is_validation(&self) -> bool {
        matches!(self, ChartError::Validation { .. })
    }
}

/// Degradations that did not abort the calculation but must stay visible to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartWarning {
    /// No time zone could be resolved for the birth place; the civil time was read as UTC.
    TimeZoneFallback {
        latitude: f64,
        longitude: f64,
        reason: String,
    },
    /// A non-essential body was left out of the chart.
    BodyOmitted { body: CelestialBody, reason: String },
    /// The requested house system is undefined at this latitude; another was used.
    HouseSystemFallback {
        requested: HouseSystem,
        used: HouseSystem,
        latitude: f64,
    },
}

impl fmt::Display for ChartWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartWarning::TimeZoneFallback {
                latitude,
                longitude,
                reason,
            } => write!(
                f,
                "No time zone at ({latitude}, {longitude}), birth time read as UTC: {reason}"
            ),
            ChartWarning::BodyOmitted { body, reason } => write!(f, "{body} omitted: {reason}"),
            ChartWarning::HouseSystemFallback {
                requested,
                used,
                latitude,
            } => write!(
                f,
                "{requested} houses are undefined at latitude {latitude}, {used} used instead"
            ),
        }
    }
}

/// Reject NaN and infinities before they reach any trigonometry.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, ChartError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ChartError::validation(field, value, "must be a finite number"))
    }
}

/// Latitude must lie in [-90, 90].
pub(crate) fn validate_latitude(latitude: f64) -> Result<f64, ChartError> {
    let latitude = require_finite("latitude", latitude)?;
    if latitude.abs() > 90.0 {
        return Err(ChartError::validation(
            "latitude",
            latitude,
            "must be between -90 and 90 degrees",
        ));
    }
    Ok(latitude)
}

/// Longitude must lie in [-180, 180].
pub(crate) fn validate_longitude(longitude: f64) -> Result<f64, ChartError> {
    let longitude = require_finite("longitude", longitude)?;
    if longitude.abs() > 180.0 {
        return Err(ChartError::validation(
            "longitude",
            longitude,
            "must be between -180 and 180 degrees",
        ));
    }
    Ok(longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_bounds() {
        assert!(validate_latitude(90.0).is_ok());
        assert!(validate_latitude(-90.0).is_ok());
        let err = validate_latitude(91.0).unwrap_err();
        assert!(err.is_validation());
        assert!(validate_latitude(f64::NAN).unwrap_err().is_validation());
    }

    #[test]
    fn test_longitude_bounds() {
        assert!(validate_longitude(-180.0).is_ok());
        assert!(validate_longitude(180.5).is_err());
        assert!(validate_longitude(f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages_carry_inputs() {
        let err = validate_latitude(91.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid latitude: 91 (must be between -90 and 90 degrees)"
        );
    }
}
