//! Swiss Ephemeris backend, built with the `swiss-ephemeris` feature.

use log::info;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, set_ephe_path};

use crate::ephemeris::provider::PositionProvider;
use crate::ephemeris::types::{BodyPosition, CelestialBody};
use crate::error::{require_finite, ChartError};

/// FLG_SWIEPH
const FLG_SWIEPH: i32 = 2;

/// FLG_SWIEPH | FLG_SPEED
const CALC_FLAGS: u32 = FLG_SWIEPH as u32 | 256;

/// Whether the flags returned by `calc_ut` say the data files were read.
/// Without them the library silently drops to its built-in Moshier theory.
fn read_data_files(return_flags: i32) -> bool {
    return_flags & FLG_SWIEPH != 0
}

/// Swiss Ephemeris body numbers. The South Node has none; it is derived.
fn swiss_id(body: CelestialBody) -> Option<u32> {
    Some(match body {
        CelestialBody::Sun => 0,
        CelestialBody::Moon => 1,
        CelestialBody::Mercury => 2,
        CelestialBody::Venus => 3,
        CelestialBody::Mars => 4,
        CelestialBody::Jupiter => 5,
        CelestialBody::Saturn => 6,
        CelestialBody::Uranus => 7,
        CelestialBody::Neptune => 8,
        CelestialBody::Pluto => 9,
        CelestialBody::NorthNode => 10, // MEAN_NODE
        CelestialBody::Chiron => 15,
        CelestialBody::SouthNode => return None,
    })
}

/// Swiss Ephemeris adapter
pub struct SwissEphemeris {
    ephemeris_path: PathBuf,
}

impl SwissEphemeris {
    /// Use the data files under `ephemeris_path`; the directory must exist.
    pub fn new(ephemeris_path: impl AsRef<Path>) -> Result<Self, ChartError> {
        let path = ephemeris_path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ChartError::EphemerisUnavailable {
                message: format!(
                    "Ephemeris path does not exist: {}. Please ensure Swiss Ephemeris data files are installed.",
                    path.display()
                ),
            });
        }
        let path_text = path
            .to_str()
            .filter(|text| !text.contains('\0'))
            .ok_or_else(|| ChartError::EphemerisUnavailable {
                message: format!("Ephemeris path is not usable: {}", path.display()),
            })?;
        set_ephe_path(path_text);
        info!("Using Swiss Ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: path,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }
}

impl PositionProvider for SwissEphemeris {
    fn name(&self) -> &'static str {
        "swiss-ephemeris"
    }

    fn position(&self, body: CelestialBody, julian_day: f64) -> Result<BodyPosition, ChartError> {
        let julian_day = require_finite("julian_day", julian_day)?;
        let id = swiss_id(body).ok_or_else(|| ChartError::EphemerisUnavailable {
            message: format!("{} has no Swiss Ephemeris number", body),
        })?;

        let result = calc_ut(julian_day, id, CALC_FLAGS).map_err(|e| {
            ChartError::EphemerisUnavailable {
                message: format!("Swiss Ephemeris error for {}: {}", body, e),
            }
        })?;

        // The mean node is computed from a formula and never reads the files.
        if body != CelestialBody::NorthNode && !read_data_files(result.code) {
            return Err(ChartError::EphemerisUnavailable {
                message: format!(
                    "Swiss Ephemeris data files for {} not found under {}",
                    body,
                    self.ephemeris_path.display()
                ),
            });
        }

        let out = result.out;
        Ok(BodyPosition::new(body, out[0], out[1], out[2], out[3]))
    }
}
