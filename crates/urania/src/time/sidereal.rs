//! Sidereal time and obliquity of the ecliptic.
//!
//! Sources: Meeus, "Astronomical Algorithms" (2nd ed), Eq. 12.4 and 22.2.
//! UT is used in place of UT1 and TT; the difference is far below the
//! precision house cusps are quoted to.

use crate::angles::normalize_degrees;
use crate::time::julian::{centuries_since_j2000, J2000_JD};

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
pub fn greenwich_mean_sidereal_time(julian_day: f64) -> f64 {
    let t = centuries_since_j2000(julian_day);
    let theta = 280.460_618_37 + 360.985_647_366_29 * (julian_day - J2000_JD)
        + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(theta)
}

/// Local sidereal time (= RAMC) in degrees for an east-positive longitude.
pub fn local_sidereal_time(julian_day: f64, longitude_east: f64) -> f64 {
    normalize_degrees(greenwich_mean_sidereal_time(julian_day) + longitude_east)
}

/// Mean obliquity of the ecliptic in degrees (IAU 1980 polynomial).
pub fn mean_obliquity(julian_day: f64) -> f64 {
    let t = centuries_since_j2000(julian_day);
    23.439_291_11 - 0.013_004_167 * t - 0.000_000_163_9 * t * t + 0.000_000_503_6 * t * t * t
}
