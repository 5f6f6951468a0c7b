//! Angular arithmetic on the ecliptic circle.

/// Normalize degrees to [0, 360).
pub fn normalize_degrees(value: f64) -> f64 {
    let normalized = value.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Shorter-arc separation between two longitudes, always in [0, 180].
pub fn separation(lon1: f64, lon2: f64) -> f64 {
    let diff = (normalize_degrees(lon1) - normalize_degrees(lon2)).abs();
    diff.min(360.0 - diff)
}

/// Arc travelled going forward (counter-clockwise, increasing longitude) from `from` to `to`, in [0, 360).
pub fn forward_arc(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}

/// Signed difference `lon1 - lon2` folded into (-180, 180].
pub fn signed_difference(lon1: f64, lon2: f64) -> f64 {
    let diff = normalize_degrees(lon1 - lon2);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Midpoint of the shorter arc between two longitudes.
pub fn shorter_arc_midpoint(lon1: f64, lon2: f64) -> f64 {
    let half = signed_difference(lon2, lon1) / 2.0;
    normalize_degrees(lon1 + half)
}

/// True when `|separation(lon1, lon2) - angle| <= orb`.
pub fn within_orb(lon1: f64, lon2: f64, angle: f64, orb: f64) -> bool {
    (separation(lon1, lon2) - angle).abs() <= orb
}
