//! Ascendant, Midheaven and house cusps from sidereal time and obliquity.

use log::{debug, warn};

use crate::angles::{forward_arc, normalize_degrees, separation};
use crate::ephemeris::GeoLocation;
use crate::error::{require_finite, validate_latitude, validate_longitude, ChartError, ChartWarning};
use crate::houses::types::{HouseCusp, HousePositions, HouseSystem};
use crate::time::{local_sidereal_time, mean_obliquity};
use crate::western::{sign_index, ZodiacSign};

const PLACIDUS_MAX_ITERATIONS: usize = 100;
const PLACIDUS_TOLERANCE_DEG: f64 = 1e-10;

/// Compute house cusps and angles for a Julian Day (UT) and place.
pub fn calculate_houses(
    julian_day: f64,
    location: &GeoLocation,
    system: HouseSystem,
) -> Result<HousePositions, ChartError> {
    let julian_day = require_finite("julian_day", julian_day)?;
    let latitude = validate_latitude(location.lat)?;
    let longitude = validate_longitude(location.lon)?;

    let domain = |operation: &'static str, message: String| ChartError::GeometryDomain {
        operation,
        latitude,
        julian_day,
        message,
    };

    if latitude.abs() >= 90.0 {
        return Err(domain(
            "ascendant",
            "the horizon coincides with the equator at the poles".to_string(),
        ));
    }

    let ramc = local_sidereal_time(julian_day, longitude);
    let obliquity = mean_obliquity(julian_day);
    let mc = midheaven(ramc, obliquity);
    let asc = ascendant(ramc, obliquity, latitude);
    if !mc.is_finite() || !asc.is_finite() {
        return Err(domain("angles", format!("RAMC {} gave Asc {} MC {}", ramc, asc, mc)));
    }

    let raw = match system {
        HouseSystem::Placidus => placidus_cusps(ramc, obliquity, latitude, asc, mc)
            .map_err(|message| domain("placidus", message))?,
        HouseSystem::Porphyry => quadrant_cusps(asc, mc, |arc| arc / 3.0),
        HouseSystem::Equal => equal_cusps(asc),
        HouseSystem::Simplified => quadrant_cusps(asc, mc, |arc| (arc / 3.0).min(30.0)),
        HouseSystem::WholeSign => equal_cusps(sign_index(asc) as f64 * 30.0),
    };

    if let Some(bad) = raw.iter().find(|c| !c.is_finite()) {
        return Err(domain("cusps", format!("non-finite cusp {}", bad)));
    }

    debug!(
        "{} houses at JD {} lat {}: RAMC {:.4} Asc {:.4} MC {:.4}",
        system, julian_day, latitude, ramc, asc, mc
    );

    Ok(HousePositions {
        system,
        cusps: raw
            .iter()
            .enumerate()
            .map(|(i, &lon)| HouseCusp {
                house_number: (i + 1) as u8,
                longitude: lon,
                sign: ZodiacSign::from_longitude(lon),
            })
            .collect(),
        ascendant: asc,
        midheaven: mc,
        descendant: normalize_degrees(asc + 180.0),
        ic: normalize_degrees(mc + 180.0),
    })
}

/// House system used when Placidus has no solution at the place.
pub const POLAR_FALLBACK_SYSTEM: HouseSystem = HouseSystem::Porphyry;

/// Like [`calculate_houses`], but a Placidus request that has no solution
/// (circumpolar cusps at high latitude) is answered with Porphyry houses and
/// a warning instead of an error. Other systems and errors pass through.
pub fn calculate_houses_with_fallback(
    julian_day: f64,
    location: &GeoLocation,
    system: HouseSystem,
) -> Result<(HousePositions, Option<ChartWarning>), ChartError> {
    match calculate_houses(julian_day, location, system) {
        Ok(houses) => Ok((houses, None)),
        Err(ChartError::GeometryDomain {
            operation: "placidus",
            latitude,
            message,
            ..
        }) if system == HouseSystem::Placidus => {
            warn!(
                "Placidus undefined at latitude {} ({}), falling back to {}",
                latitude, message, POLAR_FALLBACK_SYSTEM
            );
            let houses = calculate_houses(julian_day, location, POLAR_FALLBACK_SYSTEM)?;
            Ok((
                houses,
                Some(ChartWarning::HouseSystemFallback {
                    requested: system,
                    used: POLAR_FALLBACK_SYSTEM,
                    latitude,
                }),
            ))
        }
        Err(err) => Err(err),
    }
}

/// Ecliptic longitude culminating at `ramc`.
pub fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    ecliptic_from_right_ascension(ramc, obliquity)
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant(ramc: f64, obliquity: f64, latitude: f64) -> f64 {
    let (sin_ramc, cos_ramc) = ramc.to_radians().sin_cos();
    let (sin_eps, cos_eps) = obliquity.to_radians().sin_cos();
    let tan_lat = latitude.to_radians().tan();
    normalize_degrees(
        cos_ramc
            .atan2(-(sin_eps * tan_lat + cos_eps * sin_ramc))
            .to_degrees(),
    )
}

/// Longitude of the ecliptic point with right ascension `ra`.
fn ecliptic_from_right_ascension(ra: f64, obliquity: f64) -> f64 {
    let (sin_ra, cos_ra) = ra.to_radians().sin_cos();
    normalize_degrees(sin_ra.atan2(cos_ra * obliquity.to_radians().cos()).to_degrees())
}

fn declination(longitude: f64, obliquity: f64) -> f64 {
    (obliquity.to_radians().sin() * longitude.to_radians().sin())
        .asin()
        .to_degrees()
}

fn equal_cusps(asc: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_degrees(asc + 30.0 * i as f64);
    }
    cusps
}

/// Angles on cusps 1/4/7/10; the two intermediate cusps of each quadrant
/// sit `step(arc)` and `2 * step(arc)` past the quadrant's opening angle.
fn quadrant_cusps(asc: f64, mc: f64, step: impl Fn(f64) -> f64) -> [f64; 12] {
    let angles = [
        asc,
        normalize_degrees(mc + 180.0),
        normalize_degrees(asc + 180.0),
        mc,
    ];
    let mut cusps = [0.0; 12];
    for (q, &start) in angles.iter().enumerate() {
        let end = angles[(q + 1) % 4];
        let s = step(forward_arc(start, end));
        cusps[q * 3] = start;
        cusps[q * 3 + 1] = normalize_degrees(start + s);
        cusps[q * 3 + 2] = normalize_degrees(start + 2.0 * s);
    }
    cusps
}

fn placidus_cusps(
    ramc: f64,
    obliquity: f64,
    latitude: f64,
    asc: f64,
    mc: f64,
) -> Result<[f64; 12], String> {
    let c11 = placidus_cusp(ramc, obliquity, latitude, 1.0 / 3.0, true)?;
    let c12 = placidus_cusp(ramc, obliquity, latitude, 2.0 / 3.0, true)?;
    let c2 = placidus_cusp(ramc, obliquity, latitude, 2.0 / 3.0, false)?;
    let c3 = placidus_cusp(ramc, obliquity, latitude, 1.0 / 3.0, false)?;

    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[1] = c2;
    cusps[2] = c3;
    cusps[9] = mc;
    cusps[10] = c11;
    cusps[11] = c12;
    for i in 0..6 {
        cusps[i + 3] = normalize_degrees(cusps[(i + 9) % 12] + 180.0);
    }
    Ok(cusps)
}

/// One Placidus cusp: the ecliptic point whose right ascension lies at
/// `fraction` of its own diurnal semi-arc east of the meridian (above the
/// horizon) or `fraction` of its nocturnal semi-arc short of the lower
/// meridian (below it).
fn placidus_cusp(
    ramc: f64,
    obliquity: f64,
    latitude: f64,
    fraction: f64,
    above_horizon: bool,
) -> Result<f64, String> {
    let tan_lat = latitude.to_radians().tan();
    let target = |ascensional_difference: f64| {
        if above_horizon {
            ramc + fraction * (90.0 + ascensional_difference)
        } else {
            ramc + 180.0 - fraction * (90.0 - ascensional_difference)
        }
    };

    let mut ra = normalize_degrees(target(0.0));
    for _ in 0..PLACIDUS_MAX_ITERATIONS {
        let lon = ecliptic_from_right_ascension(ra, obliquity);
        let x = tan_lat * declination(lon, obliquity).to_radians().tan();
        if !x.is_finite() || x.abs() > 1.0 {
            return Err(format!(
                "ecliptic longitude {:.2} is circumpolar, its semi-arc is undefined",
                lon
            ));
        }
        let next = normalize_degrees(target(x.asin().to_degrees()));
        if separation(next, ra) < PLACIDUS_TOLERANCE_DEG {
            return Ok(ecliptic_from_right_ascension(next, obliquity));
        }
        ra = next;
    }
    Err(format!(
        "semi-arc iteration did not converge after {} steps",
        PLACIDUS_MAX_ITERATIONS
    ))
}
