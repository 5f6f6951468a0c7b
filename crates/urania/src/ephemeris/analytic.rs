//! Closed-form approximate ephemeris from mean orbital elements.
//!
//! Planets use the Keplerian elements and rates of JPL's "Approximate
//! Positions of the Planets" (table 1, valid 1800-2050 AD; accuracy degrades
//! for the outer planets further out). The Moon uses the principal periodic
//! terms of Meeus ch. 47 and the node its mean-longitude polynomial.
//! Longitudes are referred to the mean equinox of date by adding general
//! precession to the J2000 ecliptic values.

// Orbital element names follow the usual astronomical symbols
#![allow(non_snake_case)]

use crate::angles::{normalize_degrees, signed_difference};
use crate::ephemeris::provider::PositionProvider;
use crate::ephemeris::types::{BodyPosition, CelestialBody};
use crate::error::{require_finite, ChartError};
use crate::time::centuries_since_j2000;

const KM_PER_AU: f64 = 149_597_870.7;

/// General precession in longitude, degrees per Julian century.
const PRECESSION_PER_CENTURY: f64 = 1.396_971_3;

/// Half-width of the central difference used for longitude speed, in days.
const SPEED_STEP_DAYS: f64 = 0.5;

/// Keplerian elements at J2000 and their rates per Julian century:
/// a (AU), e, I (deg), L (deg), long. of perihelion (deg), long. of node (deg).
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    a: [f64; 2],
    e: [f64; 2],
    I: [f64; 2],
    L: [f64; 2],
    varpi: [f64; 2],
    Omega: [f64; 2],
}

const MERCURY: OrbitalElements = OrbitalElements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    I: [7.004_979_02, -0.005_947_49],
    L: [252.250_323_50, 149_472.674_111_75],
    varpi: [77.457_796_28, 0.160_476_89],
    Omega: [48.330_765_93, -0.125_340_81],
};

const VENUS: OrbitalElements = OrbitalElements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    I: [3.394_676_05, -0.000_788_90],
    L: [181.979_099_50, 58_517.815_387_29],
    varpi: [131.602_467_18, 0.002_683_29],
    Omega: [76.679_842_55, -0.277_694_18],
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    I: [-0.000_015_31, -0.012_946_68],
    L: [100.464_571_66, 35_999.372_449_81],
    varpi: [102.937_681_93, 0.323_273_64],
    Omega: [0.0, 0.0],
};

const MARS: OrbitalElements = OrbitalElements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    I: [1.849_691_42, -0.008_131_31],
    L: [-4.553_432_05, 19_140.302_684_99],
    varpi: [-23.943_629_59, 0.444_410_88],
    Omega: [49.559_538_91, -0.292_573_43],
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    I: [1.304_396_95, -0.001_837_14],
    L: [34.396_440_51, 3_034.746_127_75],
    varpi: [14.728_479_83, 0.212_526_68],
    Omega: [100.473_909_09, 0.204_691_06],
};

const SATURN: OrbitalElements = OrbitalElements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    I: [2.485_991_87, 0.001_936_09],
    L: [49.954_244_23, 1_222.493_622_01],
    varpi: [92.598_878_31, -0.418_972_16],
    Omega: [113.662_424_48, -0.288_677_94],
};

const URANUS: OrbitalElements = OrbitalElements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    I: [0.772_637_83, -0.002_429_39],
    L: [313.238_104_51, 428.482_027_85],
    varpi: [170.954_276_30, 0.408_052_81],
    Omega: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    I: [1.770_043_47, 0.000_353_72],
    L: [-55.120_029_69, 218.459_453_25],
    varpi: [44.964_762_27, -0.322_414_64],
    Omega: [131.784_225_74, -0.005_086_64],
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    I: [17.140_012_06, 0.000_048_18],
    L: [238.929_038_33, 145.207_805_15],
    varpi: [224.068_916_29, -0.040_629_42],
    Omega: [110.303_936_84, -0.011_834_82],
};

/// Solve Kepler's equation M = E - e sin E (radians) by Newton iteration.
fn kepler(M: f64, e: f64) -> f64 {
    let mut E = M + e * M.sin();
    for _ in 0..50 {
        let dE = (M - (E - e * E.sin())) / (1.0 - e * E.cos());
        E += dE;
        if dE.abs() < 1e-12 {
            break;
        }
    }
    E
}

/// Heliocentric ecliptic (J2000) rectangular coordinates in AU.
fn heliocentric(elements: &OrbitalElements, T: f64) -> [f64; 3] {
    let at = |pair: [f64; 2]| pair[0] + pair[1] * T;
    let a = at(elements.a);
    let e = at(elements.e);
    let I = at(elements.I).to_radians();
    let L = at(elements.L);
    let varpi = at(elements.varpi);
    let Omega = at(elements.Omega);

    let omega = (varpi - Omega).to_radians();
    let M = (signed_difference(L, varpi)).to_radians();
    let Omega = Omega.to_radians();
    let E = kepler(M, e);

    let x_orb = a * (E.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * E.sin();

    let (so, co) = omega.sin_cos();
    let (sO, cO) = Omega.sin_cos();
    let (sI, cI) = I.sin_cos();

    [
        (co * cO - so * sO * cI) * x_orb + (-so * cO - co * sO * cI) * y_orb,
        (co * sO + so * cO * cI) * x_orb + (-so * sO + co * cO * cI) * y_orb,
        (so * sI) * x_orb + (co * sI) * y_orb,
    ]
}

/// (longitude, latitude, distance) of a rectangular vector; longitude in [0, 360).
fn spherical(v: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = v;
    let rho = (x * x + y * y).sqrt();
    (
        normalize_degrees(y.atan2(x).to_degrees()),
        z.atan2(rho).to_degrees(),
        (rho * rho + z * z).sqrt(),
    )
}

/// Geocentric (longitude, latitude, distance) at one instant, before speed is known.
fn geocentric(body: CelestialBody, julian_day: f64) -> Option<(f64, f64, f64)> {
    let T = centuries_since_j2000(julian_day);
    let precession = PRECESSION_PER_CENTURY * T;

    let elements = match body {
        CelestialBody::Moon => return Some(moon(T)),
        CelestialBody::NorthNode => return Some((mean_node(T), 0.0, 0.0)),
        CelestialBody::Sun => None,
        CelestialBody::Mercury => Some(&MERCURY),
        CelestialBody::Venus => Some(&VENUS),
        CelestialBody::Mars => Some(&MARS),
        CelestialBody::Jupiter => Some(&JUPITER),
        CelestialBody::Saturn => Some(&SATURN),
        CelestialBody::Uranus => Some(&URANUS),
        CelestialBody::Neptune => Some(&NEPTUNE),
        CelestialBody::Pluto => Some(&PLUTO),
        CelestialBody::SouthNode | CelestialBody::Chiron => return None,
    };

    let earth = heliocentric(&EARTH_MOON_BARYCENTER, T);
    let vector = match elements {
        Some(el) => {
            let planet = heliocentric(el, T);
            [planet[0] - earth[0], planet[1] - earth[1], planet[2] - earth[2]]
        }
        None => [-earth[0], -earth[1], -earth[2]],
    };
    let (lon, lat, dist) = spherical(vector);
    Some((normalize_degrees(lon + precession), lat, dist))
}

/// Geocentric Moon, mean equinox of date (Meeus ch. 47, principal terms).
fn moon(T: f64) -> (f64, f64, f64) {
    let Lp = 218.316_447_7 + 481_267.881_234_21 * T;
    let D = (297.850_192_1 + 445_267.111_403_4 * T).to_radians();
    let M = (357.529_109_2 + 35_999.050_290_9 * T).to_radians();
    let Mp = (134.963_396_4 + 477_198.867_505_5 * T).to_radians();
    let F = (93.272_095_0 + 483_202.017_523_3 * T).to_radians();

    let longitude = Lp + 6.288_774 * Mp.sin()
        + 1.274_027 * (2.0 * D - Mp).sin()
        + 0.658_314 * (2.0 * D).sin()
        + 0.213_618 * (2.0 * Mp).sin()
        - 0.185_116 * M.sin()
        - 0.114_332 * (2.0 * F).sin()
        + 0.058_793 * (2.0 * D - 2.0 * Mp).sin()
        + 0.057_066 * (2.0 * D - M - Mp).sin()
        + 0.053_322 * (2.0 * D + Mp).sin()
        + 0.045_758 * (2.0 * D - M).sin()
        - 0.040_923 * (M - Mp).sin()
        - 0.034_720 * D.sin()
        - 0.030_383 * (M + Mp).sin();

    let latitude = 5.128_122 * F.sin()
        + 0.280_602 * (Mp + F).sin()
        + 0.277_693 * (Mp - F).sin()
        + 0.173_237 * (2.0 * D - F).sin()
        + 0.055_413 * (2.0 * D - Mp + F).sin()
        + 0.046_271 * (2.0 * D - Mp - F).sin();

    let distance_km = 385_000.56
        - 20_905.355 * Mp.cos()
        - 3_699.111 * (2.0 * D - Mp).cos()
        - 2_955.968 * (2.0 * D).cos()
        - 569.925 * (2.0 * Mp).cos();

    (normalize_degrees(longitude), latitude, distance_km / KM_PER_AU)
}

/// Mean longitude of the Moon's ascending node, mean equinox of date.
fn mean_node(T: f64) -> f64 {
    normalize_degrees(
        125.044_547_9 - 1_934.136_289_1 * T + 0.002_075_4 * T * T + T * T * T / 467_441.0,
    )
}

/// Mean-element backend; needs no data files.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl PositionProvider for AnalyticEphemeris {
    fn name(&self) -> &'static str {
        "analytic"
    }

    fn position(&self, body: CelestialBody, julian_day: f64) -> Result<BodyPosition, ChartError> {
        let julian_day = require_finite("julian_day", julian_day)?;
        let unsupported = || ChartError::EphemerisUnavailable {
            message: format!("{} is not covered by the mean-element model", body),
        };

        let (lon, lat, dist) = geocentric(body, julian_day).ok_or_else(unsupported)?;
        let (before, _, _) = geocentric(body, julian_day - SPEED_STEP_DAYS).ok_or_else(unsupported)?;
        let (after, _, _) = geocentric(body, julian_day + SPEED_STEP_DAYS).ok_or_else(unsupported)?;
        let speed = signed_difference(after, before) / (2.0 * SPEED_STEP_DAYS);

        Ok(BodyPosition::new(body, lon, lat, dist, speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::J2000_JD;

    fn lon(body: CelestialBody, jd: f64) -> f64 {
        AnalyticEphemeris.position(body, jd).unwrap().longitude
    }

    #[test]
    fn test_kepler_solution() {
        let (M, e) = (1.0_f64, 0.2_f64);
        let E = kepler(M, e);
        assert!((E - e * E.sin() - M).abs() < 1e-10);
    }

    #[test]
    fn test_sun_at_j2000() {
        // Apparent solar longitude at J2000 is about 280.37 degrees
        let sun = lon(CelestialBody::Sun, J2000_JD);
        assert!((sun - 280.37).abs() < 0.1, "Sun at {sun}");
    }

    #[test]
    fn test_moon_meeus_example() {
        // Meeus example 47.a: 1992 April 12, 0h TD -> lambda = 133.162655
        let moon = lon(CelestialBody::Moon, 2_448_724.5);
        assert!((moon - 133.16).abs() < 0.3, "Moon at {moon}");
    }

    #[test]
    fn test_sun_speed_is_about_one_degree() {
        let sun = AnalyticEphemeris.position(CelestialBody::Sun, J2000_JD).unwrap();
        assert!((sun.longitude_speed - 1.019).abs() < 0.01);
        assert!(!sun.retrograde);
    }

    #[test]
    fn test_node_is_retrograde() {
        let node = AnalyticEphemeris.position(CelestialBody::NorthNode, J2000_JD).unwrap();
        assert!(node.retrograde);
        assert!((node.longitude - 125.04).abs() < 0.01);
    }

    #[test]
    fn test_chiron_unsupported() {
        assert!(matches!(
            AnalyticEphemeris.position(CelestialBody::Chiron, J2000_JD),
            Err(ChartError::EphemerisUnavailable { .. })
        ));
    }

    #[test]
    fn test_longitudes_normalized_over_a_century() {
        let mut jd = 2_415_020.5; // 1900
        while jd < 2_488_070.5 {
            for body in CelestialBody::PLANETS {
                let l = lon(body, jd);
                assert!((0.0..360.0).contains(&l), "{body} at {l}");
            }
            jd += 1_234.5;
        }
    }

    #[test]
    fn test_mercury_stays_near_sun() {
        let mut jd = J2000_JD;
        for _ in 0..50 {
            let elongation = crate::angles::separation(
                lon(CelestialBody::Mercury, jd),
                lon(CelestialBody::Sun, jd),
            );
            assert!(elongation < 29.0, "Mercury elongation {elongation}");
            jd += 17.0;
        }
    }
}
