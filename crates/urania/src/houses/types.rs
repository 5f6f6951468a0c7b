use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::angles::forward_arc;
use crate::western::ZodiacSign;

/// House division method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    /// Semi-arc trisection in right ascension, solved iteratively.
    #[default]
    Placidus,
    /// Each quadrant between the angles divided into three equal arcs.
    Porphyry,
    /// Twelve 30° houses starting at the Ascendant.
    Equal,
    /// Angles from the sphere, intermediate cusps stepped 30° from the preceding
    /// angle (a third of the quadrant when the quadrant is shorter than 90°).
    Simplified,
    /// Each house is one whole sign, house 1 being the Ascendant's sign.
    /// The only system whose first cusp is not the Ascendant itself.
    WholeSign,
}

impl HouseSystem {
    pub const ALL: [HouseSystem; 5] = [
        HouseSystem::Placidus,
        HouseSystem::Porphyry,
        HouseSystem::Equal,
        HouseSystem::Simplified,
        HouseSystem::WholeSign,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
            HouseSystem::Porphyry => "porphyry",
            HouseSystem::Equal => "equal",
            HouseSystem::Simplified => "simplified",
            HouseSystem::WholeSign => "whole_sign",
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        HouseSystem::ALL
            .iter()
            .copied()
            .find(|system| system.name() == lower)
            .ok_or_else(|| {
                let valid: Vec<&str> = HouseSystem::ALL.iter().map(|s| s.name()).collect();
                format!("Invalid house system: {}. Valid systems: {:?}", s, valid)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseCusp {
    /// 1-12
    pub house_number: u8,
    pub longitude: f64,
    pub sign: ZodiacSign,
}

/// House cusps and angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousePositions {
    pub system: HouseSystem,
    /// Twelve cusps in house order; cusp 1 is the Ascendant except under whole signs.
    pub cusps: Vec<HouseCusp>,
    pub ascendant: f64,
    /// Computed from the sphere; equals cusp 10 only in quadrant systems.
    pub midheaven: f64,
    pub descendant: f64,
    pub ic: f64,
}

impl HousePositions {
    pub fn cusp(&self, house_number: u8) -> Option<f64> {
        self.cusps
            .iter()
            .find(|c| c.house_number == house_number)
            .map(|c| c.longitude)
    }

    /// House (1-12) containing `longitude`, see [`assign_house`].
    pub fn house_of(&self, longitude: f64) -> u8 {
        let cusps: Vec<f64> = self.cusps.iter().map(|c| c.longitude).collect();
        assign_house(longitude, &cusps)
    }
}

/// House number (1-12) for a longitude given twelve cusps in house order.
///
/// House `i` covers `[cusp i, cusp i+1)` walking forward around the circle,
/// so a longitude exactly on a cusp belongs to the house that cusp opens.
/// If no interval claims the longitude (degenerate cusps), the house whose
/// cusp is the nearest one behind it is used.
pub fn assign_house(longitude: f64, cusps: &[f64]) -> u8 {
    let n = cusps.len();
    if n == 0 {
        return 1;
    }

    for i in 0..n {
        let start = cusps[i];
        let end = cusps[(i + 1) % n];
        let width = forward_arc(start, end);
        if width > 0.0 && forward_arc(start, longitude) < width {
            return (i + 1) as u8;
        }
    }

    let (nearest, _) = cusps
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_arc), (i, &cusp)| {
            let arc = forward_arc(cusp, longitude);
            if arc < best_arc {
                (i, arc)
            } else {
                (best, best_arc)
            }
        });
    (nearest + 1) as u8
}
