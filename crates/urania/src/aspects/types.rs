use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ephemeris::CelestialBody;

/// Aspect catalog entries. Declaration order is the match precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
    Quincunx,
    Sesquiquadrate,
    Quintile,
    SemiSextile,
    Octile,
    Biquintile,
}

impl AspectKind {
    pub const MAJOR: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    pub const MINOR: [AspectKind; 6] = [
        AspectKind::Quincunx,
        AspectKind::Sesquiquadrate,
        AspectKind::Quintile,
        AspectKind::SemiSextile,
        AspectKind::Octile,
        AspectKind::Biquintile,
    ];

    pub fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Quintile => 72.0,
            AspectKind::SemiSextile => 30.0,
            AspectKind::Octile => 45.0,
            AspectKind::Biquintile => 144.0,
        }
    }

    pub fn default_orb(self) -> f64 {
        match self {
            AspectKind::Conjunction
            | AspectKind::Square
            | AspectKind::Trine
            | AspectKind::Opposition => 10.0,
            AspectKind::Sextile => 6.0,
            AspectKind::Quincunx | AspectKind::Sesquiquadrate => 3.0,
            AspectKind::Quintile
            | AspectKind::SemiSextile
            | AspectKind::Octile
            | AspectKind::Biquintile => 2.0,
        }
    }

    pub fn is_major(self) -> bool {
        Self::MAJOR.contains(&self)
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
            AspectKind::Quintile => "quintile",
            AspectKind::SemiSextile => "semi_sextile",
            AspectKind::Octile => "octile",
            AspectKind::Biquintile => "biquintile",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace(['-', ' '], "_");
        AspectKind::MAJOR
            .iter()
            .chain(AspectKind::MINOR.iter())
            .copied()
            .find(|kind| kind.name() == lower)
            .ok_or_else(|| format!("Unknown aspect: {}", s))
    }
}

/// One catalog entry with the orb in effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    pub angle: f64,
    pub orb: f64,
}

/// Settings for aspect calculations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectSettings {
    /// Extend the catalog with the minor aspects.
    pub include_minor: bool,
    /// Orb overrides per aspect type; missing entries use the default orb.
    pub orbs: BTreeMap<AspectKind, f64>,
}

impl AspectSettings {
    pub fn with_minor() -> Self {
        Self {
            include_minor: true,
            ..Self::default()
        }
    }

    pub fn orb(&self, kind: AspectKind) -> f64 {
        self.orbs
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_orb())
    }

    /// Active catalog in match order.
    pub fn catalog(&self) -> Vec<AspectDefinition> {
        AspectKind::MAJOR
            .iter()
            .chain(AspectKind::MINOR.iter())
            .filter(|kind| self.include_minor || kind.is_major())
            .map(|&kind| AspectDefinition {
                kind,
                angle: kind.angle(),
                orb: self.orb(kind),
            })
            .collect()
    }
}

/// An aspect between two bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub body_a: CelestialBody,
    pub body_b: CelestialBody,
    pub kind: AspectKind,
    /// Catalog angle (0, 60, 90, ...)
    pub exact_angle: f64,
    /// Shorter-arc separation actually measured, 0-180
    pub measured_angle: f64,
    /// |measured - exact|; 0 is exact
    pub orb: f64,
    /// Whether the aspect is applying (approaching exact)
    pub applying: bool,
    /// Within 0.1 degrees of exact
    pub exact: bool,
    /// Whether either body is retrograde
    pub retrograde: bool,
}

impl Aspect {
    pub fn involves(&self, body: CelestialBody) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The other body of the pair, if `body` takes part.
    pub fn partner(&self, body: CelestialBody) -> Option<CelestialBody> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}
