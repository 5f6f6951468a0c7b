use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::aspects::AspectKind;
use crate::ephemeris::CelestialBody;

/// Named multi-body configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Stellium,
    GrandTrine,
    TSquare,
    Yod,
    GrandCross,
    Kite,
    MysticRectangle,
    Arrow,
    Arrowhead,
    Basket,
    BoomerangYod,
    Butterfly,
    Castle,
    Cradle,
    Crossbow,
    Diamond,
    DoubleTSquare,
    GrandQuintile,
    GrandSextile,
    HammerOfThor,
    Hexagon,
    Hourglass,
    Pentagram,
    Rectangle,
    Rosetta,
    Shield,
    Star,
    StarOfDavid,
    Trapezoid,
    Wedge,
    Bundle,
    Bowl,
    Bucket,
    Locomotive,
    Seesaw,
    Splash,
}

impl PatternKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Stellium => "Stellium",
            PatternKind::GrandTrine => "Grand Trine",
            PatternKind::TSquare => "T-Square",
            PatternKind::Yod => "Yod",
            PatternKind::GrandCross => "Grand Cross",
            PatternKind::Kite => "Kite",
            PatternKind::MysticRectangle => "Mystic Rectangle",
            PatternKind::Arrow => "Arrow",
            PatternKind::Arrowhead => "Arrowhead",
            PatternKind::Basket => "Basket",
            PatternKind::BoomerangYod => "Boomerang Yod",
            PatternKind::Butterfly => "Butterfly",
            PatternKind::Castle => "Castle",
            PatternKind::Cradle => "Cradle",
            PatternKind::Crossbow => "Crossbow",
            PatternKind::Diamond => "Diamond",
            PatternKind::DoubleTSquare => "Double T-Square",
            PatternKind::GrandQuintile => "Grand Quintile",
            PatternKind::GrandSextile => "Grand Sextile",
            PatternKind::HammerOfThor => "Hammer of Thor",
            PatternKind::Hexagon => "Hexagon",
            PatternKind::Hourglass => "Hourglass",
            PatternKind::Pentagram => "Pentagram",
            PatternKind::Rectangle => "Rectangle",
            PatternKind::Rosetta => "Rosetta",
            PatternKind::Shield => "Shield",
            PatternKind::Star => "Star",
            PatternKind::StarOfDavid => "Star of David",
            PatternKind::Trapezoid => "Trapezoid",
            PatternKind::Wedge => "Wedge",
            PatternKind::Bundle => "Bundle",
            PatternKind::Bowl => "Bowl",
            PatternKind::Bucket => "Bucket",
            PatternKind::Locomotive => "Locomotive",
            PatternKind::Seesaw => "Seesaw",
            PatternKind::Splash => "Splash",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PatternKind::Stellium => "Three or more bodies mutually conjunct",
            PatternKind::GrandTrine => "Three bodies in mutual trine",
            PatternKind::TSquare => "Two bodies in opposition, both square a third",
            PatternKind::Yod => "Two bodies in sextile, both quincunx a third (Finger of God)",
            PatternKind::GrandCross => "Two oppositions squaring each other",
            PatternKind::Kite => "Grand Trine with a fourth body opposite one vertex and sextile the other two",
            PatternKind::MysticRectangle => "Two oppositions joined by sextiles and trines",
            PatternKind::Arrow => "Yod with a fourth body opposite one base body, trine the other and semi-sextile the apex",
            PatternKind::Arrowhead => "Opposition with a third body semi-sextile one end and quincunx the other",
            PatternKind::Basket => "Cradle with a fifth body squaring its opposition",
            PatternKind::BoomerangYod => "Yod with a body opposite the apex, semi-sextile the base",
            PatternKind::Butterfly => "Opposition and trine linked by semi-sextiles and quincunxes",
            PatternKind::Castle => "T-Square whose apex anchors a Grand Trine",
            PatternKind::Cradle => "Four bodies spanning an opposition in three sextile steps",
            PatternKind::Crossbow => "T-Square with a fourth body semi-square the apex and one end",
            PatternKind::Diamond => "Opposition bisected by a square of semi-squares and sesquiquadrates",
            PatternKind::DoubleTSquare => "Two parallel oppositions squared by one body",
            PatternKind::GrandQuintile => "Five bodies spaced 72 degrees apart",
            PatternKind::GrandSextile => "Six bodies spaced 60 degrees apart",
            PatternKind::HammerOfThor => "Square with both ends sesquiquadrate a third body",
            PatternKind::Hexagon => "Six bodies in a closed ring of sextiles",
            PatternKind::Hourglass => "Two oppositions crossed by semi-squares and sesquiquadrates",
            PatternKind::Pentagram => "Five bodies joined by biquintiles in a star",
            PatternKind::Rectangle => "Two oppositions joined by semi-sextiles and quincunxes",
            PatternKind::Rosetta => "Two T-Squares linked by trines",
            PatternKind::Shield => "Sextile, trine and two squares around an opposition",
            PatternKind::Star => "Grand Trine with two bodies opposite its vertices",
            PatternKind::StarOfDavid => "Two interlocking Grand Trines",
            PatternKind::Trapezoid => "Four bodies in semi-sextile, sextile, semi-sextile steps",
            PatternKind::Wedge => "Opposition with a third body trine one end and sextile the other",
            PatternKind::Bundle => "All bodies within a third of the zodiac",
            PatternKind::Bowl => "All bodies within half of the zodiac",
            PatternKind::Bucket => "A bowl with a single body as the handle",
            PatternKind::Locomotive => "Bodies spread over two thirds of the zodiac with one wide gap",
            PatternKind::Seesaw => "Two opposing groups separated by empty arcs",
            PatternKind::Splash => "Bodies scattered across most of the houses",
        }
    }

    pub fn is_distribution_shape(self) -> bool {
        matches!(
            self,
            PatternKind::Bundle
                | PatternKind::Bowl
                | PatternKind::Bucket
                | PatternKind::Locomotive
                | PatternKind::Seesaw
                | PatternKind::Splash
        )
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A detected pattern. Bodies are listed in role order for aspect patterns
/// and in catalog order for stelliums and distribution shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: PatternKind,
    pub bodies: Vec<CelestialBody>,
    pub description: String,
}

impl Pattern {
    pub fn new(name: PatternKind, bodies: Vec<CelestialBody>) -> Self {
        Self {
            name,
            bodies,
            description: name.description().to_string(),
        }
    }

    pub fn arity(&self) -> usize {
        self.bodies.len()
    }
}

/// Calibrated thresholds for the distribution shapes, in degrees unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapeThresholds {
    /// Fewer bodies than this never form a shape.
    pub min_bodies: usize,
    pub bundle_max_span: f64,
    pub bowl_max_span: f64,
    /// Minimum empty arc on each side of a bucket handle.
    pub bucket_handle_gap: f64,
    /// Minimum largest gap for a locomotive.
    pub locomotive_min_gap: f64,
    /// Minimum size of each of the two empty arcs of a seesaw.
    pub seesaw_min_gap: f64,
    /// Occupied houses (or signs, without cusps) needed for a splash.
    pub splash_min_occupied: usize,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            min_bodies: 7,
            bundle_max_span: 120.0,
            bowl_max_span: 180.0,
            bucket_handle_gap: 60.0,
            locomotive_min_gap: 120.0,
            seesaw_min_gap: 60.0,
            splash_min_occupied: 10,
        }
    }
}

/// Settings for pattern detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSettings {
    /// Orb overrides for pattern predicates; the aspect orbs apply otherwise.
    pub orbs: BTreeMap<AspectKind, f64>,
    pub include_shapes: bool,
    pub shapes: ShapeThresholds,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            orbs: BTreeMap::new(),
            include_shapes: true,
            shapes: ShapeThresholds::default(),
        }
    }
}
