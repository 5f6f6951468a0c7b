//! The fixed twelve-sign tropical zodiac, starting at Aries.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angles::normalize_degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Cardinal, Modality::Fixed, Modality::Mutable];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// `signs[floor(longitude / 30)]`, after normalizing the longitude.
    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index(sign_index(longitude))
    }

    /// Sign at position `index` (mod 12) counted from Aries.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Fire, Earth, Air, Water repeating from Aries.
    pub fn element(self) -> Element {
        Element::ALL[self.index() % 4]
    }

    /// Cardinal, Fixed, Mutable repeating from Aries.
    pub fn modality(self) -> Modality {
        Modality::ALL[self.index() % 3]
    }

    /// Traditional or modern planetary ruler, lowercase body id.
    pub fn ruler(self, modern: bool) -> &'static str {
        const TRADITIONAL_RULERS: [&str; 12] = [
            "mars", "venus", "mercury", "moon", "sun", "mercury", "venus", "mars", "jupiter",
            "saturn", "saturn", "jupiter",
        ];
        match (self, modern) {
            (ZodiacSign::Scorpio, true) => "pluto",
            (ZodiacSign::Aquarius, true) => "uranus",
            (ZodiacSign::Pisces, true) => "neptune",
            _ => TRADITIONAL_RULERS[self.index()],
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sign index (0-11) from an arbitrary longitude.
pub fn sign_index(longitude: f64) -> usize {
    ((normalize_degrees(longitude) / 30.0).floor() as usize).min(11)
}

/// Degrees into the current sign, [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    let lon = normalize_degrees(longitude);
    lon - sign_index(lon) as f64 * 30.0
}

/// Decan (1, 2 or 3) of a longitude within its sign.
pub fn decan_index(longitude: f64) -> u8 {
    match degree_in_sign(longitude) {
        d if d < 10.0 => 1,
        d if d < 20.0 => 2,
        _ => 3,
    }
}

/// Degrees and arc-minutes within the sign, e.g. `15°23' Aries`.
///
/// Minutes are truncated, never rounded, so 29°59.9' stays in the same sign.
pub fn format_degree(longitude: f64) -> String {
    let sign = ZodiacSign::from_longitude(longitude);
    let within = degree_in_sign(longitude);
    let degrees = within.floor();
    let minutes = ((within - degrees) * 60.0).floor().min(59.0);
    format!("{}°{:02}' {}", degrees as u32, minutes as u32, sign)
}
