use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::angles::normalize_degrees;
use crate::western::{decan_index, format_degree, ZodiacSign};

/// Geographic location coordinates (degrees, north and east positive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lon: f64,
}

/// Bodies the engine can place on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Chiron,
}

impl CelestialBody {
    /// Catalog order; charts list bodies in this order.
    pub const ALL: [CelestialBody; 13] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::NorthNode,
        CelestialBody::SouthNode,
        CelestialBody::Chiron,
    ];

    /// Sun through Pluto.
    pub const PLANETS: [CelestialBody; 10] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
    ];

    /// Bodies every chart must contain; a provider fails without them.
    pub const ESSENTIAL: [CelestialBody; 5] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
    ];

    /// Sun through Mars, the default subset for element/modality tallies.
    pub const INNER: [CelestialBody; 5] = Self::ESSENTIAL;

    pub fn is_essential(self) -> bool {
        Self::ESSENTIAL.contains(&self)
    }

    pub fn id(self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Moon => "moon",
            CelestialBody::Mercury => "mercury",
            CelestialBody::Venus => "venus",
            CelestialBody::Mars => "mars",
            CelestialBody::Jupiter => "jupiter",
            CelestialBody::Saturn => "saturn",
            CelestialBody::Uranus => "uranus",
            CelestialBody::Neptune => "neptune",
            CelestialBody::Pluto => "pluto",
            CelestialBody::NorthNode => "north_node",
            CelestialBody::SouthNode => "south_node",
            CelestialBody::Chiron => "chiron",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CelestialBody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CelestialBody::ALL
            .iter()
            .copied()
            .find(|b| b.id() == lower)
            .ok_or_else(|| format!("Unknown body: {}", s))
    }
}

/// Position of one body at one instant. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: CelestialBody,
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Geocentric distance in AU
    pub distance: f64,
    /// Speed in longitude (degrees per day); negative when retrograde
    pub longitude_speed: f64,
    pub sign: ZodiacSign,
    pub retrograde: bool,
    pub formatted_degree: String,
    pub decan: u8,
}

impl BodyPosition {
    /// Build a position, deriving sign, retrograde flag and formatting from the raw values.
    pub fn new(body: CelestialBody, longitude: f64, latitude: f64, distance: f64, longitude_speed: f64) -> Self {
        let longitude = normalize_degrees(longitude);
        Self {
            body,
            longitude,
            latitude,
            distance,
            longitude_speed,
            sign: ZodiacSign::from_longitude(longitude),
            retrograde: longitude_speed < 0.0,
            formatted_degree: format_degree(longitude),
            decan: decan_index(longitude),
        }
    }

    /// Position of a point that only has a longitude (test fixtures, derived points).
    pub fn at_longitude(body: CelestialBody, longitude: f64) -> Self {
        Self::new(body, longitude, 0.0, 0.0, 0.0)
    }

    /// The same body reflected through the ecliptic centre (South Node from North Node).
    pub fn opposite(&self, body: CelestialBody) -> Self {
        Self::new(
            body,
            self.longitude + 180.0,
            -self.latitude,
            self.distance,
            self.longitude_speed,
        )
    }
}
