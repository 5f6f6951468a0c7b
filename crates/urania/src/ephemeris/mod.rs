pub mod analytic;
pub mod provider;
#[cfg(feature = "swiss-ephemeris")]
pub mod swiss;
pub mod types;

pub use analytic::AnalyticEphemeris;
pub use provider::{PositionProvider, PositionSet};
#[cfg(feature = "swiss-ephemeris")]
pub use swiss::SwissEphemeris;
pub use types::{BodyPosition, CelestialBody, GeoLocation};
