//! Birth-chart geometry: civil time to Julian Day, body positions, houses,
//! aspects and multi-body aspect patterns.

pub mod angles;
pub mod aspects;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod patterns;
pub mod time;
pub mod western;

pub use aspects::{Aspect, AspectCalculator, AspectKind, AspectSettings};
pub use chart::{BirthChart, ChartEngine, ChartOptions, ChartRequest, ChartSummary};
pub use ephemeris::{AnalyticEphemeris, BodyPosition, CelestialBody, GeoLocation, PositionProvider};
#[cfg(feature = "swiss-ephemeris")]
pub use ephemeris::SwissEphemeris;
pub use error::{ChartError, ChartWarning};
pub use houses::{calculate_houses, HousePositions, HouseSystem};
pub use patterns::{Pattern, PatternDetector, PatternKind, PatternSettings, ShapeThresholds};
pub use time::{BirthDateTime, TimeNormalizer};
