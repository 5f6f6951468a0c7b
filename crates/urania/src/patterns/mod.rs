pub mod catalog;
pub mod distribution;
pub mod matcher;
pub mod types;

pub use catalog::{Edge, PatternDefinition, Rule, PATTERN_TABLE};
pub use distribution::classify_distribution;
pub use matcher::{detect_patterns, is_duplicate, PatternDetector};
pub use types::{Pattern, PatternKind, PatternSettings, ShapeThresholds};
