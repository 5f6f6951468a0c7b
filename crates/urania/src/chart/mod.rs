pub mod assembler;
pub mod summary;
pub mod types;

pub use assembler::{midpoints, tally, ChartEngine};
pub use types::{BirthChart, ChartOptions, ChartRequest, ChartSummary, Midpoint, Tallies, TransitAspects};
