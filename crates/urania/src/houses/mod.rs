pub mod calculator;
pub mod types;

pub use calculator::{
    ascendant, calculate_houses, calculate_houses_with_fallback, midheaven, POLAR_FALLBACK_SYSTEM,
};
pub use types::{assign_house, HouseCusp, HousePositions, HouseSystem};
