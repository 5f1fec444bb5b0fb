pub mod position;

#[cfg(feature = "owner_centricity")]
pub mod owner_centricity;

pub use position::{assess_position, calculate_position, PositionScores};
