pub mod scoring;

pub use scoring::{
    calculate_readiness, readiness_from_position, score_readiness, ReadinessInput,
    ReadinessLevel, ReadinessOutput,
};
