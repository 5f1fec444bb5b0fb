use thiserror::Error;

/// Errors surfaced by the exit-planning engine.
///
/// The primitive calculations are total over their inputs; errors come from
/// rejected configuration, empty questionnaires, or a failing enhancer.
#[derive(Debug, Error)]
pub enum ExitPlanError {
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Recommendation enhancement failed: {0}")]
    Enhancement(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ExitPlanError {
    fn from(e: serde_json::Error) -> Self {
        ExitPlanError::SerializationError(e.to_string())
    }
}
