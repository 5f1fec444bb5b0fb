pub mod config;
pub mod currency;
pub mod error;
pub mod industry;
pub mod profile;
pub mod types;

pub mod assessment;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "cash_flow")]
pub mod cash_flow;

#[cfg(feature = "wealth_gap")]
pub mod wealth_gap;

#[cfg(feature = "recommendations")]
pub mod recommendations;

#[cfg(feature = "readiness")]
pub mod readiness;

#[cfg(all(feature = "recommendations", feature = "readiness"))]
pub mod analysis;

pub use config::EngineConfig;
pub use error::ExitPlanError;
pub use profile::{BusinessProfile, NormalizedProfile};
pub use types::*;

/// Standard result type for all exit-planning operations
pub type ExitPlanResult<T> = Result<T, ExitPlanError>;
