pub mod estimator;

#[cfg(feature = "value_tracker")]
pub mod value_tracker;

pub use estimator::{
    calculate_valuation, estimate_value, estimate_value_range, value_breakdown, ValuationOutput,
    ValueRange,
};
