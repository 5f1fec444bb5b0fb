pub mod calculator;

pub use calculator::{calculate_wealth_gap, compute_wealth_gap, WealthGapInputs, WealthGapOutput};
