pub mod normalization;

pub use normalization::{normalize_cash_flow, CashFlowInputs, CashFlowOutput, QualityRating};
