pub mod calculators;
pub mod planning;
pub mod profile;
pub mod valuation;
