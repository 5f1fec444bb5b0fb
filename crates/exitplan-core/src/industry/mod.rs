pub mod benchmarks;
pub mod comparison;

pub use benchmarks::{benchmark_for, resolve_industry, IndustryBenchmark, IndustryKey};
