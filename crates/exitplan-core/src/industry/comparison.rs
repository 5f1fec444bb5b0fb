use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::industry::benchmarks::{benchmark_for, IndustryKey};
use crate::profile::NormalizedProfile;
use crate::types::{Percent, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePosition {
    BelowRange,
    WithinRange,
    AboveRange,
}

impl std::fmt::Display for RangePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowRange => write!(f, "Below Range"),
            Self::WithinRange => write!(f, "Within Range"),
            Self::AboveRange => write!(f, "Above Range"),
        }
    }
}

/// How a business sits against its industry benchmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub industry: IndustryKey,
    pub benchmark_margin_average: Percent,
    /// Profit margin minus benchmark average (percentage points)
    pub margin_vs_average: Percent,
    pub margin_position: RangePosition,
    pub owner_centricity_target: Score,
    /// Points still needed to reach the centricity target (0 when met)
    pub owner_centricity_gap: Score,
    pub customer_concentration_limit: Percent,
    /// Points by which the top customer exceeds the limit (0 when within)
    pub concentration_excess: Percent,
    pub key_success_factors: Vec<String>,
    pub common_challenges: Vec<String>,
}

/// Compare a profile against the benchmark row for its industry.
pub fn compare_to_benchmark(profile: &NormalizedProfile) -> BenchmarkComparison {
    let b = benchmark_for(profile.industry_key);
    let margin = profile.profit_margin;

    let margin_position = if margin < b.profit_margin.low {
        RangePosition::BelowRange
    } else if margin > b.profit_margin.high {
        RangePosition::AboveRange
    } else {
        RangePosition::WithinRange
    };

    BenchmarkComparison {
        industry: profile.industry_key,
        benchmark_margin_average: b.profit_margin.average,
        margin_vs_average: margin - b.profit_margin.average,
        margin_position,
        owner_centricity_target: b.owner_centricity_target,
        owner_centricity_gap: (b.owner_centricity_target - profile.owner_centricity_score)
            .max(Decimal::ZERO),
        customer_concentration_limit: b.customer_concentration_limit,
        concentration_excess: (profile.top_customer_percentage - b.customer_concentration_limit)
            .max(Decimal::ZERO),
        key_success_factors: b.key_success_factors.iter().map(|s| s.to_string()).collect(),
        common_challenges: b.common_challenges.iter().map(|s| s.to_string()).collect(),
    }
}
