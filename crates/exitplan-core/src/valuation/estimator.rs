//! EBITDA-multiple valuation adjusted for owner dependency and customer
//! concentration.
//!
//! ```text
//! ebitda            = revenue × margin / 100
//! adjusted multiple = benchmark average × owner multiplier × customer multiplier
//! value             = round(ebitda × adjusted multiple)
//! ```
//!
//! The owner multiplier steps up with the centricity score and the customer
//! multiplier steps down with top-customer share, so value is monotone in
//! both inputs for any config that passes [`EngineConfig::validate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::industry::comparison::{compare_to_benchmark, BenchmarkComparison};
use crate::industry::{benchmark_for, IndustryKey};
use crate::profile::{BusinessProfile, NormalizedProfile};
use crate::types::{round_whole, with_metadata, ComputationOutput, Money, Multiple, Percent, Score};
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationBreakdown {
    pub industry: IndustryKey,
    pub ebitda: Money,
    pub base_multiple: Multiple,
    pub owner_multiplier: Multiple,
    pub customer_multiplier: Multiple,
    pub adjusted_multiple: Multiple,
    pub estimated_value: Money,
}

/// Valuations at the benchmark's low / average / high multiples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: Money,
    pub mid: Money,
    pub high: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationOutput {
    pub valuation: ValuationBreakdown,
    pub range: ValueRange,
    pub benchmark: BenchmarkComparison,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn owner_multiplier(owner_centricity_score: Score, config: &EngineConfig) -> Multiple {
    config.owner_multiplier.at_or_above(owner_centricity_score)
}

pub fn customer_multiplier(top_customer_percentage: Percent, config: &EngineConfig) -> Multiple {
    config.customer_multiplier.below(top_customer_percentage)
}

/// Both risk multipliers combined.
pub fn risk_adjustment(profile: &NormalizedProfile, config: &EngineConfig) -> Multiple {
    owner_multiplier(profile.owner_centricity_score, config)
        * customer_multiplier(profile.top_customer_percentage, config)
}

/// Full working of the point estimate.
pub fn value_breakdown(profile: &NormalizedProfile, config: &EngineConfig) -> ValuationBreakdown {
    let benchmark = benchmark_for(profile.industry_key);
    let ebitda = profile.ebitda();
    let base_multiple = benchmark.multiples.average;
    let owner = owner_multiplier(profile.owner_centricity_score, config);
    let customer = customer_multiplier(profile.top_customer_percentage, config);
    let adjusted_multiple = base_multiple * owner * customer;

    ValuationBreakdown {
        industry: profile.industry_key,
        ebitda,
        base_multiple,
        owner_multiplier: owner,
        customer_multiplier: customer,
        adjusted_multiple,
        estimated_value: round_whole(ebitda * adjusted_multiple).max(Decimal::ZERO),
    }
}

/// Estimated current business value. Deterministic and never negative.
pub fn estimate_value(profile: &NormalizedProfile, config: &EngineConfig) -> Money {
    value_breakdown(profile, config).estimated_value
}

pub fn estimate_value_range(profile: &NormalizedProfile, config: &EngineConfig) -> ValueRange {
    let multiples = benchmark_for(profile.industry_key).multiples;
    let ebitda = profile.ebitda();
    let adj = risk_adjustment(profile, config);
    let at = |m: Multiple| round_whole(ebitda * m * adj).max(Decimal::ZERO);

    ValueRange {
        low: at(multiples.low),
        mid: at(multiples.average),
        high: at(multiples.high),
    }
}

/// Normalise a raw profile and value it, wrapped in the standard envelope.
pub fn calculate_valuation(
    input: &BusinessProfile,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<ValuationOutput>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, mut warnings) = input.normalize();
    if profile.ebitda().is_zero() {
        warnings.push("EBITDA is zero; estimated value is zero".into());
    }

    let output = ValuationOutput {
        valuation: value_breakdown(&profile, config),
        range: estimate_value_range(&profile, config),
        benchmark: compare_to_benchmark(&profile),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EBITDA Multiple Valuation (owner and customer risk adjusted)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn example_profile() -> BusinessProfile {
        BusinessProfile {
            revenue: dec!(2500000),
            profit_margin: dec!(12),
            industry: "professional-services".into(),
            owner_centricity_score: Some(dec!(45)),
            top_customer_percentage: Some(dec!(35)),
            ..Default::default()
        }
    }

    #[test]
    fn test_worked_example() {
        let (p, _) = example_profile().normalize();
        let b = value_breakdown(&p, &EngineConfig::default());
        assert_eq!(b.ebitda, dec!(300000));
        assert_eq!(b.base_multiple, dec!(3.5));
        assert_eq!(b.owner_multiplier, dec!(0.9));
        assert_eq!(b.customer_multiplier, dec!(0.95));
        // 300000 * 3.5 * 0.9 * 0.95 = 897750
        assert_eq!(b.estimated_value, dec!(897750));
    }

    #[test]
    fn test_owner_multiplier_tiers() {
        let cfg = EngineConfig::default();
        assert_eq!(owner_multiplier(dec!(100), &cfg), dec!(1.2));
        assert_eq!(owner_multiplier(dec!(85), &cfg), dec!(1.2));
        assert_eq!(owner_multiplier(dec!(84.9), &cfg), dec!(1.1));
        assert_eq!(owner_multiplier(dec!(70), &cfg), dec!(1.1));
        assert_eq!(owner_multiplier(dec!(55), &cfg), dec!(1.0));
        assert_eq!(owner_multiplier(dec!(40), &cfg), dec!(0.9));
        assert_eq!(owner_multiplier(dec!(39), &cfg), dec!(0.8));
    }

    #[test]
    fn test_customer_multiplier_tiers() {
        let cfg = EngineConfig::default();
        assert_eq!(customer_multiplier(Decimal::ZERO, &cfg), dec!(1.1));
        assert_eq!(customer_multiplier(dec!(14.9), &cfg), dec!(1.1));
        assert_eq!(customer_multiplier(dec!(15), &cfg), dec!(1.0));
        assert_eq!(customer_multiplier(dec!(25), &cfg), dec!(0.95));
        assert_eq!(customer_multiplier(dec!(40), &cfg), dec!(0.85));
        assert_eq!(customer_multiplier(dec!(60), &cfg), dec!(0.75));
        assert_eq!(customer_multiplier(dec!(100), &cfg), dec!(0.75));
    }

    #[test]
    fn test_value_range_brackets_point_estimate() {
        let (p, _) = example_profile().normalize();
        let cfg = EngineConfig::default();
        let range = estimate_value_range(&p, &cfg);
        assert_eq!(range.mid, estimate_value(&p, &cfg));
        assert!(range.low < range.mid && range.mid < range.high);
        // 300000 * 2.5 * 0.855 = 641250
        assert_eq!(range.low, dec!(641250));
    }

    #[test]
    fn test_zero_revenue_zero_value_with_warning() {
        let mut input = example_profile();
        input.revenue = Decimal::ZERO;
        let out = calculate_valuation(&input, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.valuation.estimated_value, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("EBITDA")));
    }

    #[test]
    fn test_deterministic() {
        let (p, _) = example_profile().normalize();
        let cfg = EngineConfig::default();
        let first = estimate_value(&p, &cfg);
        for _ in 0..10 {
            assert_eq!(estimate_value(&p, &cfg), first);
        }
    }
}
