//! Return-on-investment estimates for the four improvement opportunities.
//!
//! Every opportunity follows the same shape:
//!
//! ```text
//! value increase = value × base uplift + value × improvement × improvement uplift
//! investment     = annual cost × months / 12   (or a one-off cost)
//! roi            = round(value increase / investment × 100)
//! payback months = investment / (value increase × payback return) × 12
//! ```
//!
//! where `improvement` is the fractional distance from the current metric to
//! its target. Financial performance is the exception: its value increase is
//! the extra EBITDA from closing the margin gap, capitalised at the adjusted
//! multiple.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, OpportunityParams};
use crate::industry::benchmark_for;
use crate::profile::NormalizedProfile;
use crate::types::{round_whole, Difficulty, Money, Percent};
use crate::valuation::estimator::value_breakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    ManagementDevelopment,
    FinancialPerformance,
    CustomerPortfolio,
    ProcessDocumentation,
}

impl std::fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManagementDevelopment => write!(f, "Management Team Development"),
            Self::FinancialPerformance => write!(f, "Financial Performance Optimization"),
            Self::CustomerPortfolio => write!(f, "Customer Portfolio Optimization"),
            Self::ProcessDocumentation => write!(f, "Process Documentation & Systematization"),
        }
    }
}

/// Costed estimate for one opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub kind: OpportunityKind,
    /// Current level of the driving metric
    pub current: Decimal,
    pub target: Decimal,
    /// Whole-currency value increase
    pub value_increase: Money,
    pub investment: Money,
    /// Percent; 0 when the investment is zero
    pub roi: Percent,
    pub timeline_months: u32,
    pub difficulty: Difficulty,
    /// `None` when the value increase is zero or the period is unbounded
    pub payback_months: Option<Decimal>,
    /// Whether the ROI clears the opportunity's threshold and there is a gap
    /// to close.
    pub qualifies: bool,
}

fn estimate(
    kind: OpportunityKind,
    params: &OpportunityParams,
    payback_return: Decimal,
    current: Decimal,
    target: Decimal,
    raw_increase: Money,
    difficulty: Difficulty,
) -> RoiEstimate {
    let investment = params.investment();
    let roi = if investment > Decimal::ZERO {
        round_whole(raw_increase / investment * dec!(100))
    } else {
        Decimal::ZERO
    };
    let annual_return = raw_increase * payback_return;
    let payback_months = if annual_return > Decimal::ZERO {
        investment
            .checked_div(annual_return)
            .and_then(|years| years.checked_mul(dec!(12)))
            .map(round_whole)
    } else {
        None
    };
    let has_gap = match kind {
        // Lower concentration is better; the other metrics improve upward.
        OpportunityKind::CustomerPortfolio => current > target,
        _ => current < target,
    };

    RoiEstimate {
        kind,
        current,
        target,
        value_increase: round_whole(raw_increase),
        investment,
        roi,
        timeline_months: params.months,
        difficulty,
        payback_months,
        qualifies: has_gap && roi > params.roi_threshold,
    }
}

/// Hire or promote management to lift owner centricity to target.
pub fn management_roi(
    profile: &NormalizedProfile,
    current_value: Money,
    config: &EngineConfig,
) -> RoiEstimate {
    let p = &config.opportunities.management;
    let current = profile.owner_centricity_score;
    let improvement = (p.target - current).max(Decimal::ZERO) / dec!(100);
    let increase =
        current_value * p.base_uplift + current_value * improvement * p.improvement_uplift;
    let difficulty = if current < config.opportunities.difficulty.management_high_below {
        Difficulty::High
    } else {
        Difficulty::Medium
    };
    estimate(
        OpportunityKind::ManagementDevelopment,
        p,
        config.opportunities.payback_return,
        current,
        p.target,
        increase,
        difficulty,
    )
}

/// Close the margin gap to the target (the benchmark average unless
/// configured), capitalised at the adjusted multiple.
pub fn financial_roi(
    profile: &NormalizedProfile,
    current_value: Money,
    config: &EngineConfig,
) -> RoiEstimate {
    let p = &config.opportunities.financial;
    let target = if p.target > Decimal::ZERO {
        p.target
    } else {
        benchmark_for(profile.industry_key).profit_margin.average
    };
    let current = profile.profit_margin;
    let margin_gap = (target - current).max(Decimal::ZERO);
    let adjusted_multiple = value_breakdown(profile, config).adjusted_multiple;
    let extra_ebitda = profile.revenue * margin_gap / dec!(100);
    let increase = current_value * p.base_uplift
        + extra_ebitda * adjusted_multiple * p.improvement_uplift;
    estimate(
        OpportunityKind::FinancialPerformance,
        p,
        config.opportunities.payback_return,
        current,
        target,
        increase,
        Difficulty::Medium,
    )
}

/// Diversify the customer base down to the target concentration.
pub fn customer_roi(
    profile: &NormalizedProfile,
    current_value: Money,
    config: &EngineConfig,
) -> RoiEstimate {
    let p = &config.opportunities.customer;
    let current = profile.top_customer_percentage;
    let risk_reduction = (current - p.target).max(Decimal::ZERO) / dec!(100);
    let increase =
        current_value * risk_reduction * p.improvement_uplift + current_value * p.base_uplift;
    let difficulty = if current > config.opportunities.difficulty.customer_high_above {
        Difficulty::High
    } else {
        Difficulty::Medium
    };
    estimate(
        OpportunityKind::CustomerPortfolio,
        p,
        config.opportunities.payback_return,
        current,
        p.target,
        increase,
        difficulty,
    )
}

/// Document processes up to the target coverage.
pub fn process_roi(
    profile: &NormalizedProfile,
    current_value: Money,
    config: &EngineConfig,
) -> RoiEstimate {
    let p = &config.opportunities.process;
    let current = profile.process_documentation;
    let gap = (p.target - current).max(Decimal::ZERO) / dec!(100);
    let increase = current_value * p.base_uplift + current_value * gap * p.improvement_uplift;
    estimate(
        OpportunityKind::ProcessDocumentation,
        p,
        config.opportunities.payback_return,
        current,
        p.target,
        increase,
        Difficulty::Low,
    )
}

/// All four estimates, qualifying or not, in catalogue order.
pub fn estimate_all(
    profile: &NormalizedProfile,
    current_value: Money,
    config: &EngineConfig,
) -> Vec<RoiEstimate> {
    vec![
        management_roi(profile, current_value, config),
        financial_roi(profile, current_value, config),
        customer_roi(profile, current_value, config),
        process_roi(profile, current_value, config),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::BusinessProfile;
    use crate::valuation::estimator::estimate_value;

    fn example() -> (NormalizedProfile, Money) {
        let (p, _) = BusinessProfile {
            revenue: dec!(2500000),
            profit_margin: dec!(12),
            industry: "professional-services".into(),
            owner_centricity_score: Some(dec!(45)),
            top_customer_percentage: Some(dec!(35)),
            ..Default::default()
        }
        .normalize();
        let value = estimate_value(&p, &EngineConfig::default());
        (p, value)
    }

    #[test]
    fn test_management_below_threshold() {
        let (p, v) = example();
        let m = management_roi(&p, v, &EngineConfig::default());
        // 897750 * 0.15 + 897750 * 0.40 * 0.25 = 134662.5 + 89775
        assert_eq!(m.value_increase, dec!(224438));
        assert_eq!(m.investment, dec!(150000));
        assert_eq!(m.roi, dec!(150));
        assert_eq!(m.difficulty, Difficulty::Medium);
        assert!(!m.qualifies);
    }

    #[test]
    fn test_financial_margin_gap() {
        let (p, v) = example();
        let f = financial_roi(&p, v, &EngineConfig::default());
        assert_eq!(f.target, dec!(15));
        // 2.5M * 3% * 2.9925 = 224437.5 over 45000
        assert_eq!(f.investment, dec!(45000));
        assert_eq!(f.roi, dec!(499));
        assert!(f.qualifies);
    }

    #[test]
    fn test_customer_risk_premium() {
        let (p, v) = example();
        let c = customer_roi(&p, v, &EngineConfig::default());
        // 897750 * 0.20 * 0.20 + 897750 * 0.10 = 125685
        assert_eq!(c.value_increase, dec!(125685));
        assert_eq!(c.roi, dec!(157));
        assert!(c.qualifies);
    }

    #[test]
    fn test_process_documentation() {
        let (p, v) = example();
        let d = process_roi(&p, v, &EngineConfig::default());
        // 897750 * 0.5 * 0.2 = 89775 over 30000
        assert_eq!(d.value_increase, dec!(89775));
        assert_eq!(d.roi, dec!(299));
        assert_eq!(d.difficulty, Difficulty::Low);
        // 30000 / (89775 * 0.05) * 12 = 80.2
        assert_eq!(d.payback_months, Some(dec!(80)));
    }

    #[test]
    fn test_no_gap_never_qualifies() {
        let (mut p, _) = example();
        p.top_customer_percentage = dec!(10);
        p.process_documentation = dec!(90);
        // Large value so the flat uplift alone would clear any threshold
        let value = dec!(100000000);
        let cfg = EngineConfig::default();
        assert!(!customer_roi(&p, value, &cfg).qualifies);
        assert!(!process_roi(&p, value, &cfg).qualifies);
    }

    #[test]
    fn test_difficulty_cut_offs_configurable() {
        let (p, v) = example();
        let mut cfg = EngineConfig::default();
        cfg.opportunities.difficulty.management_high_below = dec!(50);
        cfg.opportunities.difficulty.customer_high_above = dec!(30);
        assert_eq!(management_roi(&p, v, &cfg).difficulty, Difficulty::High);
        assert_eq!(customer_roi(&p, v, &cfg).difficulty, Difficulty::High);
    }

    #[test]
    fn test_vanishing_return_has_no_payback() {
        let (p, _) = example();
        let mut cfg = EngineConfig::default();
        cfg.opportunities.payback_return = dec!(0.0000000000000000000000000001);
        let d = process_roi(&p, dec!(1000), &cfg);
        assert_eq!(d.payback_months, None);
    }

    #[test]
    fn test_zero_value_has_no_payback() {
        let (p, _) = example();
        let d = process_roi(&p, Decimal::ZERO, &EngineConfig::default());
        assert_eq!(d.roi, Decimal::ZERO);
        assert_eq!(d.payback_months, None);
        assert!(!d.qualifies);
    }
}
