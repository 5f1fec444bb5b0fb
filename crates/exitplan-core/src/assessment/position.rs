//! Business position assessment.
//!
//! Derives eight 0-100 sub-scores from a normalised profile. Every sub-score
//! is a weighted linear combination of normalised inputs, clamped to
//! [0, 100] and rounded half away from zero:
//!
//! | sub-score                | combination                                                        |
//! |--------------------------|--------------------------------------------------------------------|
//! | operational independence | 0.4·centricity + 0.3·min(levels·20, 100) + 0.3·documentation       |
//! | customer portfolio       | 0.3·concentration + 0.2·diversity + 0.25·stability + 0.25·contract |
//! | revenue strength         | 0.6·size + 0.4·productivity                                        |
//! | profitability            | piecewise linear over the benchmark margin range                   |
//! | management capability    | 0.6·min(levels·20, 100) + 0.4·centricity                           |
//! | financial controls       | 0.5·documentation + 0.5·profitability                              |
//! | competitive position     | 0.5·profitability + 0.5·concentration                              |
//! | growth potential         | 0.6·min(100, growth·5) + 0.4·contracted revenue                    |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{CustomerRiskThresholds, EngineConfig, StatusThresholds};
use crate::industry::{benchmark_for, IndustryKey};
use crate::profile::{BusinessProfile, NormalizedProfile};
use crate::types::{
    clamp_percent, round_whole, with_metadata, ComputationOutput, Impact, Percent, Score,
    ScoreStatus, SubScore,
};
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One weighted input to a composite sub-score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorScore {
    pub score: Score,
    /// Weight in percent of the composite
    pub weight: Percent,
    pub status: ScoreStatus,
}

/// A rule-based action item attached to a sub-score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub action: String,
    pub priority: u32,
    pub impact: Impact,
    pub specifics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value_increase: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalFactors {
    pub owner_centricity: FactorScore,
    pub management_depth: FactorScore,
    pub process_documentation: FactorScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalIndependence {
    pub score: Score,
    pub status: ScoreStatus,
    pub factors: OperationalFactors,
    pub action_items: Vec<ActionItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerFactors {
    pub concentration: FactorScore,
    pub diversity: FactorScore,
    pub stability: FactorScore,
    pub contract_strength: FactorScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPortfolio {
    pub score: Score,
    pub status: ScoreStatus,
    pub factors: CustomerFactors,
    pub risk_level: RiskLevel,
    pub action_items: Vec<ActionItem>,
}

/// All position sub-scores for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionScores {
    pub industry: IndustryKey,
    pub revenue_strength: SubScore,
    pub profitability: SubScore,
    pub operational_independence: OperationalIndependence,
    pub customer_portfolio: CustomerPortfolio,
    pub management_capability: SubScore,
    pub financial_controls: SubScore,
    pub competitive_position: SubScore,
    pub growth_potential: SubScore,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Revenue at which the size component saturates.
const REVENUE_SCALE: Decimal = dec!(5000000);
/// Revenue per employee at which productivity saturates.
const PRODUCTIVITY_SCALE: Decimal = dec!(200000);
/// Productivity used when the head-count is unknown.
const NEUTRAL_PRODUCTIVITY: Score = dec!(50);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score a business's current position.
pub fn assess_position(profile: &NormalizedProfile, config: &EngineConfig) -> PositionScores {
    let status = &config.status;

    let profitability = score_profitability(profile);
    let operational = score_operational_independence(profile, status);
    let customer = score_customer_portfolio(profile, status, &config.customer_risk);

    let depth = management_depth_score(profile.management_levels);
    let management =
        round_whole(clamp_percent(depth * dec!(0.6) + profile.owner_centricity_score * dec!(0.4)));
    let controls = round_whole(clamp_percent(
        profile.process_documentation * dec!(0.5) + profitability * dec!(0.5),
    ));
    let competitive = round_whole(clamp_percent(
        profitability * dec!(0.5) + customer.factors.concentration.score * dec!(0.5),
    ));
    let growth = round_whole(clamp_percent(
        clamp_percent(profile.revenue_growth_rate * dec!(5)) * dec!(0.6)
            + profile.contracted_revenue_percentage * dec!(0.4),
    ));

    PositionScores {
        industry: profile.industry_key,
        revenue_strength: sub_score(score_revenue_strength(profile), status),
        profitability: sub_score(profitability, status),
        operational_independence: operational,
        customer_portfolio: customer,
        management_capability: sub_score(management, status),
        financial_controls: sub_score(controls, status),
        competitive_position: sub_score(competitive, status),
        growth_potential: sub_score(growth, status),
    }
}

/// Normalise a raw profile and assess it, wrapped in the standard envelope.
pub fn calculate_position(
    input: &BusinessProfile,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<PositionScores>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, warnings) = input.normalize();
    let scores = assess_position(&profile, config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Business Position Assessment (weighted sub-scores)",
        input,
        warnings,
        elapsed,
        scores,
    ))
}

// ---------------------------------------------------------------------------
// Scoring helpers
// ---------------------------------------------------------------------------

fn sub_score(score: Score, status: &StatusThresholds) -> SubScore {
    SubScore {
        score,
        status: status.classify(score),
    }
}

fn factor(score: Score, weight: Percent, status: &StatusThresholds) -> FactorScore {
    FactorScore {
        score,
        weight,
        status: status.classify(score),
    }
}

fn management_depth_score(levels: u32) -> Score {
    (Decimal::from(levels) * dec!(20)).min(dec!(100))
}

fn score_revenue_strength(profile: &NormalizedProfile) -> Score {
    let size = clamp_percent(profile.revenue / REVENUE_SCALE * dec!(100));
    let productivity = if profile.employees > 0 {
        let per_head = profile.revenue / Decimal::from(profile.employees);
        clamp_percent(per_head / PRODUCTIVITY_SCALE * dec!(100))
    } else {
        NEUTRAL_PRODUCTIVITY
    };
    round_whole(clamp_percent(size * dec!(0.6) + productivity * dec!(0.4)))
}

/// Low margin maps to 40, average to 70, high to 100, linear in between.
fn score_profitability(profile: &NormalizedProfile) -> Score {
    let range = benchmark_for(profile.industry_key).profit_margin;
    let m = profile.profit_margin;

    let raw = if m <= Decimal::ZERO {
        Decimal::ZERO
    } else if m < range.low {
        m / range.low * dec!(40)
    } else if m < range.average {
        dec!(40) + (m - range.low) / (range.average - range.low) * dec!(30)
    } else if m < range.high {
        dec!(70) + (m - range.average) / (range.high - range.average) * dec!(30)
    } else {
        dec!(100)
    };
    round_whole(clamp_percent(raw))
}

fn score_operational_independence(
    profile: &NormalizedProfile,
    status: &StatusThresholds,
) -> OperationalIndependence {
    let centricity = profile.owner_centricity_score;
    let depth = management_depth_score(profile.management_levels);
    let documentation = profile.process_documentation;

    let score = round_whole(clamp_percent(
        centricity * dec!(0.4) + depth * dec!(0.3) + documentation * dec!(0.3),
    ));

    OperationalIndependence {
        score,
        status: status.classify(score),
        factors: OperationalFactors {
            owner_centricity: factor(centricity, dec!(40), status),
            management_depth: factor(depth, dec!(30), status),
            process_documentation: factor(documentation, dec!(30), status),
        },
        action_items: operational_action_items(
            centricity,
            profile.management_levels,
            documentation,
        ),
    }
}

fn score_customer_portfolio(
    profile: &NormalizedProfile,
    status: &StatusThresholds,
    risk: &CustomerRiskThresholds,
) -> CustomerPortfolio {
    let top = profile.top_customer_percentage;
    let concentration = (dec!(100) - top * dec!(2)).max(Decimal::ZERO);
    let diversity = (Decimal::from(profile.total_customers) * dec!(2)).min(dec!(100));
    let stability = (profile.avg_customer_tenure * dec!(20)).min(dec!(100));
    let contract = profile.contracted_revenue_percentage;

    let score = round_whole(clamp_percent(
        concentration * dec!(0.3)
            + diversity * dec!(0.2)
            + stability * dec!(0.25)
            + contract * dec!(0.25),
    ));

    CustomerPortfolio {
        score,
        status: status.classify(score),
        factors: CustomerFactors {
            concentration: factor(concentration, dec!(30), status),
            diversity: factor(diversity, dec!(20), status),
            stability: factor(stability, dec!(25), status),
            contract_strength: factor(contract, dec!(25), status),
        },
        risk_level: customer_risk_level(top, profile.total_customers, risk),
        action_items: customer_action_items(top, contract),
    }
}

fn customer_risk_level(
    top_customer_pct: Percent,
    customer_count: u32,
    t: &CustomerRiskThresholds,
) -> RiskLevel {
    if top_customer_pct > t.high_concentration_above || customer_count < t.high_customers_below {
        RiskLevel::High
    } else if top_customer_pct > t.medium_concentration_above
        || customer_count < t.medium_customers_below
    {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

// ---------------------------------------------------------------------------
// Action items
// ---------------------------------------------------------------------------

fn operational_action_items(
    centricity: Score,
    management_levels: u32,
    documentation: Percent,
) -> Vec<ActionItem> {
    let mut items = Vec::new();

    if centricity < dec!(70) {
        let severe = centricity < dec!(50);
        items.push(ActionItem {
            action: "Reduce Owner Dependency".into(),
            priority: 1,
            impact: Impact::High,
            specifics: vec![
                if severe {
                    "Hire General Manager/COO immediately".into()
                } else {
                    "Promote senior employee to management role".into()
                },
                "Document all critical business processes".into(),
                "Cross-train employees in owner-dependent functions".into(),
                "Implement management reporting dashboard".into(),
            ],
            timeline: Some(if severe { "6-12 months" } else { "3-9 months" }.into()),
            estimated_cost: Some(if severe { "$120K-180K" } else { "$40K-80K" }.into()),
            estimated_value_increase: Some(format!(
                "{}% business value increase",
                round_whole((dec!(70) - centricity) * dec!(0.4))
            )),
        });
    }

    if management_levels < 3 {
        items.push(ActionItem {
            action: "Develop Management Team Depth".into(),
            priority: 2,
            impact: Impact::MediumHigh,
            specifics: vec![
                "Create management development program".into(),
                "Promote high-performing employees".into(),
                "Hire experienced middle managers".into(),
                "Implement succession planning for key roles".into(),
            ],
            timeline: None,
            estimated_cost: None,
            estimated_value_increase: None,
        });
    }

    if documentation < dec!(60) {
        items.push(ActionItem {
            action: "Document Critical Business Processes".into(),
            priority: 3,
            impact: Impact::Medium,
            specifics: vec![
                "Document standard operating procedures (SOPs)".into(),
                "Create training manuals for key positions".into(),
                "Implement quality management system".into(),
                "Document customer and vendor relationship procedures".into(),
            ],
            timeline: None,
            estimated_cost: None,
            estimated_value_increase: None,
        });
    }

    items
}

fn customer_action_items(top_customer_pct: Percent, contracted_pct: Percent) -> Vec<ActionItem> {
    let mut items = Vec::new();

    if top_customer_pct > dec!(25) {
        items.push(ActionItem {
            action: "Reduce Customer Concentration Risk".into(),
            priority: 1,
            impact: Impact::High,
            specifics: vec![
                format!("Current: {top_customer_pct}% revenue concentration; target <20% from any single customer"),
                "Develop new customer acquisition strategy".into(),
                "Strengthen relationships with top 10 customers".into(),
                "Implement customer retention program".into(),
                "Diversify into new market segments or geographic areas".into(),
            ],
            timeline: Some("12-18 months".into()),
            estimated_cost: None,
            estimated_value_increase: Some(format!(
                "{}% business value increase",
                round_whole((top_customer_pct - dec!(20)) * dec!(0.5))
            )),
        });
    }

    if contracted_pct < dec!(50) {
        items.push(ActionItem {
            action: "Increase Contracted Revenue Base".into(),
            priority: 2,
            impact: Impact::MediumHigh,
            specifics: vec![
                format!("Current: {contracted_pct}% contracted revenue; target >70%"),
                "Improved revenue predictability".into(),
                "Higher business valuation multiple".into(),
                "Reduced buyer risk perception".into(),
                "Easier financing for potential buyers".into(),
            ],
            timeline: None,
            estimated_cost: None,
            estimated_value_increase: None,
        });
    }

    items
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
