use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::position::{assess_position, PositionScores};
use crate::config::{EngineConfig, ImpactThresholds};
use crate::profile::{BusinessProfile, NormalizedProfile};
use crate::recommendations::enhancer::{apply_enhancer, RecommendationEnhancer};
use crate::recommendations::roi::{estimate_all, OpportunityKind, RoiEstimate};
use crate::types::{round_whole, with_metadata, ComputationOutput, Difficulty, Impact, Money, Percent, Score};
use crate::valuation::estimator::estimate_value;
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A ranked improvement recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: OpportunityKind,
    pub action: String,
    pub description: String,
    /// 1 = do first
    pub priority: u32,
    pub impact: Impact,
    pub difficulty: Difficulty,
    pub specifics: Vec<String>,
    pub timeline: String,
    pub timeline_months: u32,
    pub investment: Money,
    pub value_increase: Money,
    pub roi: Percent,
    pub payback_months: Option<Decimal>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub current_value: Money,
    pub recommendations: Vec<Recommendation>,
    /// Every opportunity evaluated, including those below threshold
    pub evaluated: Vec<RoiEstimate>,
    pub total_value_increase: Money,
    pub total_investment: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `1234567.8` -> `$1,234,568`
pub fn format_money(amount: Money) -> String {
    let whole = round_whole(amount);
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < Decimal::ZERO {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// The weaker the related sub-score, the bigger the impact of fixing it.
fn impact_for(score: Score, thresholds: &ImpactThresholds) -> Impact {
    if score < thresholds.high_below {
        Impact::High
    } else if score < thresholds.medium_high_below {
        Impact::MediumHigh
    } else if score < thresholds.medium_below {
        Impact::Medium
    } else {
        Impact::Low
    }
}

fn ranking_key(rec: &Recommendation) -> Decimal {
    rec.roi * rec.difficulty.ranking_factor()
}

fn to_recommendation(
    est: &RoiEstimate,
    profile: &NormalizedProfile,
    scores: &PositionScores,
    config: &EngineConfig,
) -> Recommendation {
    let (action, description, related, specifics) = match est.kind {
        OpportunityKind::ManagementDevelopment => (
            "Hire General Manager/COO",
            "Reduce owner dependency by building a management team that runs daily operations",
            scores.operational_independence.score,
            vec![
                format!(
                    "Raise owner centricity score from {} to {}",
                    est.current, est.target
                ),
                "Define GM responsibilities and decision rights".to_string(),
                "Transfer key customer and supplier relationships".to_string(),
                "Implement management reporting dashboard".to_string(),
            ],
        ),
        OpportunityKind::FinancialPerformance => (
            "Improve Profit Margins",
            "Improve profit margins and financial controls",
            scores.profitability.score,
            vec![
                format!(
                    "Close margin gap from {}% to the {}% benchmark",
                    est.current, est.target
                ),
                "Implement cost reduction program".to_string(),
                "Optimize pricing strategy".to_string(),
                "Improve financial reporting and KPIs".to_string(),
                "Strengthen cash flow management".to_string(),
            ],
        ),
        OpportunityKind::CustomerPortfolio => (
            "Diversify Customer Base",
            "Reduce customer concentration risk and build a stable revenue base",
            scores.customer_portfolio.score,
            vec![
                format!(
                    "Reduce top customer dependency from {}% to <{}%",
                    est.current, est.target
                ),
                "Implement customer retention program".to_string(),
                "Develop new customer acquisition channels".to_string(),
                "Strengthen customer contracts and terms".to_string(),
            ],
        ),
        OpportunityKind::ProcessDocumentation => (
            "Document and Systematize Processes",
            "Document critical processes so the business runs without tribal knowledge",
            scores
                .operational_independence
                .factors
                .process_documentation
                .score,
            vec![
                format!(
                    "Increase documented processes from {}% to {}%",
                    est.current, est.target
                ),
                "Document standard operating procedures (SOPs)".to_string(),
                "Create training manuals for key positions".to_string(),
                "Implement quality management system".to_string(),
            ],
        ),
    };

    Recommendation {
        kind: est.kind,
        action: action.to_string(),
        description: description.to_string(),
        priority: 0,
        impact: impact_for(related, &config.impact),
        difficulty: est.difficulty,
        specifics,
        timeline: format!("{} months", est.timeline_months),
        timeline_months: est.timeline_months,
        investment: est.investment,
        value_increase: est.value_increase,
        roi: est.roi,
        payback_months: est.payback_months,
        reasoning: format!(
            "{} investment returns an estimated {} in value ({}% ROI) for a {} business",
            format_money(est.investment),
            format_money(est.value_increase),
            est.roi,
            profile.industry_key
        ),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Qualifying opportunities, ranked by ROI discounted for difficulty.
pub fn recommend(
    profile: &NormalizedProfile,
    scores: &PositionScores,
    current_value: Money,
    config: &EngineConfig,
) -> Vec<Recommendation> {
    rank(
        estimate_all(profile, current_value, config)
            .iter()
            .filter(|e| e.qualifies)
            .map(|e| to_recommendation(e, profile, scores, config))
            .collect(),
    )
}

/// Sort by descending ranking key (stable) and number priorities 1..n.
pub fn rank(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| ranking_key(b).cmp(&ranking_key(a)));
    for (i, rec) in recommendations.iter_mut().enumerate() {
        rec.priority = i as u32 + 1;
    }
    recommendations
}

/// Assess, value and recommend for a raw profile.
pub fn calculate_recommendations(
    input: &BusinessProfile,
    config: &EngineConfig,
    enhancer: &dyn RecommendationEnhancer,
) -> ExitPlanResult<ComputationOutput<RecommendationSet>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, mut warnings) = input.normalize();
    let scores = assess_position(&profile, config);
    let current_value = estimate_value(&profile, config);

    let ranked = recommend(&profile, &scores, current_value, config);
    let recommendations = apply_enhancer(enhancer, &profile, ranked, &mut warnings);
    if recommendations.is_empty() {
        warnings.push("No opportunity clears its ROI threshold".into());
    }

    let output = RecommendationSet {
        current_value,
        total_value_increase: recommendations.iter().map(|r| r.value_increase).sum(),
        total_investment: recommendations.iter().map(|r| r.investment).sum(),
        evaluated: estimate_all(&profile, current_value, config),
        recommendations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "ROI-Ranked Improvement Recommendations",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
