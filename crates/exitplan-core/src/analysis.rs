//! End-to-end exit-planning analysis: position, valuation, recommendations,
//! timeline and readiness for one profile.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::position::{assess_position, PositionScores};
use crate::config::EngineConfig;
use crate::industry::comparison::{compare_to_benchmark, BenchmarkComparison};
use crate::profile::BusinessProfile;
use crate::readiness::scoring::{
    range_warnings, readiness_from_position, score_readiness, ReadinessOutput,
};
use crate::recommendations::engine::{recommend, Recommendation};
use crate::recommendations::enhancer::{apply_enhancer, RecommendationEnhancer};
use crate::recommendations::timeline::{optimal_timeline, ExitTimeline};
use crate::types::{with_metadata, ComputationOutput, Money, Score};
use crate::valuation::estimator::{estimate_value_range, value_breakdown, ValuationBreakdown, ValueRange};
use crate::ExitPlanResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub profile: BusinessProfile,
    /// Owner's personal readiness, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_readiness: Option<Score>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitPlanAnalysis {
    pub position: PositionScores,
    pub benchmark: BenchmarkComparison,
    pub valuation: ValuationBreakdown,
    pub value_range: ValueRange,
    pub recommendations: Vec<Recommendation>,
    pub timeline: ExitTimeline,
    pub readiness: ReadinessOutput,
    /// Sum of recommended value increases
    pub total_value_impact: Money,
    pub total_investment: Money,
    pub projected_value: Money,
}

/// Run the full pipeline.
pub fn analyze_business(
    request: &AnalysisRequest,
    config: &EngineConfig,
    enhancer: &dyn RecommendationEnhancer,
) -> ExitPlanResult<ComputationOutput<ExitPlanAnalysis>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, mut warnings) = request.profile.normalize();
    tracing::debug!(industry = %profile.industry_key, "running exit-planning analysis");

    let position = assess_position(&profile, config);
    let benchmark = compare_to_benchmark(&profile);
    let valuation = value_breakdown(&profile, config);
    let value_range = estimate_value_range(&profile, config);
    if valuation.ebitda.is_zero() {
        warnings.push("EBITDA is zero; estimated value is zero".into());
    }

    let ranked = recommend(&profile, &position, valuation.estimated_value, config);
    let recommendations = apply_enhancer(enhancer, &profile, ranked, &mut warnings);

    let timeline = optimal_timeline(&profile, config);
    let readiness_input = readiness_from_position(&position, request.personal_readiness, config);
    range_warnings(&readiness_input, &mut warnings);
    let readiness = score_readiness(&readiness_input, config);

    let total_value_impact: Money = recommendations.iter().map(|r| r.value_increase).sum();
    let total_investment: Money = recommendations.iter().map(|r| r.investment).sum();

    let output = ExitPlanAnalysis {
        projected_value: valuation.estimated_value + total_value_impact.max(Decimal::ZERO),
        position,
        benchmark,
        valuation,
        value_range,
        recommendations,
        timeline,
        readiness,
        total_value_impact,
        total_investment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Planning Analysis (position, valuation, ROI recommendations, timeline, readiness)",
        request,
        warnings,
        elapsed,
        output,
    ))
}
