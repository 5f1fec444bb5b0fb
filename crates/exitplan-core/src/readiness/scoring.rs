//! Exit-readiness score: a weighted blend of financial, business, personal
//! and market readiness, each on a 0-100 scale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::position::PositionScores;
use crate::config::{EngineConfig, ReadinessConfig};
use crate::types::{clamp_percent, mean, round_whole, with_metadata, ComputationOutput, Score};
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The four readiness dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessInput {
    pub financial: Score,
    pub business: Score,
    pub personal: Score,
    pub market: Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    Excellent,
    Good,
    Developing,
    EarlyStage,
}

impl std::fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Developing => write!(f, "Developing"),
            Self::EarlyStage => write!(f, "Early Stage"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessInterpretation {
    pub level: ReadinessLevel,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementNote {
    pub area: String,
    pub score: Score,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessOutput {
    pub overall_score: Score,
    /// Inputs after clamping into [0, 100]
    pub breakdown: ReadinessInput,
    pub interpretation: ReadinessInterpretation,
    pub improvement_notes: Vec<ImprovementNote>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn interpret(score: Score, cfg: &ReadinessConfig) -> ReadinessInterpretation {
    let (level, description) = if score >= cfg.excellent {
        (
            ReadinessLevel::Excellent,
            "Highly prepared for exit; the business can go to market now",
        )
    } else if score >= cfg.good {
        (
            ReadinessLevel::Good,
            "Well positioned; a few targeted improvements will maximise value",
        )
    } else if score >= cfg.developing {
        (
            ReadinessLevel::Developing,
            "Meaningful gaps remain; plan 1-2 years of value building",
        )
    } else {
        (
            ReadinessLevel::EarlyStage,
            "Significant preparation required before an exit is viable",
        )
    };
    ReadinessInterpretation {
        level,
        description: description.to_string(),
    }
}

fn notes(breakdown: &ReadinessInput, cfg: &ReadinessConfig) -> Vec<ImprovementNote> {
    [
        (
            "Financial",
            breakdown.financial,
            "Improve profitability, financial controls and reporting quality",
        ),
        (
            "Business",
            breakdown.business,
            "Reduce owner dependency and strengthen the management team",
        ),
        (
            "Personal",
            breakdown.personal,
            "Clarify post-exit goals and close the personal wealth gap",
        ),
        (
            "Market",
            breakdown.market,
            "Strengthen competitive position and growth story",
        ),
    ]
    .into_iter()
    .filter(|(_, score, _)| *score < cfg.improvement_below)
    .map(|(area, score, note)| ImprovementNote {
        area: area.to_string(),
        score,
        note: note.to_string(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the four dimensions from a position assessment.
pub fn readiness_from_position(
    scores: &PositionScores,
    personal: Option<Score>,
    config: &EngineConfig,
) -> ReadinessInput {
    ReadinessInput {
        financial: round_whole(mean(&[
            scores.profitability.score,
            scores.financial_controls.score,
            scores.revenue_strength.score,
        ])),
        business: round_whole(mean(&[
            scores.operational_independence.score,
            scores.customer_portfolio.score,
            scores.management_capability.score,
        ])),
        personal: personal.unwrap_or(config.readiness.default_personal),
        market: round_whole(mean(&[
            scores.competitive_position.score,
            scores.growth_potential.score,
        ])),
    }
}

/// Weighted readiness score. Total for any validated config.
pub fn score_readiness(input: &ReadinessInput, config: &EngineConfig) -> ReadinessOutput {
    let cfg = &config.readiness;
    let w = &cfg.weights;
    let breakdown = ReadinessInput {
        financial: clamp_percent(input.financial),
        business: clamp_percent(input.business),
        personal: clamp_percent(input.personal),
        market: clamp_percent(input.market),
    };

    let weighted = breakdown.financial * w.financial
        + breakdown.business * w.business
        + breakdown.personal * w.personal
        + breakdown.market * w.market;
    let total = w.total();
    let overall_score = if total > Decimal::ZERO {
        round_whole(weighted / total)
    } else {
        Decimal::ZERO
    };

    ReadinessOutput {
        overall_score,
        interpretation: interpret(overall_score, cfg),
        improvement_notes: notes(&breakdown, cfg),
        breakdown,
    }
}

/// Record a warning for every factor that [`score_readiness`] will clamp.
pub fn range_warnings(input: &ReadinessInput, warnings: &mut Vec<String>) {
    for (field, v) in [
        ("financial", input.financial),
        ("business", input.business),
        ("personal", input.personal),
        ("market", input.market),
    ] {
        if clamp_percent(v) != v {
            tracing::warn!(field, %v, "readiness score out of range");
            warnings.push(format!("{field} {v} outside [0, 100]; clamped"));
        }
    }
}

pub fn calculate_readiness(
    input: &ReadinessInput,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<ReadinessOutput>> {
    let start = Instant::now();
    config.validate()?;

    let mut warnings = Vec::new();
    range_warnings(input, &mut warnings);

    let output = score_readiness(input, config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Readiness Score (weighted four-factor)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
