//! Owner-centricity questionnaire scoring.
//!
//! Answers are on a 1-4 scale (1 = owner does everything, 4 = fully
//! delegated). Each functional area's mean answer is multiplied by 25 to give
//! a 0-100 area score; the overall score is the weight-averaged mean over the
//! areas that received at least one answer, again times 25.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ExitPlanError;
use crate::types::{round_whole, with_metadata, ComputationOutput, Score};
use crate::ExitPlanResult;

const MIN_ANSWER: u8 = 1;
const MAX_ANSWER: u8 = 4;
const ANSWER_SCALE: Decimal = dec!(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalArea {
    SalesAndCustomers,
    Operations,
    FinancialManagement,
    StrategicDecisions,
    Innovation,
}

impl FunctionalArea {
    /// Relative weight in percent; the five areas sum to 100.
    pub fn weight(&self) -> Decimal {
        match self {
            FunctionalArea::SalesAndCustomers => dec!(25),
            FunctionalArea::Operations => dec!(20),
            FunctionalArea::FinancialManagement => dec!(20),
            FunctionalArea::StrategicDecisions => dec!(25),
            FunctionalArea::Innovation => dec!(10),
        }
    }
}

impl std::fmt::Display for FunctionalArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SalesAndCustomers => write!(f, "Sales & Customer Management"),
            Self::Operations => write!(f, "Operations & Production"),
            Self::FinancialManagement => write!(f, "Financial Management"),
            Self::StrategicDecisions => write!(f, "Strategic Decision Making"),
            Self::Innovation => write!(f, "Innovation & Development"),
        }
    }
}

/// Answers given for one functional area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaAnswers {
    pub area: FunctionalArea,
    pub answers: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerCentricityInput {
    pub areas: Vec<AreaAnswers>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyLevel {
    Excellent,
    Good,
    Developing,
    HighDependency,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CentricityInterpretation {
    pub level: DependencyLevel,
    pub description: String,
    pub value_impact: String,
    pub readiness: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaScore {
    pub area: FunctionalArea,
    pub weight: Decimal,
    pub questions_answered: usize,
    pub score: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerCentricityOutput {
    pub overall_score: Score,
    pub area_scores: Vec<AreaScore>,
    pub interpretation: CentricityInterpretation,
}

/// Map an overall centricity score onto its interpretation band.
pub fn interpret_centricity(score: Score) -> CentricityInterpretation {
    if score >= dec!(85) {
        CentricityInterpretation {
            level: DependencyLevel::Excellent,
            description: "Exceptional independence from owner involvement; significantly enhances business value.".into(),
            value_impact: "+20-25% above base valuation".into(),
            readiness: "Ready for immediate exit consideration".into(),
        }
    } else if score >= dec!(70) {
        CentricityInterpretation {
            level: DependencyLevel::Good,
            description: "Strong management systems with some areas for improvement.".into(),
            value_impact: "+10-15% above base valuation".into(),
            readiness: "Ready for exit planning with minor improvements".into(),
        }
    } else if score >= dec!(55) {
        CentricityInterpretation {
            level: DependencyLevel::Developing,
            description: "Moderate owner dependency that should be addressed before exit.".into(),
            value_impact: "Neutral to +5% above base valuation".into(),
            readiness: "Needs 12-18 months of improvement before exit".into(),
        }
    } else {
        CentricityInterpretation {
            level: DependencyLevel::HighDependency,
            description: "High owner dependency significantly impacts business value and exit options.".into(),
            value_impact: "-15-25% below base valuation".into(),
            readiness: "Requires 2-3 years of systematic improvement".into(),
        }
    }
}

/// Pool the answers of areas listed more than once, keeping first-seen
/// order, so each area's weight counts a single time.
fn merge_areas(areas: &[AreaAnswers], warnings: &mut Vec<String>) -> Vec<AreaAnswers> {
    let mut merged: Vec<AreaAnswers> = Vec::new();
    for entry in areas {
        match merged.iter_mut().find(|m| m.area == entry.area) {
            Some(existing) => {
                warnings.push(format!(
                    "{}: listed more than once; answers merged",
                    entry.area
                ));
                existing.answers.extend_from_slice(&entry.answers);
            }
            None => merged.push(entry.clone()),
        }
    }
    merged
}

/// Score a completed (or partially completed) questionnaire.
pub fn score_owner_centricity(
    input: &OwnerCentricityInput,
) -> ExitPlanResult<ComputationOutput<OwnerCentricityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut area_scores: Vec<AreaScore> = Vec::new();
    let mut weighted_sum = Decimal::ZERO;
    let mut total_weight = Decimal::ZERO;

    for area in &merge_areas(&input.areas, &mut warnings) {
        if area.answers.is_empty() {
            warnings.push(format!("{}: no questions answered; area skipped", area.area));
            continue;
        }

        let mut sum = Decimal::ZERO;
        for &answer in &area.answers {
            let bounded = answer.clamp(MIN_ANSWER, MAX_ANSWER);
            if bounded != answer {
                warnings.push(format!(
                    "{}: answer {answer} outside 1-4; clamped to {bounded}",
                    area.area
                ));
            }
            sum += Decimal::from(bounded);
        }
        let mean = sum / Decimal::from(area.answers.len() as u64);
        let weight = area.area.weight() / dec!(100);

        weighted_sum += mean * weight;
        total_weight += weight;

        area_scores.push(AreaScore {
            area: area.area,
            weight: area.area.weight(),
            questions_answered: area.answers.len(),
            score: round_whole(mean * ANSWER_SCALE),
        });
    }

    if total_weight.is_zero() {
        return Err(ExitPlanError::InsufficientData(
            "No questionnaire answers supplied".into(),
        ));
    }

    let overall_score = round_whole(weighted_sum / total_weight * ANSWER_SCALE);

    let output = OwnerCentricityOutput {
        overall_score,
        area_scores,
        interpretation: interpret_centricity(overall_score),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Owner Centricity Questionnaire (weighted functional areas)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input(score: u8) -> OwnerCentricityInput {
        OwnerCentricityInput {
            areas: [
                FunctionalArea::SalesAndCustomers,
                FunctionalArea::Operations,
                FunctionalArea::FinancialManagement,
                FunctionalArea::StrategicDecisions,
                FunctionalArea::Innovation,
            ]
            .into_iter()
            .map(|area| AreaAnswers {
                area,
                answers: vec![score, score, score],
            })
            .collect(),
        }
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: Decimal = full_input(1).areas.iter().map(|a| a.area.weight()).sum();
        assert_eq!(total, dec!(100));
    }

    #[test]
    fn test_all_fours_is_100() {
        let out = score_owner_centricity(&full_input(4)).unwrap();
        assert_eq!(out.result.overall_score, dec!(100));
        assert_eq!(out.result.interpretation.level, DependencyLevel::Excellent);
    }

    #[test]
    fn test_all_ones_is_high_dependency() {
        let out = score_owner_centricity(&full_input(1)).unwrap();
        assert_eq!(out.result.overall_score, dec!(25));
        assert_eq!(
            out.result.interpretation.level,
            DependencyLevel::HighDependency
        );
    }

    #[test]
    fn test_weighted_mix() {
        // Sales 4 (w25), Strategy 2 (w25): (4*0.25 + 2*0.25) / 0.5 * 25 = 75
        let input = OwnerCentricityInput {
            areas: vec![
                AreaAnswers {
                    area: FunctionalArea::SalesAndCustomers,
                    answers: vec![4, 4],
                },
                AreaAnswers {
                    area: FunctionalArea::StrategicDecisions,
                    answers: vec![2],
                },
            ],
        };
        let out = score_owner_centricity(&input).unwrap();
        assert_eq!(out.result.overall_score, dec!(75));
        assert_eq!(out.result.interpretation.level, DependencyLevel::Good);
        assert_eq!(out.result.area_scores[1].score, dec!(50));
    }

    #[test]
    fn test_uneven_weights_matter() {
        // Innovation 4 (w10), Operations 1 (w20): (0.4 + 0.2) / 0.3 * 25 = 50
        let input = OwnerCentricityInput {
            areas: vec![
                AreaAnswers {
                    area: FunctionalArea::Innovation,
                    answers: vec![4],
                },
                AreaAnswers {
                    area: FunctionalArea::Operations,
                    answers: vec![1],
                },
            ],
        };
        let out = score_owner_centricity(&input).unwrap();
        assert_eq!(out.result.overall_score, dec!(50));
    }

    #[test]
    fn test_out_of_range_answers_clamped() {
        let input = OwnerCentricityInput {
            areas: vec![AreaAnswers {
                area: FunctionalArea::Operations,
                answers: vec![0, 9],
            }],
        };
        let out = score_owner_centricity(&input).unwrap();
        // clamped to 1 and 4 -> mean 2.5 -> 62.5 -> 63
        assert_eq!(out.result.overall_score, dec!(63));
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_repeated_area_counts_once() {
        // Operations twice (4 then 2), Innovation once (1):
        // ops mean 3 (w20), innovation 1 (w10): (0.6 + 0.1) / 0.3 * 25 = 58.3
        let input = OwnerCentricityInput {
            areas: vec![
                AreaAnswers {
                    area: FunctionalArea::Operations,
                    answers: vec![4],
                },
                AreaAnswers {
                    area: FunctionalArea::Innovation,
                    answers: vec![1],
                },
                AreaAnswers {
                    area: FunctionalArea::Operations,
                    answers: vec![2],
                },
            ],
        };
        let out = score_owner_centricity(&input).unwrap();
        assert_eq!(out.result.area_scores.len(), 2);
        assert_eq!(out.result.area_scores[0].questions_answered, 2);
        assert_eq!(out.result.area_scores[0].score, dec!(75));
        assert_eq!(out.result.overall_score, dec!(58));
        assert!(out.warnings[0].contains("Operations & Production"));
    }

    #[test]
    fn test_no_answers_is_error() {
        let input = OwnerCentricityInput {
            areas: vec![AreaAnswers {
                area: FunctionalArea::Operations,
                answers: vec![],
            }],
        };
        assert!(matches!(
            score_owner_centricity(&input),
            Err(ExitPlanError::InsufficientData(_))
        ));
    }
}
