//! Exit timeline estimate: a base horizon extended for each risk factor
//! present, capped, and broken into yearly milestones.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{EngineConfig, TimelineConfig};
use crate::profile::{BusinessProfile, NormalizedProfile};
use crate::types::{with_metadata, ComputationOutput};
use crate::ExitPlanResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineAdjustment {
    pub factor: String,
    pub years: u32,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub year: u32,
    pub phase: String,
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitTimeline {
    pub base_years: u32,
    /// Base plus every adjustment, before the cap
    pub unadjusted_years: u32,
    pub recommended_years: u32,
    pub capped: bool,
    pub adjustments: Vec<TimelineAdjustment>,
    pub reasoning: String,
    pub milestones: Vec<Milestone>,
}

fn adjustments_for(profile: &NormalizedProfile, cfg: &TimelineConfig) -> Vec<TimelineAdjustment> {
    let mut out = Vec::new();

    let centricity = profile.owner_centricity_score;
    if centricity < cfg.high_dependency_below {
        out.push(TimelineAdjustment {
            factor: "High owner dependency".into(),
            years: cfg.high_dependency_years,
            reasoning: "Need time to develop management independence".into(),
        });
    } else if centricity < cfg.moderate_dependency_below {
        out.push(TimelineAdjustment {
            factor: "Moderate owner dependency".into(),
            years: cfg.moderate_dependency_years,
            reasoning: "Need time to strengthen management team".into(),
        });
    }

    if profile.profit_margin < cfg.low_margin_below {
        out.push(TimelineAdjustment {
            factor: "Below-average profitability".into(),
            years: cfg.low_margin_years,
            reasoning: "Need time to improve financial performance".into(),
        });
    }

    if profile.wealth_gap > cfg.wealth_gap_above {
        out.push(TimelineAdjustment {
            factor: "Significant wealth gap".into(),
            years: cfg.wealth_gap_years,
            reasoning: "Need additional time to build business value".into(),
        });
    }

    out
}

fn plural(years: u32) -> &'static str {
    if years == 1 {
        "year"
    } else {
        "years"
    }
}

fn reasoning_for(timeline: &ExitTimeline) -> String {
    if timeline.adjustments.is_empty() {
        return format!(
            "Business fundamentals support a standard {}-year exit horizon.",
            timeline.recommended_years
        );
    }
    let factors: Vec<String> = timeline
        .adjustments
        .iter()
        .map(|a| format!("{} (+{} {})", a.factor.to_lowercase(), a.years, plural(a.years)))
        .collect();
    let mut text = format!(
        "Base horizon of {} {} extended for {}.",
        timeline.base_years,
        plural(timeline.base_years),
        factors.join(", ")
    );
    if timeline.capped {
        text.push_str(&format!(
            " The {} {} implied is capped at {}.",
            timeline.unadjusted_years,
            plural(timeline.unadjusted_years),
            timeline.recommended_years
        ));
    }
    text
}

fn milestones_for(years: u32, adjustments: &[TimelineAdjustment]) -> Vec<Milestone> {
    let has = |needle: &str| adjustments.iter().any(|a| a.factor.contains(needle));

    (1..=years)
        .map(|year| {
            if year == years {
                Milestone {
                    year,
                    phase: "Exit Execution".into(),
                    objectives: vec![
                        "Engage M&A advisor and finalise valuation".into(),
                        "Prepare data room and due diligence materials".into(),
                        "Run buyer process and negotiate terms".into(),
                        "Close transaction and execute transition plan".into(),
                    ],
                }
            } else if year == 1 {
                let mut objectives: Vec<String> = vec!["Complete baseline valuation and clean up financials".into()];
                if has("owner dependency") {
                    objectives.push("Hire or promote a general manager".into());
                    objectives.push("Document critical business processes".into());
                }
                if has("profitability") {
                    objectives.push("Launch margin improvement program".into());
                }
                if has("wealth gap") {
                    objectives.push("Set personal wealth target and savings plan".into());
                }
                Milestone {
                    year,
                    phase: "Foundation".into(),
                    objectives,
                }
            } else {
                Milestone {
                    year,
                    phase: "Value Building".into(),
                    objectives: vec![
                        "Demonstrate owner-independent operating results".into(),
                        "Grow contracted and recurring revenue".into(),
                        "Track value drivers against industry benchmarks".into(),
                    ],
                }
            }
        })
        .collect()
}

/// Recommended exit horizon for a profile.
pub fn optimal_timeline(profile: &NormalizedProfile, config: &EngineConfig) -> ExitTimeline {
    let cfg = &config.timeline;
    let adjustments = adjustments_for(profile, cfg);
    let unadjusted_years = cfg.base_years + adjustments.iter().map(|a| a.years).sum::<u32>();
    let recommended_years = unadjusted_years.min(cfg.cap_years);

    let mut timeline = ExitTimeline {
        base_years: cfg.base_years,
        unadjusted_years,
        recommended_years,
        capped: unadjusted_years > cfg.cap_years,
        milestones: milestones_for(recommended_years, &adjustments),
        adjustments,
        reasoning: String::new(),
    };
    timeline.reasoning = reasoning_for(&timeline);
    timeline
}

pub fn calculate_timeline(
    input: &BusinessProfile,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<ExitTimeline>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, warnings) = input.normalize();
    let timeline = optimal_timeline(&profile, config);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Timeline (base horizon plus risk-factor adjustments)",
        input,
        warnings,
        elapsed,
        timeline,
    ))
}
