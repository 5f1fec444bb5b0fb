//! Business value tracker: baseline valuation plus a selectable catalogue of
//! improvement projects.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::profile::BusinessProfile;
use crate::types::{round_whole, with_metadata, ComputationOutput, Difficulty, Money, Percent};
use crate::valuation::estimator::estimate_value;
use crate::ExitPlanResult;

/// One catalogued improvement project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Improvement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub investment_required: Money,
    pub value_increase: Money,
    pub timeline_months: u32,
    /// Percent
    pub roi: Percent,
    pub difficulty: Difficulty,
    pub category: String,
    pub key_metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTrackerInput {
    pub profile: BusinessProfile,
    /// Ids from [`improvement_catalogue`]
    pub selected: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTrackerOutput {
    pub baseline_value: Money,
    pub projected_value: Money,
    pub total_investment: Money,
    pub total_value_increase: Money,
    pub average_roi: Percent,
    pub average_timeline_months: Decimal,
    pub value_change_percentage: Percent,
    pub selected: Vec<Improvement>,
}

#[allow(clippy::too_many_arguments)]
fn improvement(
    id: &str,
    title: &str,
    description: &str,
    investment_required: Money,
    value_increase: Money,
    timeline_months: u32,
    difficulty: Difficulty,
    category: &str,
    key_metrics: &[&str],
) -> Improvement {
    Improvement {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        investment_required,
        value_increase,
        timeline_months,
        roi: round_whole(value_increase / investment_required * dec!(100)),
        difficulty,
        category: category.into(),
        key_metrics: key_metrics.iter().map(|m| m.to_string()).collect(),
    }
}

/// The fixed set of improvements a user can toggle.
pub fn improvement_catalogue() -> Vec<Improvement> {
    vec![
        improvement(
            "management",
            "Hire General Manager",
            "Reduce owner dependency by hiring professional management",
            dec!(150000),
            dec!(500000),
            12,
            Difficulty::Medium,
            "Management",
            &["Owner Centricity Score", "Management Depth", "Operational Independence"],
        ),
        improvement(
            "customer-diversification",
            "Customer Diversification Program",
            "Reduce customer concentration risk and build stable revenue base",
            dec!(75000),
            dec!(300000),
            18,
            Difficulty::Medium,
            "Customer Base",
            &["Customer Concentration", "Revenue Stability", "Contract Strength"],
        ),
        improvement(
            "process-documentation",
            "Process Documentation & Systematization",
            "Document critical processes and create operational procedures",
            dec!(30000),
            dec!(200000),
            6,
            Difficulty::Low,
            "Operations",
            &["Process Maturity", "Knowledge Transfer", "Scalability"],
        ),
        improvement(
            "financial-controls",
            "Advanced Financial Controls & Reporting",
            "Implement professional financial management and reporting systems",
            dec!(45000),
            dec!(180000),
            9,
            Difficulty::Low,
            "Financial",
            &["Financial Controls", "Reporting Quality", "Buyer Confidence"],
        ),
        improvement(
            "technology-upgrade",
            "Technology & Systems Upgrade",
            "Modernize technology infrastructure and business systems",
            dec!(100000),
            dec!(250000),
            12,
            Difficulty::High,
            "Technology",
            &["Operational Efficiency", "Competitive Position", "Scalability"],
        ),
    ]
}

/// Project business value for a selection of catalogue improvements.
pub fn track_value(
    input: &ValueTrackerInput,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<ValueTrackerOutput>> {
    let start = Instant::now();
    config.validate()?;

    let (profile, mut warnings) = input.profile.normalize();
    let baseline_value = estimate_value(&profile, config);

    let catalogue = improvement_catalogue();
    let mut selected: Vec<Improvement> = Vec::new();
    for id in &input.selected {
        if selected.iter().any(|s| &s.id == id) {
            continue;
        }
        match catalogue.iter().find(|i| &i.id == id) {
            Some(item) => selected.push(item.clone()),
            None => {
                tracing::debug!(id = %id, "unknown improvement id");
                warnings.push(format!("Unknown improvement '{id}' ignored"));
            }
        }
    }

    let total_investment: Money = selected.iter().map(|i| i.investment_required).sum();
    let total_value_increase: Money = selected.iter().map(|i| i.value_increase).sum();
    let count = Decimal::from(selected.len() as u64);

    let (average_roi, average_timeline_months) = if selected.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let roi_sum: Decimal = selected.iter().map(|i| i.roi).sum();
        let months_sum: Decimal = selected.iter().map(|i| Decimal::from(i.timeline_months)).sum();
        (round_whole(roi_sum / count), round_whole(months_sum / count))
    };

    let projected_value = baseline_value + total_value_increase;
    let value_change_percentage = if baseline_value.is_zero() {
        Decimal::ZERO
    } else {
        round_whole((projected_value - baseline_value) / baseline_value * dec!(100))
    };

    let output = ValueTrackerOutput {
        baseline_value,
        projected_value,
        total_investment,
        total_value_increase,
        average_roi,
        average_timeline_months,
        value_change_percentage,
        selected,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Business Value Tracker (baseline plus selected improvements)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(selected: &[&str]) -> ValueTrackerInput {
        ValueTrackerInput {
            profile: BusinessProfile {
                revenue: dec!(2500000),
                profit_margin: dec!(12),
                industry: "professional-services".into(),
                owner_centricity_score: Some(dec!(45)),
                top_customer_percentage: Some(dec!(35)),
                ..Default::default()
            },
            selected: selected.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalogue_rois() {
        let cat = improvement_catalogue();
        let rois: Vec<Decimal> = cat.iter().map(|i| i.roi).collect();
        assert_eq!(rois, vec![dec!(333), dec!(400), dec!(667), dec!(400), dec!(250)]);
    }

    #[test]
    fn test_nothing_selected() {
        let out = track_value(&input(&[]), &EngineConfig::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.baseline_value, dec!(897750));
        assert_eq!(r.projected_value, r.baseline_value);
        assert_eq!(r.average_roi, Decimal::ZERO);
        assert_eq!(r.value_change_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_two_selected() {
        let out = track_value(
            &input(&["management", "process-documentation"]),
            &EngineConfig::default(),
        )
        .unwrap();
        let r = &out.result;
        assert_eq!(r.total_investment, dec!(180000));
        assert_eq!(r.total_value_increase, dec!(700000));
        assert_eq!(r.projected_value, dec!(1597750));
        // (333 + 667) / 2 = 500
        assert_eq!(r.average_roi, dec!(500));
        assert_eq!(r.average_timeline_months, dec!(9));
        // 700000 / 897750 = 77.97% -> 78
        assert_eq!(r.value_change_percentage, dec!(78));
    }

    #[test]
    fn test_unknown_and_duplicate_ids() {
        let out = track_value(
            &input(&["management", "management", "yacht"]),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(out.result.selected.len(), 1);
        assert!(out.warnings.iter().any(|w| w.contains("yacht")));
    }

    #[test]
    fn test_zero_baseline_guards_percentage() {
        let mut i = input(&["management"]);
        i.profile.revenue = Decimal::ZERO;
        let out = track_value(&i, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.baseline_value, Decimal::ZERO);
        assert_eq!(out.result.projected_value, dec!(500000));
        assert_eq!(out.result.value_change_percentage, Decimal::ZERO);
    }
}
