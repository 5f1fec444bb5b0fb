//! Seller's discretionary cash-flow normalisation.
//!
//! Reported net income is adjusted by a fixed catalogue of add-backs
//! (non-cash charges, financing cost, owner-specific spending) and
//! deductions (what a buyer must spend to replace the owner). The size of
//! the owner-specific adjustments relative to net income drives a quality
//! score: the cleaner the books, the higher the score.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::EngineConfig;
use crate::currency::{parse_amount_field, parse_signed_field};
use crate::types::{round_whole, with_metadata, ComputationOutput, Money, Percent, Score};
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Form fields as entered, currency formatting included. Missing fields
/// deserialise as empty strings and count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowInputs {
    pub net_income: String,
    pub depreciation: String,
    pub interest_expense: String,

    pub owner_salary_excess: String,
    pub owner_bonuses_discretionary: String,
    pub owner_benefits_excess: String,
    pub personal_expenses_auto: String,
    pub personal_expenses_travel: String,
    pub personal_expenses_other: String,
    pub family_salary_excess: String,
    pub family_benefits_excess: String,

    pub management_replacement: String,
    pub additional_benefits: String,
    pub additional_insurance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentKind {
    /// Non-cash or financing add-back (depreciation, interest)
    Standard,
    /// Owner or family spending a buyer would not incur
    OwnerSpecific,
    /// Cost of replacing the owner's role
    Replacement,
}

/// One catalogue line with its parsed amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowAdjustment {
    pub name: String,
    pub kind: AdjustmentKind,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityRating {
    Excellent,
    Good,
    NeedsImprovement,
    InsufficientData,
}

impl std::fmt::Display for QualityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::NeedsImprovement => write!(f, "Needs Improvement"),
            Self::InsufficientData => write!(f, "Insufficient Data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowOutput {
    pub base_net_income: Money,
    pub total_add_backs: Money,
    pub total_deductions: Money,
    /// Never negative
    pub adjusted_cash_flow: Money,
    /// Change vs reported income, whole percent
    pub adjustment_percentage: Percent,
    /// One of the configured quality buckets, or 0 without positive income
    pub quality_score: Score,
    pub quality_rating: QualityRating,
    pub adjustments: Vec<CashFlowAdjustment>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl CashFlowInputs {
    /// Every catalogue line, in form order. Negative or out-of-range
    /// amounts are recorded in `warnings` and count as zero.
    pub fn adjustments(&self, warnings: &mut Vec<String>) -> Vec<CashFlowAdjustment> {
        use AdjustmentKind::*;
        [
            ("Depreciation", Standard, &self.depreciation),
            ("Interest Expense", Standard, &self.interest_expense),
            ("Owner Salary Excess", OwnerSpecific, &self.owner_salary_excess),
            ("Owner Bonuses (Discretionary)", OwnerSpecific, &self.owner_bonuses_discretionary),
            ("Owner Benefits Excess", OwnerSpecific, &self.owner_benefits_excess),
            ("Personal Expenses: Auto", OwnerSpecific, &self.personal_expenses_auto),
            ("Personal Expenses: Travel", OwnerSpecific, &self.personal_expenses_travel),
            ("Personal Expenses: Other", OwnerSpecific, &self.personal_expenses_other),
            ("Family Salary Excess", OwnerSpecific, &self.family_salary_excess),
            ("Family Benefits Excess", OwnerSpecific, &self.family_benefits_excess),
            ("Management Replacement", Replacement, &self.management_replacement),
            ("Additional Benefits", Replacement, &self.additional_benefits),
            ("Additional Insurance", Replacement, &self.additional_insurance),
        ]
        .into_iter()
        .map(|(name, kind, raw)| CashFlowAdjustment {
            name: name.to_string(),
            kind,
            amount: parse_amount_field(name, raw, warnings),
        })
        .collect()
    }
}

fn total_of(adjustments: &[CashFlowAdjustment], kinds: &[AdjustmentKind]) -> Money {
    adjustments
        .iter()
        .filter(|a| kinds.contains(&a.kind))
        .map(|a| a.amount)
        .sum()
}

/// Bucket the owner-specific adjustment ratio into a quality score.
pub fn cash_flow_quality(
    base: Money,
    owner_add_backs: Money,
    deductions: Money,
    config: &EngineConfig,
) -> Score {
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = (owner_add_backs - deductions).abs() / base;
    config.cash_flow_quality.below(ratio)
}

/// Label a quality score using the configured rating cut-offs.
pub fn quality_rating(score: Score, config: &EngineConfig) -> QualityRating {
    let bands = &config.cash_flow_rating;
    if score >= bands.excellent {
        QualityRating::Excellent
    } else if score >= bands.good {
        QualityRating::Good
    } else if score > Decimal::ZERO {
        QualityRating::NeedsImprovement
    } else {
        QualityRating::InsufficientData
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

fn compute(
    inputs: &CashFlowInputs,
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> CashFlowOutput {
    let base = parse_signed_field("Net Income", &inputs.net_income, warnings);
    let adjustments = inputs.adjustments(warnings);

    let owner_add_backs = total_of(&adjustments, &[AdjustmentKind::OwnerSpecific]);
    let total_add_backs = total_of(
        &adjustments,
        &[AdjustmentKind::Standard, AdjustmentKind::OwnerSpecific],
    );
    let total_deductions = total_of(&adjustments, &[AdjustmentKind::Replacement]);

    let unclamped = base + total_add_backs - total_deductions;
    let adjustment_percentage = if base > Decimal::ZERO {
        round_whole((unclamped - base) / base * dec!(100))
    } else {
        Decimal::ZERO
    };
    let quality_score = cash_flow_quality(base, owner_add_backs, total_deductions, config);

    CashFlowOutput {
        base_net_income: base,
        total_add_backs,
        total_deductions,
        adjusted_cash_flow: unclamped.max(Decimal::ZERO),
        adjustment_percentage,
        quality_score,
        quality_rating: quality_rating(quality_score, config),
        adjustments,
    }
}

/// Apply the adjustment catalogue. Total over every input.
pub fn compute_cash_flow(inputs: &CashFlowInputs, config: &EngineConfig) -> CashFlowOutput {
    compute(inputs, config, &mut Vec::new())
}

/// Normalise cash flow, wrapped in the standard envelope.
pub fn normalize_cash_flow(
    inputs: &CashFlowInputs,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<CashFlowOutput>> {
    let start = Instant::now();
    config.validate()?;

    let mut warnings = Vec::new();
    let output = compute(inputs, config, &mut warnings);

    if output.base_net_income <= Decimal::ZERO {
        tracing::debug!(base = %output.base_net_income, "non-positive net income");
        warnings.push("Net income is zero or negative; quality score not available".into());
    }
    if output.adjusted_cash_flow.is_zero() && output.base_net_income > Decimal::ZERO {
        warnings.push("Deductions exceed income plus add-backs; adjusted cash flow floored at 0".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cash Flow Normalization (add-backs less replacement costs)",
        inputs,
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

    fn example() -> CashFlowInputs {
        CashFlowInputs {
            net_income: "$250,000".into(),
            depreciation: "45,000".into(),
            interest_expense: "25000".into(),
            owner_salary_excess: "$75,000".into(),
            personal_expenses_auto: "15000".into(),
            personal_expenses_other: "20,000".into(),
            management_replacement: "$85,000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_worked_example() {
        let out = compute_cash_flow(&example(), &EngineConfig::default());
        assert_eq!(out.base_net_income, dec!(250000));
        assert_eq!(out.total_add_backs, dec!(180000));
        assert_eq!(out.total_deductions, dec!(85000));
        assert_eq!(out.adjusted_cash_flow, dec!(345000));
        assert_eq!(out.adjustment_percentage, dec!(38));
        // |110000 - 85000| / 250000 = 0.1, not below 0.1
        assert_eq!(out.quality_score, dec!(85));
        assert_eq!(out.quality_rating, QualityRating::Excellent);
        assert_eq!(out.adjustments.len(), 13);
    }

    #[test]
    fn test_quality_buckets() {
        let cfg = EngineConfig::default();
        let base = dec!(100000);
        assert_eq!(cash_flow_quality(base, dec!(5000), Decimal::ZERO, &cfg), dec!(95));
        assert_eq!(cash_flow_quality(base, dec!(15000), Decimal::ZERO, &cfg), dec!(85));
        assert_eq!(cash_flow_quality(base, dec!(30000), Decimal::ZERO, &cfg), dec!(70));
        assert_eq!(cash_flow_quality(base, dec!(50000), Decimal::ZERO, &cfg), dec!(55));
        assert_eq!(cash_flow_quality(base, dec!(60000), Decimal::ZERO, &cfg), dec!(40));
        // Deductions larger than add-backs still count by magnitude
        assert_eq!(cash_flow_quality(base, Decimal::ZERO, dec!(30000), &cfg), dec!(70));
    }

    #[test]
    fn test_zero_income_is_guarded() {
        let inputs = CashFlowInputs {
            depreciation: "10000".into(),
            ..Default::default()
        };
        let out = normalize_cash_flow(&inputs, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.quality_score, Decimal::ZERO);
        assert_eq!(out.result.adjustment_percentage, Decimal::ZERO);
        assert_eq!(out.result.quality_rating, QualityRating::InsufficientData);
        assert_eq!(out.result.adjusted_cash_flow, dec!(10000));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_adjusted_cash_flow_floored() {
        let inputs = CashFlowInputs {
            net_income: "50000".into(),
            management_replacement: "120000".into(),
            ..Default::default()
        };
        let out = compute_cash_flow(&inputs, &EngineConfig::default());
        assert_eq!(out.adjusted_cash_flow, Decimal::ZERO);
        // Percentage uses the unfloored figure: (-70000 - 50000) / 50000
        assert_eq!(out.adjustment_percentage, dec!(-240));
    }

    #[test]
    fn test_garbage_fields_count_as_zero() {
        let inputs = CashFlowInputs {
            net_income: "100000".into(),
            depreciation: "lots".into(),
            owner_salary_excess: "".into(),
            ..Default::default()
        };
        let out = compute_cash_flow(&inputs, &EngineConfig::default());
        assert_eq!(out.total_add_backs, Decimal::ZERO);
        assert_eq!(out.adjusted_cash_flow, dec!(100000));
        assert_eq!(out.quality_score, dec!(95));
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let inputs: CashFlowInputs =
            serde_json::from_str(r#"{"net_income": "$200,000"}"#).unwrap();
        let out = compute_cash_flow(&inputs, &EngineConfig::default());
        assert_eq!(out.base_net_income, dec!(200000));
        assert_eq!(out.total_deductions, Decimal::ZERO);
    }

    #[test]
    fn test_rating_labels() {
        let cfg = EngineConfig::default();
        assert_eq!(quality_rating(dec!(95), &cfg), QualityRating::Excellent);
        assert_eq!(quality_rating(dec!(70), &cfg), QualityRating::Good);
        assert_eq!(quality_rating(dec!(40), &cfg), QualityRating::NeedsImprovement);
        assert_eq!(quality_rating(Decimal::ZERO, &cfg), QualityRating::InsufficientData);
    }

    #[test]
    fn test_rating_follows_retuned_buckets() {
        let mut cfg = EngineConfig::default();
        cfg.cash_flow_quality.tiers[0].value = dec!(90);
        cfg.cash_flow_quality.tiers[1].value = dec!(80);
        cfg.cash_flow_rating.excellent = dec!(90);
        cfg.cash_flow_rating.good = dec!(80);
        cfg.validate().unwrap();
        let out = compute_cash_flow(&example(), &cfg);
        // ratio 0.1 now lands in the 80 bucket, which is Good under the new cut-offs
        assert_eq!(out.quality_score, dec!(80));
        assert_eq!(out.quality_rating, QualityRating::Good);
    }

    #[test]
    fn test_negative_add_backs_floored_with_warning() {
        let inputs = CashFlowInputs {
            net_income: "-20,000".into(),
            depreciation: "-10,000".into(),
            management_replacement: "-50,000".into(),
            ..Default::default()
        };
        let out = normalize_cash_flow(&inputs, &EngineConfig::default()).unwrap();
        assert_eq!(out.result.base_net_income, dec!(-20000));
        assert_eq!(out.result.total_add_backs, Decimal::ZERO);
        assert_eq!(out.result.total_deductions, Decimal::ZERO);
        assert!(out.warnings.iter().any(|w| w.contains("Depreciation")));
        assert!(out.warnings.iter().any(|w| w.contains("Management Replacement")));
    }
}
