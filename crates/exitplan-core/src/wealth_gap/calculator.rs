use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{EngineConfig, WithdrawalScenarioConfig};
use crate::currency::{parse_amount_field, parse_signed_field};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::ExitPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Post-exit planning form. All amounts are currency strings; missing
/// fields count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WealthGapInputs {
    pub current_annual_income: String,
    pub desired_annual_income: String,

    pub retirement_accounts: String,
    pub investment_accounts: String,
    pub real_estate_equity: String,
    pub cash_savings: String,
    pub other_assets: String,

    pub total_personal_debt: String,

    pub housing_expenses: String,
    pub lifestyle_expenses: String,
    pub healthcare_expenses: String,
    pub travel_recreation: String,
    pub family_support: String,
    pub charitable_giving: String,
    pub contingency_buffer: String,

    pub estimated_business_value: String,
    /// Years until the planned exit
    pub time_to_exit: String,
}

/// Outcome under one withdrawal-rate assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthGapScenario {
    pub name: String,
    pub withdrawal_rate: Rate,
    pub risk_level: String,
    pub capital_needed: Money,
    pub wealth_gap: Money,
    pub surplus: Money,
    /// `None` when there are no annual needs to fund
    pub years_of_security: Option<Years>,
    pub has_gap: bool,
    /// Assets over capital needed; 0 when nothing is needed
    pub adequacy_ratio: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthGapOutput {
    pub current_annual_income: Money,
    pub annual_needs: Money,
    /// Personal assets net of debt
    pub current_assets: Money,
    pub business_value: Money,
    pub total_available_assets: Money,
    pub years_to_exit: Years,
    pub scenarios: Vec<WealthGapScenario>,
    /// First scenario without a gap, else the first scenario
    pub recommended_scenario: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn scenario(
    cfg: &WithdrawalScenarioConfig,
    annual_needs: Money,
    total_available: Money,
) -> WealthGapScenario {
    // Zero only for an unvalidated zero rate.
    let capital_needed = to_cents(annual_needs.checked_div(cfg.rate).unwrap_or(Decimal::ZERO));
    let wealth_gap = (capital_needed - total_available).max(Decimal::ZERO);
    let surplus = (total_available - capital_needed).max(Decimal::ZERO);

    let years_of_security = if annual_needs.is_zero() {
        None
    } else if total_available <= Decimal::ZERO {
        Some(Decimal::ZERO)
    } else {
        Some((total_available / annual_needs).round_dp(2))
    };

    let adequacy_ratio = if capital_needed > Decimal::ZERO {
        (total_available / capital_needed).round_dp(4)
    } else {
        Decimal::ZERO
    };

    WealthGapScenario {
        name: cfg.name.clone(),
        withdrawal_rate: cfg.rate,
        risk_level: cfg.risk_level.clone(),
        capital_needed,
        wealth_gap,
        surplus,
        years_of_security,
        has_gap: wealth_gap > Decimal::ZERO,
        adequacy_ratio,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

fn sum_fields(fields: &[(&str, &str)], warnings: &mut Vec<String>) -> Money {
    fields
        .iter()
        .map(|(name, raw)| parse_amount_field(name, raw, warnings))
        .sum()
}

fn compute(
    inputs: &WealthGapInputs,
    config: &EngineConfig,
    warnings: &mut Vec<String>,
) -> WealthGapOutput {
    let desired = parse_amount_field("desired_annual_income", &inputs.desired_annual_income, warnings);
    let expenses = sum_fields(
        &[
            ("housing_expenses", inputs.housing_expenses.as_str()),
            ("lifestyle_expenses", inputs.lifestyle_expenses.as_str()),
            ("healthcare_expenses", inputs.healthcare_expenses.as_str()),
            ("travel_recreation", inputs.travel_recreation.as_str()),
            ("family_support", inputs.family_support.as_str()),
            ("charitable_giving", inputs.charitable_giving.as_str()),
            ("contingency_buffer", inputs.contingency_buffer.as_str()),
        ],
        warnings,
    );
    let annual_needs = desired.max(expenses);

    let gross_assets = sum_fields(
        &[
            ("retirement_accounts", inputs.retirement_accounts.as_str()),
            ("investment_accounts", inputs.investment_accounts.as_str()),
            ("real_estate_equity", inputs.real_estate_equity.as_str()),
            ("cash_savings", inputs.cash_savings.as_str()),
            ("other_assets", inputs.other_assets.as_str()),
        ],
        warnings,
    );
    let debt = parse_amount_field("total_personal_debt", &inputs.total_personal_debt, warnings);
    let current_assets = gross_assets - debt;
    let business_value =
        parse_amount_field("estimated_business_value", &inputs.estimated_business_value, warnings);
    let total_available_assets = current_assets + business_value;

    let scenarios: Vec<WealthGapScenario> = config
        .withdrawal_scenarios
        .iter()
        .map(|s| scenario(s, annual_needs, total_available_assets))
        .collect();

    let recommended_scenario = scenarios
        .iter()
        .find(|s| !s.has_gap)
        .or_else(|| scenarios.first())
        .map(|s| s.name.clone())
        .unwrap_or_default();

    WealthGapOutput {
        current_annual_income: parse_amount_field(
            "current_annual_income",
            &inputs.current_annual_income,
            warnings,
        ),
        annual_needs,
        current_assets,
        business_value,
        total_available_assets,
        years_to_exit: parse_amount_field("time_to_exit", &inputs.time_to_exit, warnings),
        scenarios,
        recommended_scenario,
    }
}

/// Compare post-exit needs against net personal assets plus the business.
pub fn compute_wealth_gap(inputs: &WealthGapInputs, config: &EngineConfig) -> WealthGapOutput {
    compute(inputs, config, &mut Vec::new())
}

/// Wealth-gap analysis in the standard envelope.
pub fn calculate_wealth_gap(
    inputs: &WealthGapInputs,
    config: &EngineConfig,
) -> ExitPlanResult<ComputationOutput<WealthGapOutput>> {
    let start = Instant::now();
    config.validate()?;

    let mut warnings = Vec::new();
    let output = compute(inputs, config, &mut warnings);

    if output.annual_needs.is_zero() {
        tracing::debug!("no post-exit needs supplied");
        warnings.push("Annual needs are zero; years of security not defined".into());
    }
    if output.current_assets < Decimal::ZERO {
        warnings.push(format!(
            "Personal debt exceeds personal assets by {}",
            -output.current_assets
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Post-Exit Wealth Gap (capital needed at safe withdrawal rates)",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
