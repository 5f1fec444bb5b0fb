use clap::Args;
use serde_json::Value;

use exitplan_core::assessment::owner_centricity::{self, OwnerCentricityInput};
use exitplan_core::cash_flow::{self, CashFlowInputs};
use exitplan_core::wealth_gap::{self, WealthGapInputs};
use exitplan_core::EngineConfig;

use crate::input;

/// Arguments for cash-flow normalization. Amounts accept "$1,250" style text.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CashFlowArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Reported net income
    #[arg(long, default_value = "")]
    pub net_income: String,

    #[arg(long, default_value = "")]
    pub depreciation: String,

    #[arg(long, default_value = "")]
    pub interest_expense: String,

    /// Owner compensation above market rate
    #[arg(long, default_value = "")]
    pub owner_salary_excess: String,

    #[arg(long, default_value = "")]
    pub owner_bonuses: String,

    #[arg(long, default_value = "")]
    pub owner_benefits_excess: String,

    #[arg(long, default_value = "")]
    pub personal_auto: String,

    #[arg(long, default_value = "")]
    pub personal_travel: String,

    #[arg(long, default_value = "")]
    pub personal_other: String,

    #[arg(long, default_value = "")]
    pub family_salary_excess: String,

    #[arg(long, default_value = "")]
    pub family_benefits_excess: String,

    /// Market cost of replacing the owner's management role
    #[arg(long, default_value = "")]
    pub management_replacement: String,

    #[arg(long, default_value = "")]
    pub additional_benefits: String,

    #[arg(long, default_value = "")]
    pub additional_insurance: String,
}

pub fn run_cash_flow(
    args: CashFlowArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: CashFlowInputs = match input::read_structured(args.input.as_deref())? {
        Some(data) => data,
        None => CashFlowInputs {
            net_income: args.net_income,
            depreciation: args.depreciation,
            interest_expense: args.interest_expense,
            owner_salary_excess: args.owner_salary_excess,
            owner_bonuses_discretionary: args.owner_bonuses,
            owner_benefits_excess: args.owner_benefits_excess,
            personal_expenses_auto: args.personal_auto,
            personal_expenses_travel: args.personal_travel,
            personal_expenses_other: args.personal_other,
            family_salary_excess: args.family_salary_excess,
            family_benefits_excess: args.family_benefits_excess,
            management_replacement: args.management_replacement,
            additional_benefits: args.additional_benefits,
            additional_insurance: args.additional_insurance,
        },
    };
    let result = cash_flow::normalize_cash_flow(&inputs, config)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the post-exit wealth gap
#[derive(Args)]
pub struct WealthGapArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_wealth_gap(
    args: WealthGapArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: WealthGapInputs = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for wealth gap")?;
    let result = wealth_gap::calculate_wealth_gap(&inputs, config)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the owner-centricity questionnaire
#[derive(Args)]
pub struct OwnerCentricityArgs {
    /// Path to JSON input file with questionnaire answers
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_owner_centricity(args: OwnerCentricityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let answers: OwnerCentricityInput = input::read_structured(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for owner centricity")?;
    let result = owner_centricity::score_owner_centricity(&answers)?;
    Ok(serde_json::to_value(result)?)
}
