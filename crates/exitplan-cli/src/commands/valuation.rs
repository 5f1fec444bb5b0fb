use clap::Args;
use serde_json::{json, Value};

use exitplan_core::industry::{benchmark_for, resolve_industry, IndustryKey};
use exitplan_core::valuation::value_tracker::{self, ValueTrackerInput};
use exitplan_core::valuation::{self, ValueRange};
use exitplan_core::EngineConfig;

use super::profile::ProfileArgs;
use crate::input;

/// Arguments for a business valuation
#[derive(Args)]
pub struct ValueArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Include the low/high range only, without the multiplier breakdown
    #[arg(long)]
    pub range_only: bool,
}

pub fn run_value(args: ValueArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let result = valuation::calculate_valuation(&profile, config)?;
    if args.range_only {
        let range: &ValueRange = &result.result.range;
        return Ok(serde_json::to_value(range)?);
    }
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the value tracker
#[derive(Args)]
pub struct ValueTrackerArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Improvement ids to apply (comma-separated, e.g. "management,financial-controls")
    #[arg(long, value_delimiter = ',')]
    pub improvements: Vec<String>,

    /// List the improvement catalogue and exit
    #[arg(long)]
    pub list: bool,
}

pub fn run_value_tracker(
    args: ValueTrackerArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    if args.list {
        return Ok(serde_json::to_value(value_tracker::improvement_catalogue())?);
    }

    let tracker_input: ValueTrackerInput =
        match input::read_structured(args.profile.input.as_deref())? {
            Some(data) => data,
            None => ValueTrackerInput {
                profile: args.profile.to_profile()?,
                selected: args.improvements,
            },
        };

    let result = value_tracker::track_value(&tracker_input, config)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for industry benchmark lookup
#[derive(Args)]
pub struct IndustryArgs {
    /// Industry name to resolve; lists every benchmark when omitted
    #[arg(long)]
    pub name: Option<String>,
}

pub fn run_industry(args: IndustryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.name {
        Some(name) => {
            let key = resolve_industry(&name);
            if key.is_fallback() {
                tracing::info!(industry = %name, "no keyword match, using general benchmark");
            }
            Ok(json!({
                "input": name,
                "resolved": key,
                "fallback": key.is_fallback(),
                "benchmark": benchmark_for(key),
            }))
        }
        None => {
            let all: Vec<_> = [
                IndustryKey::ProfessionalServices,
                IndustryKey::Manufacturing,
                IndustryKey::Retail,
                IndustryKey::Technology,
            ]
            .into_iter()
            .map(benchmark_for)
            .collect();
            Ok(serde_json::to_value(all)?)
        }
    }
}
