use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use exitplan_core::analysis::{self, AnalysisRequest};
use exitplan_core::assessment;
use exitplan_core::readiness::{self, ReadinessInput};
use exitplan_core::recommendations::{self, NoopEnhancer};
use exitplan_core::EngineConfig;

use super::profile::ProfileArgs;
use crate::input;

/// Arguments for a position assessment
#[derive(Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub fn run_assess(args: AssessArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let result = assessment::calculate_position(&profile, config)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for ROI-ranked recommendations
#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub fn run_recommend(
    args: RecommendArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let result = recommendations::calculate_recommendations(&profile, config, &NoopEnhancer)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the exit timeline
#[derive(Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

pub fn run_timeline(
    args: TimelineArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = args.profile.resolve()?;
    let result = recommendations::calculate_timeline(&profile, config)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the full exit-planning analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Owner's personal readiness, 0-100
    #[arg(long)]
    pub personal_readiness: Option<Decimal>,
}

pub fn run_analyze(
    args: AnalyzeArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AnalysisRequest = match input::read_structured(args.profile.input.as_deref())? {
        Some(data) => data,
        None => AnalysisRequest {
            profile: args.profile.to_profile()?,
            personal_readiness: args.personal_readiness,
        },
    };
    let result = analysis::analyze_business(&request, config, &NoopEnhancer)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the exit-readiness score
#[derive(Args)]
pub struct ReadinessArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Financial readiness, 0-100
    #[arg(long)]
    pub financial: Option<Decimal>,

    /// Business readiness, 0-100
    #[arg(long)]
    pub business: Option<Decimal>,

    /// Personal readiness, 0-100
    #[arg(long)]
    pub personal: Option<Decimal>,

    /// Market readiness, 0-100
    #[arg(long)]
    pub market: Option<Decimal>,
}

pub fn run_readiness(
    args: ReadinessArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let readiness_input: ReadinessInput = match input::read_structured(args.input.as_deref())? {
        Some(data) => data,
        None => ReadinessInput {
            financial: args
                .financial
                .ok_or("--financial is required (or provide --input)")?,
            business: args
                .business
                .ok_or("--business is required (or provide --input)")?,
            personal: args
                .personal
                .ok_or("--personal is required (or provide --input)")?,
            market: args
                .market
                .ok_or("--market is required (or provide --input)")?,
        },
    };
    let result = readiness::calculate_readiness(&readiness_input, config)?;
    Ok(serde_json::to_value(result)?)
}
