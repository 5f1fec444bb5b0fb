use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;

use exitplan_core::recommendations::NoopEnhancer;
use exitplan_core::EngineConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: DeserializeOwned>(json: &str) -> NapiResult<T> {
    serde_json::from_str(json).map_err(to_napi_error)
}

/// Engine configuration from an optional JSON override; defaults otherwise.
fn config_from(config_json: Option<String>) -> NapiResult<EngineConfig> {
    match config_json {
        Some(json) => {
            let config: EngineConfig = parse(&json)?;
            config.validate().map_err(to_napi_error)?;
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_value(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::BusinessProfile = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::valuation::calculate_valuation(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn track_value(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::valuation::value_tracker::ValueTrackerInput = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::valuation::value_tracker::track_value(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn industry_benchmark(industry: String) -> NapiResult<String> {
    let key = exitplan_core::industry::resolve_industry(&industry);
    let benchmark = exitplan_core::industry::benchmark_for(key);
    serde_json::to_string(benchmark).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Assessment and planning
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_position(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::BusinessProfile = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::assessment::calculate_position(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn recommend(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::BusinessProfile = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output =
        exitplan_core::recommendations::calculate_recommendations(&input, &config, &NoopEnhancer)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn exit_timeline(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::BusinessProfile = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::recommendations::calculate_timeline(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_business(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::analysis::AnalysisRequest = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::analysis::analyze_business(&input, &config, &NoopEnhancer)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn exit_readiness(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::readiness::ReadinessInput = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::readiness::calculate_readiness(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn owner_centricity(input_json: String) -> NapiResult<String> {
    let input: exitplan_core::assessment::owner_centricity::OwnerCentricityInput =
        parse(&input_json)?;
    let output = exitplan_core::assessment::owner_centricity::score_owner_centricity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn normalize_cash_flow(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::cash_flow::CashFlowInputs = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::cash_flow::normalize_cash_flow(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn wealth_gap(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let input: exitplan_core::wealth_gap::WealthGapInputs = parse(&input_json)?;
    let config = config_from(config_json)?;
    let output = exitplan_core::wealth_gap::calculate_wealth_gap(&input, &config)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Parse a currency-formatted string ("$1,250,000") to a decimal string.
#[napi]
pub fn parse_currency(raw: String) -> String {
    exitplan_core::currency::parse_currency(&raw).to_string()
}

#[napi]
pub fn default_config() -> NapiResult<String> {
    serde_json::to_string(&EngineConfig::default()).map_err(to_napi_error)
}
