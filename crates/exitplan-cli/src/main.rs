mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculators::{CashFlowArgs, OwnerCentricityArgs, WealthGapArgs};
use commands::planning::{AnalyzeArgs, AssessArgs, ReadinessArgs, RecommendArgs, TimelineArgs};
use commands::valuation::{IndustryArgs, ValueArgs, ValueTrackerArgs};

/// Business valuation and exit-planning calculations
#[derive(Parser)]
#[command(
    name = "exitplan",
    version,
    about = "Business valuation and exit-planning calculations",
    long_about = "A CLI for small-business exit planning with decimal precision. \
                  Supports valuation, position assessment, ROI-ranked recommendations, \
                  exit timelines, cash-flow normalization, wealth-gap and readiness scoring."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate business value from EBITDA and risk multipliers
    Value(ValueArgs),
    /// Score the business's current position against its industry
    Assess(AssessArgs),
    /// ROI-ranked improvement recommendations
    Recommend(RecommendArgs),
    /// Recommended exit timeline with milestones
    Timeline(TimelineArgs),
    /// Full analysis: position, value, recommendations, timeline, readiness
    Analyze(AnalyzeArgs),
    /// Weighted exit-readiness score
    Readiness(ReadinessArgs),
    /// Normalize net income into adjusted cash flow
    CashFlow(CashFlowArgs),
    /// Post-exit wealth gap across withdrawal-rate scenarios
    WealthGap(WealthGapArgs),
    /// Score an owner-centricity questionnaire
    OwnerCentricity(OwnerCentricityArgs),
    /// Project value for selected improvements
    ValueTracker(ValueTrackerArgs),
    /// Resolve an industry name and show its benchmark
    Industry(IndustryArgs),
    /// Print the effective engine configuration
    Config,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let config = input::config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Value(args) => commands::valuation::run_value(args, &config),
        Commands::Assess(args) => commands::planning::run_assess(args, &config),
        Commands::Recommend(args) => commands::planning::run_recommend(args, &config),
        Commands::Timeline(args) => commands::planning::run_timeline(args, &config),
        Commands::Analyze(args) => commands::planning::run_analyze(args, &config),
        Commands::Readiness(args) => commands::planning::run_readiness(args, &config),
        Commands::CashFlow(args) => commands::calculators::run_cash_flow(args, &config),
        Commands::WealthGap(args) => commands::calculators::run_wealth_gap(args, &config),
        Commands::OwnerCentricity(args) => commands::calculators::run_owner_centricity(args),
        Commands::ValueTracker(args) => commands::valuation::run_value_tracker(args, &config),
        Commands::Industry(args) => commands::valuation::run_industry(args),
        Commands::Config => Ok(serde_json::to_value(&config)?),
        Commands::Version => Ok(serde_json::json!({
            "name": "exitplan",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = cli.output.clone();

    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
