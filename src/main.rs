// =============================================================================
// Stock Indicators: command-line entry point
// =============================================================================
//
// Reads a JSON array of price records from a file or stdin, runs one command
// and prints the result as JSON on stdout. Failures print `{"error": "..."}`
// on stdout and exit with status 1. Logs go to stderr.
// =============================================================================

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stock_indicators::analysis::{self, AnalysisEnvelope, Command};
use stock_indicators::{parse_records, RuntimeConfig};

const DEFAULT_CONFIG_PATH: &str = "indicators_config.json";

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// One of: sma, ema, rsi, bollinger, stats, summary, all
    command: String,

    /// JSON file with price records (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Config file (defaults to $INDICATORS_CONFIG or indicators_config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep only bars dated on or after this day (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Keep only bars dated on or before this day (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Wrap the results with command / data-point / timestamp metadata
    #[arg(long)]
    metadata: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match execute(cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!(error = %format!("{e:#}"), "analysis failed");
            let payload = serde_json::json!({ "error": format!("{e:#}") });
            println!("{payload}");
            std::process::exit(1);
        }
    }
}

async fn execute(cli: Cli) -> Result<String> {
    let command: Command = cli.command.parse()?;
    let config = load_config(cli.config)?;

    let raw = match &cli.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read price data from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read price data from stdin")?;
            buf
        }
    };

    let mut series = parse_records(&raw)?;
    if cli.start.is_some() || cli.end.is_some() {
        let start = cli.start.unwrap_or(NaiveDate::MIN);
        let end = cli.end.unwrap_or(NaiveDate::MAX);
        series = series.between(start, end)?;
        info!(%start, %end, bars = series.len(), "date range applied");
    }
    let series = Arc::new(series);
    info!(%command, bars = series.len(), parallel = config.parallel, "price series loaded");

    let report = if config.parallel {
        analysis::run_parallel(command, Arc::clone(&series), &config).await?
    } else {
        analysis::run(command, &series, &config)?
    };

    let output = if cli.metadata {
        let envelope = AnalysisEnvelope::new(command, &series, report);
        to_json(&envelope, cli.pretty)?
    } else {
        to_json(&report, cli.pretty)?
    };
    Ok(output)
}

/// Explicit `--config` must load; the implicit default path may be absent.
fn load_config(explicit: Option<PathBuf>) -> Result<RuntimeConfig> {
    if let Some(path) = explicit {
        return RuntimeConfig::load(path);
    }

    let path = std::env::var("INDICATORS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    Ok(RuntimeConfig::load(&path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    }))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("failed to serialise analysis output")
}
