// =============================================================================
// Analysis Report: command planning and execution
// =============================================================================
//
// A command expands into an ordered list of independent jobs. Each job is a
// pure function of the price series, so jobs may run sequentially or on
// separate blocking workers; either way the report is assembled in plan
// order and a single failing job fails the whole report.
//
// Output keys mirror the historical JSON contract:
//   sma_<w>, ema_<w>, rsi, bollinger_bands, statistics, summary, crossovers
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::analysis::command::Command;
use crate::analysis::summary::{analysis_summary, detect_crossovers, AnalysisSummary, CrossoverSignal};
use crate::error::{IndicatorError, Result};
use crate::indicators::{
    calculate_bollinger, calculate_ema, calculate_rsi, calculate_sma, calculate_statistics,
    BollingerBands, IndicatorSeries, StatisticsSummary,
};
use crate::market_data::PriceSeries;
use crate::runtime_config::RuntimeConfig;

// =============================================================================
// Jobs
// =============================================================================

/// One independent computation within a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorJob {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Bollinger { window: usize, num_std: f64 },
    Statistics,
    Summary { short_window: usize, long_window: usize },
    Crossovers { short_window: usize, long_window: usize },
}

/// Result of a single job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Series(IndicatorSeries),
    Bands(BollingerBands),
    Statistics(StatisticsSummary),
    Summary(AnalysisSummary),
    Crossovers(Vec<CrossoverSignal>),
}

impl IndicatorJob {
    /// Key under which the job's result is reported.
    pub fn key(&self) -> String {
        match self {
            Self::Sma(w) => format!("sma_{w}"),
            Self::Ema(w) => format!("ema_{w}"),
            Self::Rsi(_) => "rsi".to_string(),
            Self::Bollinger { .. } => "bollinger_bands".to_string(),
            Self::Statistics => "statistics".to_string(),
            Self::Summary { .. } => "summary".to_string(),
            Self::Crossovers { .. } => "crossovers".to_string(),
        }
    }

    pub fn execute(&self, series: &PriceSeries) -> Result<IndicatorValue> {
        match *self {
            Self::Sma(w) => calculate_sma(series, w).map(IndicatorValue::Series),
            Self::Ema(w) => calculate_ema(series, w).map(IndicatorValue::Series),
            Self::Rsi(w) => calculate_rsi(series, w).map(IndicatorValue::Series),
            Self::Bollinger { window, num_std } => {
                calculate_bollinger(series, window, num_std).map(IndicatorValue::Bands)
            }
            Self::Statistics => calculate_statistics(series).map(IndicatorValue::Statistics),
            Self::Summary { short_window, long_window } => {
                analysis_summary(series, short_window, long_window).map(IndicatorValue::Summary)
            }
            Self::Crossovers { short_window, long_window } => {
                detect_crossovers(series, short_window, long_window).map(IndicatorValue::Crossovers)
            }
        }
    }
}

/// Expand a command into its jobs, in output order.
pub fn plan(command: Command, config: &RuntimeConfig) -> Vec<IndicatorJob> {
    let smas = config.sma_windows.iter().map(|&w| IndicatorJob::Sma(w));
    let bollinger = IndicatorJob::Bollinger {
        window: config.bollinger_window,
        num_std: config.bollinger_num_std,
    };
    let (short_window, long_window) = (config.crossover.short_window, config.crossover.long_window);

    match command {
        Command::Sma => smas.collect(),
        Command::Ema => config.ema_windows.iter().map(|&w| IndicatorJob::Ema(w)).collect(),
        Command::Rsi => vec![IndicatorJob::Rsi(config.rsi_window)],
        Command::Bollinger => vec![bollinger],
        Command::Stats => vec![IndicatorJob::Statistics],
        Command::Summary => vec![
            IndicatorJob::Summary { short_window, long_window },
            IndicatorJob::Crossovers { short_window, long_window },
        ],
        Command::All => smas
            .chain(config.all_ema_windows.iter().map(|&w| IndicatorJob::Ema(w)))
            .chain([
                IndicatorJob::Rsi(config.rsi_window),
                bollinger,
                IndicatorJob::Statistics,
            ])
            .collect(),
    }
}

// =============================================================================
// Report
// =============================================================================

/// Named results in plan order. Serialises as a JSON object whose keys keep
/// that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    entries: Vec<(String, IndicatorValue)>,
}

impl AnalysisReport {
    pub fn get(&self, key: &str) -> Option<&IndicatorValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AnalysisReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Report plus the metadata block attached by callers that want provenance.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisEnvelope {
    pub command: Command,
    pub data_points: usize,
    pub generated_at: DateTime<Utc>,
    pub results: AnalysisReport,
}

impl AnalysisEnvelope {
    pub fn new(command: Command, series: &PriceSeries, results: AnalysisReport) -> Self {
        Self {
            command,
            data_points: series.len(),
            generated_at: Utc::now(),
            results,
        }
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Run `command` on the calling thread.
pub fn run(command: Command, series: &PriceSeries, config: &RuntimeConfig) -> Result<AnalysisReport> {
    series.require_data()?;
    let jobs = plan(command, config);
    debug!(%command, jobs = jobs.len(), bars = series.len(), "running analysis");

    let entries = jobs
        .iter()
        .map(|job| job.execute(series).map(|value| (job.key(), value)))
        .collect::<Result<Vec<_>>>()?;

    Ok(AnalysisReport { entries })
}

/// Run `command` with one blocking worker per job, joined before the report
/// is assembled.
pub async fn run_parallel(
    command: Command,
    series: Arc<PriceSeries>,
    config: &RuntimeConfig,
) -> Result<AnalysisReport> {
    series.require_data()?;
    let jobs = plan(command, config);
    info!(%command, jobs = jobs.len(), bars = series.len(), "running analysis in parallel");

    let handles = jobs.iter().map(|&job| {
        let series = Arc::clone(&series);
        tokio::task::spawn_blocking(move || job.execute(&series))
    });
    let outcomes = join_all(handles).await;

    let mut entries = Vec::with_capacity(jobs.len());
    for (job, outcome) in jobs.iter().zip(outcomes) {
        let value = outcome.map_err(|e| IndicatorError::Task(e.to_string()))??;
        entries.push((job.key(), value));
    }

    Ok(AnalysisReport { entries })
}
