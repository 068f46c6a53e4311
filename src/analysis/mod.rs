// =============================================================================
// Analysis Module
// =============================================================================
//
// Command surface on top of the indicator transforms:
// - Command parsing (sma | ema | rsi | bollinger | stats | summary | all)
// - Job planning and sequential / parallel execution into an ordered report
// - Latest-value summary and SMA crossover signals

pub mod command;
pub mod report;
pub mod summary;

pub use command::Command;
pub use report::{plan, run, run_parallel, AnalysisEnvelope, AnalysisReport, IndicatorJob, IndicatorValue};
pub use summary::{analysis_summary, detect_crossovers, AnalysisSummary, CrossoverSignal, SignalKind};
