// =============================================================================
// Stock Indicators: technical indicator engine for daily price bars
// =============================================================================
//
// Pure transforms over an immutable `PriceSeries`:
//   SMA, EMA, RSI, Bollinger Bands and whole-series return statistics.
//
// Warm-up positions are filled (0.0 for SMA / Bollinger, 50.0 for RSI) so
// every indicator series has exactly one value per input bar.
// =============================================================================

pub mod analysis;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod runtime_config;

pub use analysis::{run, run_parallel, AnalysisReport, Command};
pub use error::{IndicatorError, Result};
pub use market_data::{parse_records, PriceBar, PriceSeries};
pub use runtime_config::RuntimeConfig;
