// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free transforms over a `PriceSeries`. Every public
// function validates its preconditions eagerly and returns a `Result`; a
// successful series result always has exactly one value per input bar.

pub mod bollinger;
pub mod ema;
pub mod returns;
pub mod rolling;
pub mod rsi;
pub mod sma;

/// One value per input bar, positionally aligned with the price series.
pub type IndicatorSeries = Vec<f64>;

pub use bollinger::{calculate_bollinger, BollingerBands, DEFAULT_NUM_STD};
pub use ema::calculate_ema;
pub use returns::{calculate_statistics, StatisticsSummary};
pub use rolling::{windowed_mean, windowed_std};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
