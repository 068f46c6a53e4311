// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (close_{t-n+1} + ... + close_t) / n
//
// The output has one value per bar; the first `n - 1` positions are 0.0.

use tracing::debug;

use crate::error::Result;
use crate::indicators::rolling::windowed_mean;
use crate::indicators::IndicatorSeries;
use crate::market_data::PriceSeries;

/// Compute the SMA of the closing prices over `window` bars.
///
/// Fails with `InvalidWindow` when `window` is zero or longer than the series,
/// and with `NoDataLoaded` on an empty series.
pub fn calculate_sma(series: &PriceSeries, window: usize) -> Result<IndicatorSeries> {
    let sma = windowed_mean(series, window)?;
    debug!(window, len = sma.len(), "SMA computed");
    Ok(sma)
}
