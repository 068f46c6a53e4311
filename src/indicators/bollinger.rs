// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the sample standard deviation of
// the closes in the same trailing window.
//
// All three bands use the 0.0 warm-up fill of the SMA.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::indicators::rolling::{scan_windows, WARMUP_FILL};
use crate::indicators::IndicatorSeries;
use crate::market_data::PriceSeries;

/// Default band width in standard deviations.
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Three positionally aligned band series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    /// Middle band.
    pub sma: IndicatorSeries,
    #[serde(rename = "upper_band")]
    pub upper: IndicatorSeries,
    #[serde(rename = "lower_band")]
    pub lower: IndicatorSeries,
}

/// Calculate Bollinger Bands for the closing prices.
///
/// - `upper` = SMA + `num_std` * σ
/// - `lower` = SMA - `num_std` * σ
///
/// Fails with `InvalidWindow` for a zero or oversized window and with
/// `InvalidMultiplier` when `num_std` is negative or not finite.
pub fn calculate_bollinger(
    series: &PriceSeries,
    window: usize,
    num_std: f64,
) -> Result<BollingerBands> {
    let closes = series.require_window(window)?;
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(IndicatorError::InvalidMultiplier(num_std));
    }

    let len = closes.len();
    let mut bands = BollingerBands {
        sma: vec![WARMUP_FILL; len],
        upper: vec![WARMUP_FILL; len],
        lower: vec![WARMUP_FILL; len],
    };

    scan_windows(closes, window, |i, mean, std| {
        bands.sma[i] = mean;
        bands.upper[i] = mean + num_std * std;
        bands.lower[i] = mean - num_std * std;
    });

    debug!(window, num_std, len, "Bollinger Bands computed");
    Ok(bands)
}
