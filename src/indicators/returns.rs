// =============================================================================
// Return Statistics
// =============================================================================
//
// Whole-series summary derived from simple period returns
//
//   r_t = close_t / close_{t-1} - 1            (t >= 1)
//
// - mean_return  = mean(r)
// - volatility   = sample standard deviation of r
// - sharpe_ratio = mean_return / volatility, or 0.0 when volatility is zero
//                  (unannualised, no risk-free rate)
// - total_return = (close_last / close_first - 1) * 100
// - max_drawdown = min_t(close_t / max_{s<=t} close_s - 1) * 100   (<= 0)
//
// A single bar yields no returns; every statistic is then 0.0.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::indicators::rolling::mean_and_sample_std;
use crate::market_data::PriceSeries;

/// Five scalar statistics over the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub mean_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Percent.
    pub total_return: f64,
    /// Percent, never positive.
    pub max_drawdown: f64,
}

/// Period-over-period simple returns; one shorter than the input.
pub fn period_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Largest peak-to-trough decline in percent (0.0 for a series that never
/// falls below its running maximum).
pub fn max_drawdown_pct(closes: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &close in closes {
        peak = peak.max(close);
        worst = worst.min(close / peak - 1.0);
    }
    worst * 100.0
}

/// Compute the [`StatisticsSummary`] of the closing prices.
///
/// Fails only with `NoDataLoaded` on an empty series.
pub fn calculate_statistics(series: &PriceSeries) -> Result<StatisticsSummary> {
    let closes = series.require_data()?;

    let returns = period_returns(closes);
    let (mean_return, volatility) = mean_and_sample_std(&returns);
    let sharpe_ratio = if volatility != 0.0 {
        mean_return / volatility
    } else {
        0.0
    };

    let first = closes[0];
    let last = closes[closes.len() - 1];

    let summary = StatisticsSummary {
        mean_return,
        volatility,
        sharpe_ratio,
        total_return: (last / first - 1.0) * 100.0,
        max_drawdown: max_drawdown_pct(closes),
    };

    debug!(
        bars = closes.len(),
        mean_return = summary.mean_return,
        volatility = summary.volatility,
        "return statistics computed"
    );
    Ok(summary)
}
