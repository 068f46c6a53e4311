// =============================================================================
// Latest-value summary and SMA crossover signals
// =============================================================================
//
// Both views are derived from a short/long SMA pair:
//
// - The summary reports the latest close against the latest value of each
//   SMA. An SMA whose window exceeds the series is reported as absent.
// - The crossover scan walks positions where both SMAs are past warm-up and
//   flags a golden cross (short crosses above long => BUY) or a death cross
//   (short crosses below long => SELL). Warm-up zeros never take part, and a
//   series shorter than the long window has no signals.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::indicators::calculate_sma;
use crate::market_data::PriceSeries;

/// Snapshot of the most recent bar against two moving averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub latest_price: f64,
    pub short_window: usize,
    pub long_window: usize,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub above_sma_short: Option<bool>,
    pub above_sma_long: Option<bool>,
    pub data_points: usize,
}

/// Direction of a moving-average crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    /// Golden cross.
    Buy,
    /// Death cross.
    Sell,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A single crossover event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverSignal {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub signal: SignalKind,
    pub short_sma: f64,
    pub long_sma: f64,
    pub price: f64,
}

/// Latest close compared with the latest short and long SMA.
pub fn analysis_summary(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<AnalysisSummary> {
    let closes = series.require_data()?;
    let latest_price = closes[closes.len() - 1];

    let latest_sma = |window: usize| -> Result<Option<f64>> {
        if window == 0 || window > closes.len() {
            return Ok(None);
        }
        Ok(calculate_sma(series, window)?.last().copied())
    };

    let sma_short = latest_sma(short_window)?;
    let sma_long = latest_sma(long_window)?;

    Ok(AnalysisSummary {
        latest_price,
        short_window,
        long_window,
        sma_short,
        sma_long,
        above_sma_short: sma_short.map(|sma| latest_price > sma),
        above_sma_long: sma_long.map(|sma| latest_price > sma),
        data_points: closes.len(),
    })
}

/// Every golden / death cross between the short and long SMA.
pub fn detect_crossovers(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<Vec<CrossoverSignal>> {
    if short_window == 0 || short_window >= long_window {
        return Err(IndicatorError::InvalidWindowPair {
            short: short_window,
            long: long_window,
        });
    }

    let len = series.require_data()?.len();
    if long_window > len {
        debug!(long_window, len, "series shorter than long window, no crossovers");
        return Ok(Vec::new());
    }

    let short = calculate_sma(series, short_window)?;
    let long = calculate_sma(series, long_window)?;
    let bars = series.bars();

    let mut signals = Vec::new();
    for i in long_window..bars.len() {
        let (prev_short, prev_long) = (short[i - 1], long[i - 1]);
        let (curr_short, curr_long) = (short[i], long[i]);

        let signal = if prev_short <= prev_long && curr_short > curr_long {
            SignalKind::Buy
        } else if prev_short >= prev_long && curr_short < curr_long {
            SignalKind::Sell
        } else {
            continue;
        };

        signals.push(CrossoverSignal {
            index: i,
            date: bars[i].date,
            signal,
            short_sma: curr_short,
            long_sma: curr_long,
            price: bars[i].close,
        });
    }

    debug!(short_window, long_window, count = signals.len(), "crossover scan complete");
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes).unwrap()
    }

    /// Falls for ten bars, then rises for ten: the 2-bar SMA overtakes the
    /// 4-bar SMA once on the way up.
    fn v_shape() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..10).map(|i| 100.0 - i as f64).collect();
        closes.extend((1..=10).map(|i| 91.0 + i as f64));
        closes
    }

    #[test]
    fn summary_compares_latest_close() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let summary = analysis_summary(&series(&closes), 20, 50).unwrap();
        assert_eq!(summary.latest_price, 60.0);
        assert_eq!(summary.data_points, 60);
        assert!((summary.sma_short.unwrap() - 50.5).abs() < 1e-9);
        assert!((summary.sma_long.unwrap() - 35.5).abs() < 1e-9);
        assert_eq!(summary.above_sma_short, Some(true));
        assert_eq!(summary.above_sma_long, Some(true));
    }

    #[test]
    fn summary_without_enough_history() {
        let summary = analysis_summary(&series(&[10.0, 9.0, 8.0]), 2, 50).unwrap();
        assert_eq!(summary.sma_short, Some(8.5));
        assert_eq!(summary.above_sma_short, Some(false));
        assert_eq!(summary.sma_long, None);
        assert_eq!(summary.above_sma_long, None);
    }

    #[test]
    fn summary_requires_data() {
        assert_eq!(
            analysis_summary(&PriceSeries::default(), 20, 50),
            Err(IndicatorError::NoDataLoaded)
        );
    }

    #[test]
    fn golden_cross_on_recovery() {
        let signals = detect_crossovers(&series(&v_shape()), 2, 4).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal, SignalKind::Buy);
        assert!(signals[0].short_sma > signals[0].long_sma);
    }

    #[test]
    fn death_cross_on_decline() {
        let inverted: Vec<f64> = v_shape().iter().map(|c| 200.0 - c).collect();
        let signals = detect_crossovers(&series(&inverted), 2, 4).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].signal, SignalKind::Sell);
    }

    #[test]
    fn warmup_zeros_never_trigger_signals() {
        // Monotonic rise: short SMA is above long SMA from the first
        // warmed-up bar, so there is no cross to report.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert!(detect_crossovers(&series(&closes), 5, 10).unwrap().is_empty());
    }

    #[test]
    fn rejects_inverted_pair_and_empty_series() {
        let s = series(&v_shape());
        assert_eq!(
            detect_crossovers(&s, 4, 2),
            Err(IndicatorError::InvalidWindowPair { short: 4, long: 2 })
        );
        assert_eq!(
            detect_crossovers(&PriceSeries::default(), 2, 4),
            Err(IndicatorError::NoDataLoaded)
        );
    }

    #[test]
    fn series_shorter_than_long_window_has_no_signals() {
        assert!(detect_crossovers(&series(&v_shape()), 2, 50).unwrap().is_empty());
        assert!(detect_crossovers(&series(&[1.0, 2.0, 3.0]), 2, 3).unwrap().is_empty());
    }

    #[test]
    fn signal_kind_serialises_uppercase() {
        assert_eq!(serde_json::to_string(&SignalKind::Buy).unwrap(), "\"BUY\"");
        assert_eq!(SignalKind::Sell.to_string(), "SELL");
    }
}
