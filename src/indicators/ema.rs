// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = alpha * close_t + (1 - alpha) * EMA_{t-1}
//
// The recurrence is seeded with the first observed close rather than an SMA
// of the first `span` closes, so every position is defined and a span longer
// than the series is not an error.
// =============================================================================

use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::indicators::IndicatorSeries;
use crate::market_data::PriceSeries;

/// Smoothing factor for a given span.
pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Run the EMA recurrence over `values`. Empty input gives an empty output.
pub fn ema_recurrence(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();

    if let Some(&first) = iter.next() {
        let mut prev = first;
        result.push(prev);
        for &value in iter {
            prev = alpha * value + (1.0 - alpha) * prev;
            result.push(prev);
        }
    }

    result
}

/// Compute the EMA series of the closing prices for `span`.
///
/// # Edge cases
/// - empty series => `NoDataLoaded`
/// - `span == 0` => `InvalidWindow`
/// - `span > len` => computed normally
pub fn calculate_ema(series: &PriceSeries, span: usize) -> Result<IndicatorSeries> {
    let closes = series.require_data()?;
    if span == 0 {
        return Err(IndicatorError::InvalidWindow {
            window: span,
            len: closes.len(),
        });
    }

    let ema = ema_recurrence(closes, smoothing_factor(span));
    debug!(span, len = ema.len(), "EMA computed");
    Ok(ema)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes).unwrap()
    }

    #[test]
    fn ema_known_values() {
        // alpha = 2/3 for span 2.
        let ema = calculate_ema(&series(&[10.0, 11.0, 12.0, 13.0, 14.0]), 2).unwrap();
        let expected = [10.0, 10.667, 11.556, 12.519, 13.506];
        assert_eq!(ema.len(), expected.len());
        for (a, b) in ema.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-3, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_seeded_with_first_close() {
        let ema = calculate_ema(&series(&[42.0, 40.0, 41.0]), 20).unwrap();
        assert_eq!(ema[0], 42.0);
    }

    #[test]
    fn ema_span_longer_than_series_still_runs() {
        let ema = calculate_ema(&series(&[1.0, 2.0, 3.0]), 50).unwrap();
        assert_eq!(ema.len(), 3);
        assert!(ema.iter().all(|v| v.is_finite() && *v > 0.0));
    }

    #[test]
    fn ema_span_one_tracks_close() {
        let closes = [5.0, 7.0, 6.0, 9.0];
        assert_eq!(calculate_ema(&series(&closes), 1).unwrap(), closes.to_vec());
    }

    #[test]
    fn ema_rejects_zero_span_and_empty_series() {
        assert_eq!(
            calculate_ema(&series(&[1.0]), 0),
            Err(IndicatorError::InvalidWindow { window: 0, len: 1 })
        );
        assert_eq!(
            calculate_ema(&PriceSeries::default(), 20),
            Err(IndicatorError::NoDataLoaded)
        );
    }

    #[test]
    fn flat_series_is_fixed_point() {
        let ema = calculate_ema(&series(&[100.0; 40]), 20).unwrap();
        assert!(ema.iter().all(|&v| (v - 100.0).abs() < 1e-10));
    }

    proptest! {
        #[test]
        fn recurrence_holds_everywhere(
            closes in proptest::collection::vec(1.0f64..500.0, 1..80),
            span in 1usize..60,
        ) {
            let ema = calculate_ema(&series(&closes), span).unwrap();
            let alpha = smoothing_factor(span);
            prop_assert_eq!(ema.len(), closes.len());
            prop_assert_eq!(ema[0], closes[0]);
            for t in 1..closes.len() {
                let expected = alpha * closes[t] + (1.0 - alpha) * ema[t - 1];
                prop_assert!((ema[t] - expected).abs() < 1e-9);
            }
        }
    }
}
