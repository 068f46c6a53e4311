// =============================================================================
// Windowed Statistics: trailing mean and sample standard deviation
// =============================================================================
//
// Single O(n) pass keeping a running sum and sum of squares over the trailing
// `window` values, both taken relative to a shift value. Every `window` steps
// the shift moves to the first value of the current window and the sums are
// rebuilt from that window alone. Add/remove rounding therefore never carries
// over more than one window, and the shift stays close to the prices being
// summed even when the series trends far from where it started. A flat
// window produces exactly zero.
//
//   mean_i = shift + S_i / n
//   var_i  = (Q_i - S_i^2 / n) / (n - 1)        (sample, Bessel-corrected)
//
// Positions before the window is full are filled with a caller-supplied
// value; the engine uses 0.0 for SMA / Bollinger and 50.0 for RSI.
// =============================================================================

use tracing::trace;

use crate::error::Result;
use crate::indicators::IndicatorSeries;
use crate::market_data::PriceSeries;

/// Fill value for SMA and Bollinger warm-up positions.
pub const WARMUP_FILL: f64 = 0.0;

/// Visit every fully populated window of `values`, calling
/// `emit(index, mean, sample_std)` with `index` the last position in the
/// window. Nothing is emitted when `window` is zero or exceeds the input.
pub(crate) fn scan_windows(values: &[f64], window: usize, mut emit: impl FnMut(usize, f64, f64)) {
    if window == 0 || window > values.len() {
        return;
    }

    let n = window as f64;
    let mut shift = values[0];
    let mut sum = 0.0_f64;
    let mut sum_sq = 0.0_f64;

    for (i, &value) in values.iter().enumerate() {
        if (i + 1) % window == 0 {
            // Re-anchor on the window start and rebuild.
            let start = i + 1 - window;
            shift = values[start];
            (sum, sum_sq) = shifted_sums(&values[start..=i], shift);
        } else {
            let x = value - shift;
            sum += x;
            sum_sq += x * x;

            if i >= window {
                let y = values[i - window] - shift;
                sum -= y;
                sum_sq -= y * y;
            }
        }

        if i + 1 >= window {
            let mean = shift + sum / n;
            let std = if window > 1 {
                ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0).sqrt()
            } else {
                0.0
            };
            emit(i, mean, std);
        }
    }
}

fn shifted_sums(values: &[f64], shift: f64) -> (f64, f64) {
    values.iter().fold((0.0, 0.0), |(sum, sum_sq), &v| {
        let x = v - shift;
        (sum + x, sum_sq + x * x)
    })
}

/// Trailing mean of `values`, warm-up positions set to `fill`.
pub fn rolling_mean(values: &[f64], window: usize, fill: f64) -> Vec<f64> {
    let mut out = vec![fill; values.len()];
    scan_windows(values, window, |i, mean, _| out[i] = mean);
    out
}

/// Trailing sample standard deviation of `values`, warm-up positions set to
/// `fill`. A one-element window has a standard deviation of `0.0`.
pub fn rolling_std(values: &[f64], window: usize, fill: f64) -> Vec<f64> {
    let mut out = vec![fill; values.len()];
    scan_windows(values, window, |i, _, std| out[i] = std);
    out
}

/// Mean and sample standard deviation of a whole slice.
///
/// An empty slice gives `(0.0, 0.0)`; a single value gives `(value, 0.0)`.
pub(crate) fn mean_and_sample_std(values: &[f64]) -> (f64, f64) {
    let mut result = (0.0, 0.0);
    scan_windows(values, values.len(), |_, mean, std| result = (mean, std));
    result
}

/// Sliding-window mean of the closing prices.
pub fn windowed_mean(series: &PriceSeries, window: usize) -> Result<IndicatorSeries> {
    let closes = series.require_window(window)?;
    trace!(window, len = closes.len(), "windowed mean");
    Ok(rolling_mean(closes, window, WARMUP_FILL))
}

/// Sliding-window sample standard deviation of the closing prices.
pub fn windowed_std(series: &PriceSeries, window: usize) -> Result<IndicatorSeries> {
    let closes = series.require_window(window)?;
    trace!(window, len = closes.len(), "windowed std");
    Ok(rolling_std(closes, window, WARMUP_FILL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use proptest::prelude::*;

    fn naive_mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    fn naive_sample_std(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let mean = naive_mean(values);
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (values.len() as f64 - 1.0)).sqrt()
    }

    #[test]
    fn mean_matches_known_values() {
        let out = rolling_mean(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, WARMUP_FILL);
        assert_eq!(out, vec![0.0, 0.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn std_of_arithmetic_progression() {
        // Sample std of three consecutive integers is exactly 1.
        let out = rolling_std(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, WARMUP_FILL);
        assert_eq!(out[..2], [0.0, 0.0]);
        for v in &out[2..] {
            assert!((v - 1.0).abs() < 1e-12, "got {v}");
        }
    }

    #[test]
    fn flat_window_has_zero_std() {
        let out = rolling_std(&[1234.56; 30], 20, WARMUP_FILL);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn window_of_one_is_identity_with_zero_std() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(rolling_mean(&values, 1, WARMUP_FILL), values.to_vec());
        assert!(rolling_std(&values, 1, WARMUP_FILL).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn oversized_window_leaves_fill() {
        assert_eq!(rolling_mean(&[1.0, 2.0], 3, 7.0), vec![7.0, 7.0]);
    }

    #[test]
    fn whole_slice_statistics() {
        assert_eq!(mean_and_sample_std(&[]), (0.0, 0.0));
        assert_eq!(mean_and_sample_std(&[-0.1]), (-0.1, 0.0));
        let (mean, std) = mean_and_sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((mean - 5.0).abs() < 1e-12);
        assert!((std - naive_sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])).abs() < 1e-12);
    }

    #[test]
    fn series_wrappers_validate_window() {
        let series = PriceSeries::from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
        assert_eq!(
            windowed_mean(&series, 10),
            Err(IndicatorError::InvalidWindow { window: 10, len: 5 })
        );
        assert_eq!(windowed_std(&PriceSeries::default(), 3), Err(IndicatorError::NoDataLoaded));
        assert_eq!(windowed_mean(&series, 5).unwrap()[4], 12.0);
    }

    #[test]
    fn long_trend_then_quiet_tail_matches_naive() {
        // 5000 bars climbing from 10 to ~1e5, then a +/-0.01 chop.
        let mut values: Vec<f64> = (0..5000).map(|i| 10.0 + 20.0 * i as f64).collect();
        let top = values[4999];
        values.extend((0..40).map(|k| if k % 2 == 0 { top + 0.01 } else { top - 0.01 }));

        let stds = rolling_std(&values, 20, WARMUP_FILL);
        let means = rolling_mean(&values, 20, WARMUP_FILL);
        for i in 19..values.len() {
            let slice = &values[i - 19..=i];
            let expected = naive_sample_std(slice);
            assert!(
                (stds[i] - expected).abs() <= 1e-9 + 1e-9 * expected,
                "std at {i}: rolling={} naive={expected}",
                stds[i]
            );
            assert!((means[i] - naive_mean(slice)).abs() <= 1e-9 * naive_mean(slice));
        }
        assert!(stds[values.len() - 1] > 0.01);
    }

    #[test]
    fn slow_drift_over_many_windows_matches_naive() {
        let values: Vec<f64> = (0..5000)
            .map(|i| 20.0 + 0.116 * i as f64 + (i as f64 * 0.3).sin() * 0.05)
            .collect();
        let stds = rolling_std(&values, 20, WARMUP_FILL);
        for i in 19..values.len() {
            let expected = naive_sample_std(&values[i - 19..=i]);
            assert!((stds[i] - expected).abs() <= 1e-10 * (1.0 + expected), "std at {i}");
        }
    }

    proptest! {
        #[test]
        fn running_sums_match_naive_recomputation(
            values in proptest::collection::vec(1.0f64..1_000.0, 1..120),
            window in 1usize..30,
        ) {
            prop_assume!(window <= values.len());
            let means = rolling_mean(&values, window, WARMUP_FILL);
            let stds = rolling_std(&values, window, WARMUP_FILL);
            prop_assert_eq!(means.len(), values.len());

            for i in 0..values.len() {
                if i + 1 < window {
                    prop_assert_eq!(means[i], 0.0);
                    prop_assert_eq!(stds[i], 0.0);
                } else {
                    let slice = &values[i + 1 - window..=i];
                    prop_assert!((means[i] - naive_mean(slice)).abs() < 1e-7);
                    let expected_var = naive_sample_std(slice).powi(2);
                    prop_assert!((stds[i].powi(2) - expected_var).abs() < 1e-6 * (1.0 + expected_var));
                }
            }
        }
    }
}
