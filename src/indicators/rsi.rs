// =============================================================================
// Relative Strength Index (RSI): simple rolling averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1. Compute price changes (deltas) from consecutive closes. The first
//          bar has no predecessor and contributes a zero gain and zero loss.
// Step 2. gain = max(delta, 0), loss = max(-delta, 0).
// Step 3. avg_gain / avg_loss = trailing simple mean over `window` positions
//          (not Wilder's recursive smoothing).
// Step 4. RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Positions before the gain/loss window is full are filled with 50.0
// (neutral), unlike the 0.0 fill used by SMA and Bollinger Bands.
// =============================================================================

use tracing::debug;

use crate::error::Result;
use crate::indicators::IndicatorSeries;
use crate::market_data::PriceSeries;

/// Neutral RSI used for warm-up positions and for windows with no movement.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the full RSI series for the closing prices and `window`.
///
/// The returned vector has one value per bar.
///
/// # Edge cases
/// - empty series => `NoDataLoaded`
/// - `window == 0` or `window > len` => `InvalidWindow`
/// - average loss zero, average gain positive => 100.0
/// - average loss and gain both zero => 50.0
pub fn calculate_rsi(series: &PriceSeries, window: usize) -> Result<IndicatorSeries> {
    let closes = series.require_window(window)?;

    let (gains, losses) = gains_and_losses(closes);
    let avg_gain = rolling_means(&gains, window);
    let avg_loss = rolling_means(&losses, window);

    let mut rsi = vec![NEUTRAL_RSI; closes.len()];
    for (i, (g, l)) in avg_gain.into_iter().zip(avg_loss).enumerate() {
        if let (Some(g), Some(l)) = (g, l) {
            rsi[i] = rsi_from_averages(g, l);
        }
    }

    debug!(window, len = rsi.len(), "RSI computed");
    Ok(rsi)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Split period-over-period changes into gain and loss columns, aligned with
/// the input (index 0 is zero in both).
fn gains_and_losses(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);

    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    (gains, losses)
}

/// Trailing mean with `None` for positions whose window is not yet full.
///
/// Tracks how many non-zero entries are inside the window so a window of
/// zeros averages to exactly 0.0 regardless of running-sum residue.
fn rolling_means(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    let n = window as f64;
    let mut sum = 0.0_f64;
    let mut active = 0_usize;

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if value != 0.0 {
            active += 1;
        }

        if i >= window {
            let old = values[i - window];
            sum -= old;
            if old != 0.0 {
                active -= 1;
            }
        }

        if i + 1 >= window {
            out[i] = Some(if active == 0 { 0.0 } else { (sum / n).max(0.0) });
        }
    }

    out
}

/// Convert average gain / average loss into an RSI value.
///
/// - If both averages are zero, RSI is 50.0 (RS is 0/0).
/// - If average loss is zero (only gains), RSI is 100.0 (RS is +inf).
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        NEUTRAL_RSI
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndicatorError;
    use proptest::prelude::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes).unwrap()
    }

    #[test]
    fn rsi_empty_input() {
        assert_eq!(
            calculate_rsi(&PriceSeries::default(), 14),
            Err(IndicatorError::NoDataLoaded)
        );
    }

    #[test]
    fn rsi_window_too_large() {
        let closes: Vec<f64> = (1..=5).map(|x| x as f64).collect();
        assert_eq!(
            calculate_rsi(&series(&closes), 10),
            Err(IndicatorError::InvalidWindow { window: 10, len: 5 })
        );
    }

    #[test]
    fn rsi_warmup_is_neutral() {
        let closes: Vec<f64> = (1..=30).map(|x| (x as f64).sin() + 10.0).collect();
        let rsi = calculate_rsi(&series(&closes), 14).unwrap();
        assert_eq!(rsi.len(), closes.len());
        assert!(rsi[..13].iter().all(|&v| v == NEUTRAL_RSI));
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100 once warmed up.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&series(&closes), 14).unwrap();
        for &v in &rsi[13..] {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&series(&closes), 14).unwrap();
        for &v in &rsi[13..] {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market() {
        // No price change at all => 0/0 resolves to neutral.
        let rsi = calculate_rsi(&series(&[100.0; 30]), 14).unwrap();
        assert!(rsi.iter().all(|&v| v == NEUTRAL_RSI));
    }

    #[test]
    fn rsi_known_small_window() {
        // closes 10, 12, 11, 13: gains [0,2,0,2], losses [0,0,1,0]
        // window 3 at index 2: avg_gain 2/3, avg_loss 1/3 => RS 2 => RSI 66.67
        // window 3 at index 3: avg_gain 4/3, avg_loss 1/3 => RS 4 => RSI 80
        let rsi = calculate_rsi(&series(&[10.0, 12.0, 11.0, 13.0]), 3).unwrap();
        assert_eq!(rsi[..2], [50.0, 50.0]);
        assert!((rsi[2] - 200.0 / 3.0).abs() < 1e-9, "got {}", rsi[2]);
        assert!((rsi[3] - 80.0).abs() < 1e-9, "got {}", rsi[3]);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&series(&closes), 14).unwrap();
        for &v in &rsi {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    proptest! {
        #[test]
        fn rsi_stays_in_range(
            closes in proptest::collection::vec(1.0f64..1_000.0, 2..100),
            window in 1usize..20,
        ) {
            prop_assume!(window <= closes.len());
            let rsi = calculate_rsi(&series(&closes), window).unwrap();
            prop_assert_eq!(rsi.len(), closes.len());
            for (i, &v) in rsi.iter().enumerate() {
                prop_assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
                if i + 1 < window {
                    prop_assert_eq!(v, NEUTRAL_RSI);
                }
            }
        }
    }
}
