use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};

// ---------------------------------------------------------------------------
// PriceBar
// ---------------------------------------------------------------------------

/// A single daily OHLCV bar. Only `close` feeds the indicators; the other
/// fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PriceBar {
    /// Bar carrying only a closing price.
    pub fn from_close(close: f64) -> Self {
        Self {
            date: None,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    fn validate(&self, index: usize) -> Result<()> {
        check_price(self.close, "close", index)?;
        for (value, field) in [(self.open, "open"), (self.high, "high"), (self.low, "low")] {
            if let Some(v) = value {
                check_price(v, field, index)?;
            }
        }
        Ok(())
    }
}

fn check_price(value: f64, field: &str, index: usize) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(IndicatorError::InvalidBar {
            index,
            reason: format!("{field} price {value} must be a positive finite number"),
        })
    }
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// Immutable, validated sequence of bars in ascending date order.
///
/// Construction checks every bar once, so the transforms never re-validate
/// individual prices. An empty series is representable; every transform
/// rejects it with [`IndicatorError::NoDataLoaded`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
    closes: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from bars that are already in chronological order.
    ///
    /// Dates are all-or-nothing: either every bar is dated (and the dates are
    /// strictly ascending) or none is.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        let dated = bars.first().map_or(false, |b| b.date.is_some());

        for (index, bar) in bars.iter().enumerate() {
            bar.validate(index)?;
            if bar.date.is_some() != dated {
                return Err(IndicatorError::InvalidBar {
                    index,
                    reason: "either every bar carries a date or none does".to_string(),
                });
            }
        }

        if let Some(index) = bars
            .windows(2)
            .position(|w| matches!((w[0].date, w[1].date), (Some(a), Some(b)) if b <= a))
        {
            return Err(IndicatorError::UnorderedSeries { index: index + 1 });
        }

        let closes = bars.iter().map(|b| b.close).collect();
        Ok(Self { bars, closes })
    }

    /// Undated series built straight from closing prices.
    pub fn from_closes(closes: &[f64]) -> Result<Self> {
        Self::new(closes.iter().map(|&c| PriceBar::from_close(c)).collect())
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// The closing-price column, positionally aligned with [`bars`](Self::bars).
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Volume column; bars without a volume report `None`.
    pub fn volumes(&self) -> Vec<Option<u64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Bars dated within `[start, end]`, inclusive. Undated bars never match.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let bars = self
            .bars
            .iter()
            .filter(|b| b.date.map_or(false, |d| d >= start && d <= end))
            .cloned()
            .collect();
        Self::new(bars)
    }

    /// Fail with [`IndicatorError::NoDataLoaded`] when the series is empty.
    pub(crate) fn require_data(&self) -> Result<&[f64]> {
        if self.closes.is_empty() {
            Err(IndicatorError::NoDataLoaded)
        } else {
            Ok(&self.closes)
        }
    }

    /// Fail unless `1 <= window <= len`.
    pub(crate) fn require_window(&self, window: usize) -> Result<&[f64]> {
        let closes = self.require_data()?;
        if window == 0 || window > closes.len() {
            return Err(IndicatorError::InvalidWindow {
                window,
                len: closes.len(),
            });
        }
        Ok(closes)
    }
}
