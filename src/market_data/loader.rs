// ---------------------------------------------------------------------------
// JSON record loader
// ---------------------------------------------------------------------------
//
// Accepts the loosely-typed record shape produced by upstream fetchers:
//
// ```json
// [{ "date": "2024-01-02", "open": 1.0, "high": 1.2, "low": 0.9, "close": 1.1, "volume": 1000 }]
// ```
//
// Only `close` is mandatory. Dated input is sorted ascending before the
// series is built, so fetchers that emit newest-first data load correctly.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::market_data::series::{PriceBar, PriceSeries};

/// One record exactly as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Parse a JSON array of records into a validated [`PriceSeries`].
pub fn parse_records(json: &str) -> Result<PriceSeries> {
    let records: Vec<RawRecord> = serde_json::from_str(json)?;
    from_records(records)
}

/// Validate raw records and assemble them into a series.
pub fn from_records(records: Vec<RawRecord>) -> Result<PriceSeries> {
    let mut bars = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| to_bar(index, record))
        .collect::<Result<Vec<_>>>()?;

    if bars.iter().all(|b| b.date.is_some()) {
        bars.sort_by_key(|b| b.date);
    }

    debug!(records = bars.len(), "price records loaded");
    PriceSeries::new(bars)
}

fn to_bar(index: usize, record: RawRecord) -> Result<PriceBar> {
    let close = record.close.ok_or_else(|| IndicatorError::InvalidBar {
        index,
        reason: "missing field 'close'".to_string(),
    })?;

    let date = record
        .date
        .as_deref()
        .map(|raw| {
            parse_date(raw).ok_or_else(|| IndicatorError::InvalidBar {
                index,
                reason: format!("unparseable date '{raw}'"),
            })
        })
        .transpose()?;

    let volume = record
        .volume
        .map(|v| {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                Ok(v as u64)
            } else {
                Err(IndicatorError::InvalidBar {
                    index,
                    reason: format!("volume {v} must be a non-negative integer that fits in u64"),
                })
            }
        })
        .transpose()?;

    Ok(PriceBar {
        date,
        open: record.open,
        high: record.high,
        low: record.low,
        close,
        volume,
    })
}

/// Plain `YYYY-MM-DD`, RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
