// =============================================================================
// Engine Errors
// =============================================================================
//
// Every transform validates its preconditions up front and fails with one of
// these kinds. Division-by-zero cases inside a transform are resolved locally
// (RSI neutral fill, Sharpe zero guard) and never surface here.

use thiserror::Error;

/// Typed failure returned by the indicator engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// The price series is empty.
    #[error("No data loaded")]
    NoDataLoaded,

    /// The requested window is zero or longer than the series.
    #[error("Window size {window} is invalid for data length {len}")]
    InvalidWindow { window: usize, len: usize },

    /// A short/long window pair where the short window is not shorter.
    #[error("Short window {short} must be smaller than long window {long}")]
    InvalidWindowPair { short: usize, long: usize },

    /// Bollinger multiplier must be finite and non-negative.
    #[error("Band multiplier {0} must be a finite, non-negative number")]
    InvalidMultiplier(f64),

    /// The dispatcher received a command it does not know.
    #[error("Unknown command: {0}")]
    UnknownOperation(String),

    /// A record failed boundary validation.
    #[error("Invalid price bar at entry {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    /// Dates are duplicated or not ascending.
    #[error("Price bars are not strictly ascending by date at entry {index}")]
    UnorderedSeries { index: usize },

    /// Input could not be parsed as a list of price records.
    #[error("Failed to parse price data: {0}")]
    Parse(String),

    /// A parallel indicator worker panicked or was cancelled.
    #[error("Indicator task failed: {0}")]
    Task(String),
}

impl From<serde_json::Error> for IndicatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Shorthand used throughout the engine.
pub type Result<T> = std::result::Result<T, IndicatorError>;
