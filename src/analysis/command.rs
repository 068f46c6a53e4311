use std::str::FromStr;

use serde::Serialize;

use crate::error::IndicatorError;

/// Analysis requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Sma,
    Ema,
    Rsi,
    Bollinger,
    Stats,
    Summary,
    All,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Self::Sma,
        Self::Ema,
        Self::Rsi,
        Self::Bollinger,
        Self::Stats,
        Self::Summary,
        Self::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sma => "sma",
            Self::Ema => "ema",
            Self::Rsi => "rsi",
            Self::Bollinger => "bollinger",
            Self::Stats => "stats",
            Self::Summary => "summary",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| IndicatorError::UnknownOperation(s.to_string()))
    }
}
