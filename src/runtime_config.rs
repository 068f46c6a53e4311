// =============================================================================
// Runtime Configuration: indicator windows and execution settings
// =============================================================================
//
// Every tunable window lives here so that the command surface can be
// reconfigured without a rebuild. All fields carry `#[serde(default)]` so that
// a partial (or empty) JSON file still loads, with missing fields falling back
// to the standard windows: SMA 20/50, EMA 20/50, RSI 14, Bollinger 20 / 2σ.
//
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_sma_windows() -> Vec<usize> {
    vec![20, 50]
}

fn default_ema_windows() -> Vec<usize> {
    vec![20, 50]
}

fn default_all_ema_windows() -> Vec<usize> {
    vec![20]
}

fn default_rsi_window() -> usize {
    14
}

fn default_bollinger_window() -> usize {
    20
}

fn default_bollinger_num_std() -> f64 {
    2.0
}

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

// =============================================================================
// CrossoverParams
// =============================================================================

/// SMA pair used by the latest-value summary and crossover scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossoverParams {
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the indicator commands.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Window sets ---------------------------------------------------------

    /// SMA windows reported by the `sma` command and by `all`.
    #[serde(default = "default_sma_windows")]
    pub sma_windows: Vec<usize>,

    /// EMA spans reported by the `ema` command.
    #[serde(default = "default_ema_windows")]
    pub ema_windows: Vec<usize>,

    /// EMA spans reported by the `all` command.
    #[serde(default = "default_all_ema_windows")]
    pub all_ema_windows: Vec<usize>,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    #[serde(default = "default_bollinger_window")]
    pub bollinger_window: usize,

    /// Band half-width in sample standard deviations.
    #[serde(default = "default_bollinger_num_std")]
    pub bollinger_num_std: f64,

    #[serde(default)]
    pub crossover: CrossoverParams,

    // --- Execution -----------------------------------------------------------

    /// Compute independent indicators on separate blocking workers.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sma_windows: default_sma_windows(),
            ema_windows: default_ema_windows(),
            all_ema_windows: default_all_ema_windows(),
            rsi_window: default_rsi_window(),
            bollinger_window: default_bollinger_window(),
            bollinger_num_std: default_bollinger_num_std(),
            crossover: CrossoverParams::default(),
            parallel: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;

        info!(
            path = %path.display(),
            sma_windows = ?config.sma_windows,
            ema_windows = ?config.ema_windows,
            rsi_window = config.rsi_window,
            "indicator config loaded"
        );

        Ok(config)
    }

    /// Reject settings that could never produce a result.
    pub fn validate(&self) -> Result<()> {
        for (name, windows) in [
            ("sma_windows", &self.sma_windows),
            ("ema_windows", &self.ema_windows),
            ("all_ema_windows", &self.all_ema_windows),
        ] {
            if windows.is_empty() {
                bail!("{name} must list at least one window");
            }
            if windows.contains(&0) {
                bail!("{name} must not contain a zero window");
            }
        }
        if self.rsi_window == 0 || self.bollinger_window == 0 {
            bail!("rsi_window and bollinger_window must be at least 1");
        }
        if !self.bollinger_num_std.is_finite() || self.bollinger_num_std < 0.0 {
            bail!(
                "bollinger_num_std must be finite and non-negative, got {}",
                self.bollinger_num_std
            );
        }
        if self.crossover.short_window == 0
            || self.crossover.short_window >= self.crossover.long_window
        {
            bail!(
                "crossover windows must satisfy 0 < short < long, got {} / {}",
                self.crossover.short_window,
                self.crossover.long_window
            );
        }
        Ok(())
    }
}
