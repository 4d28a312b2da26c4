//! Surprise series to a single momentum figure.

use std::{fmt, str::FromStr};

use ndarray::Array1;
use ronda_traits::RondaError;
use serde::{Deserialize, Serialize};

/// How the newest surprises are collapsed into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumMode {
    /// Plain sum of the newest `window` surprises.
    #[default]
    Sum,
    /// Exponentially weighted average of up to `window` newest surprises.
    Ewma,
}

impl fmt::Display for MomentumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Ewma => write!(f, "ewma"),
        }
    }
}

impl FromStr for MomentumMode {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "ewma" | "ewma_avg" => Ok(Self::Ewma),
            other => Err(RondaError::InvalidData(format!("unknown momentum mode '{other}'"))),
        }
    }
}

/// Configuration for the surprise aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Aggregation mode.
    pub mode: MomentumMode,
    /// Number of newest surprises considered (default: 4 quarters).
    pub window: usize,
    /// EWMA half-life in quarters (default: 2.0).
    pub half_life: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            mode: MomentumMode::default(),
            window: 4,
            half_life: 2.0,
        }
    }
}

/// Surprise momentum aggregator.
///
/// In sum mode a full window is required; a shorter history is undefined
/// rather than zero. EWMA mode uses whatever is available up to the window.
#[derive(Debug, Clone, Default)]
pub struct SurpriseAggregator {
    config: AggregatorConfig,
}

impl SurpriseAggregator {
    /// Create a new aggregator with the given configuration.
    #[must_use]
    pub const fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Get the aggregation mode.
    #[must_use]
    pub const fn mode(&self) -> MomentumMode {
        self.config.mode
    }

    /// Report label, e.g. "Last4 surprise% sum" for the default window.
    #[must_use]
    pub fn label(&self) -> String {
        let kind = match self.config.mode {
            MomentumMode::Sum => "sum",
            MomentumMode::Ewma => "EWMA",
        };
        format!("Last{} surprise% {kind}", self.config.window)
    }

    /// Aggregate a newest-first surprise series.
    #[must_use]
    pub fn aggregate(&self, surprises: &[f64]) -> Option<f64> {
        let momentum = match self.config.mode {
            MomentumMode::Sum => sum_last(surprises, self.config.window),
            MomentumMode::Ewma => ewma(surprises, self.config.window, self.config.half_life),
        };
        tracing::debug!(
            mode = %self.config.mode,
            available = surprises.len(),
            momentum = ?momentum,
            "aggregated surprise momentum"
        );
        momentum
    }
}

/// Sum of the newest `window` values, `None` when fewer are available.
#[must_use]
pub fn sum_last(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    Some(values[..window].iter().sum())
}

/// Exponentially weighted mean of up to `window` newest values.
///
/// The weight at offset `i` from the newest value is `exp(-ln 2 / h * i)`.
#[must_use]
pub fn ewma(values: &[f64], window: usize, half_life: f64) -> Option<f64> {
    let used = values.len().min(window);
    if used == 0 {
        return None;
    }
    let decay = std::f64::consts::LN_2 / half_life;
    let weights = Array1::from_iter((0..used).map(|i| (-decay * i as f64).exp()));
    let recent = Array1::from_iter(values[..used].iter().copied());
    Some(weights.dot(&recent) / weights.sum())
}
