//! Fixed-weight blending strategy.

use std::{fmt, str::FromStr};

use ndarray::arr1;
use ronda_traits::RondaError;
use serde::{Deserialize, Serialize};

use crate::combiner::{Combiner, ComponentScores};

/// Blend weights for the three components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    /// Weight on surprise momentum (default: 0.5)
    pub momentum: f64,
    /// Weight on forward growth (default: 0.4)
    pub forward: f64,
    /// Weight on the revision adjustment (default: 0.1)
    pub revisions: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            momentum: 0.5,
            forward: 0.4,
            revisions: 0.1,
        }
    }
}

impl BlendWeights {
    /// Sum of the three weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.momentum + self.forward + self.revisions
    }
}

impl fmt::Display for BlendWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "momentum={},forward={},revisions={}",
            self.momentum, self.forward, self.revisions
        )
    }
}

/// Parses `"momentum=0.5,forward=0.4,revisions=0.1"`.
///
/// Omitted keys keep their defaults, as do values that fail to parse (with a
/// warning). Unknown keys are an error.
impl FromStr for BlendWeights {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = Self::default();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                RondaError::InvalidData(format!("expected key=value in weights, got '{part}'"))
            })?;
            let key = key.trim().to_ascii_lowercase();
            let slot = match key.as_str() {
                "momentum" => &mut weights.momentum,
                "forward" => &mut weights.forward,
                "revisions" => &mut weights.revisions,
                _ => {
                    return Err(RondaError::InvalidData(format!("unknown weight key '{key}'")));
                }
            };
            match value.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => *slot = v,
                _ => tracing::warn!(key = %key, value = value.trim(), "ignoring unparseable weight"),
            }
        }
        Ok(weights)
    }
}

/// Weighted-average blender.
///
/// Missing momentum or forward growth counts as zero once any component is
/// present. The final metric is undefined only when both are missing and the
/// revision adjustment is exactly zero.
///
/// # Examples
///
/// ```rust
/// use ronda_combine::{Combiner, ComponentScores, WeightedBlender};
///
/// let scores = ComponentScores { momentum: Some(10.0), forward: Some(20.0), revisions: 3.0 };
/// let value = WeightedBlender::default().combine(&scores).unwrap();
/// assert!((value - 13.3).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeightedBlender {
    weights: BlendWeights,
}

impl WeightedBlender {
    /// Create a new blender with the given weights.
    #[must_use]
    pub const fn new(weights: BlendWeights) -> Self {
        Self { weights }
    }

    /// Get the weights.
    #[must_use]
    pub const fn weights(&self) -> &BlendWeights {
        &self.weights
    }
}

impl Combiner for WeightedBlender {
    fn combine(&self, scores: &ComponentScores) -> Option<f64> {
        if scores.is_vacant() {
            return None;
        }

        let w = arr1(&[self.weights.momentum, self.weights.forward, self.weights.revisions]);
        let x = arr1(&[
            scores.momentum.unwrap_or(0.0),
            scores.forward.unwrap_or(0.0),
            scores.revisions,
        ]);
        let total = w.sum();
        let denominator = if total == 0.0 { 1.0 } else { total };

        Some(w.dot(&x) / denominator)
    }

    fn name(&self) -> &str {
        "weighted"
    }
}
