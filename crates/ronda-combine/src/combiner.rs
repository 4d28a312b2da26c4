//! Core trait definition for metric blenders.

use serde::{Deserialize, Serialize};

/// Component scores for one instrument, ready to be blended.
///
/// Momentum and forward growth may be undefined for lack of data; the revision
/// adjustment is always defined and is `0.0` when there is nothing to score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Surprise momentum, percent.
    pub momentum: Option<f64>,

    /// Forward growth (arithmetic mean of YoY), percent.
    pub forward: Option<f64>,

    /// Revision breadth adjustment, percentage points.
    pub revisions: f64,
}

impl ComponentScores {
    /// Whether there is nothing to blend.
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        self.momentum.is_none() && self.forward.is_none() && self.revisions == 0.0
    }
}

/// Combines component scores into the final metric.
///
/// Implementations must be thread-safe (Send + Sync) so one blender can be
/// shared across concurrently evaluated instruments.
///
/// # Examples
///
/// ```rust
/// use ronda_combine::{Combiner, ComponentScores};
///
/// struct MomentumOnly;
///
/// impl Combiner for MomentumOnly {
///     fn combine(&self, scores: &ComponentScores) -> Option<f64> {
///         scores.momentum
///     }
///
///     fn name(&self) -> &str {
///         "momentum_only"
///     }
/// }
///
/// let scores = ComponentScores { momentum: Some(4.0), ..Default::default() };
/// assert_eq!(MomentumOnly.combine(&scores), Some(4.0));
/// ```
pub trait Combiner: Send + Sync {
    /// Blend the scores, `None` when the final metric is undefined.
    fn combine(&self, scores: &ComponentScores) -> Option<f64>;

    /// Name of this blending strategy.
    ///
    /// Used for logging and identification on reports.
    fn name(&self) -> &str;
}
