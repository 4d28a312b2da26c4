//! Analyst revision breadth.

use ronda_traits::{RevisionBucket, RevisionCounts, RevisionPeriod};
use serde::{Deserialize, Serialize};

/// Configuration for the revision scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevisionConfig {
    /// Score for a unanimous 30-day upgrade (default: 5.0).
    pub scale: f64,
    /// Magnitude cap on the score (default: 5.0).
    pub cap: f64,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self { scale: 5.0, cap: 5.0 }
    }
}

/// Scores 30-day analyst revision breadth for the next fiscal year, falling
/// back to the current fiscal year.
///
/// Missing data is neutral: the score is exactly `0.0`, never undefined.
#[derive(Debug, Clone, Default)]
pub struct RevisionScorer {
    config: RevisionConfig,
}

impl RevisionScorer {
    /// Create a new scorer with the given configuration.
    #[must_use]
    pub const fn new(config: RevisionConfig) -> Self {
        Self { config }
    }

    /// The bucket the score is based on.
    #[must_use]
    pub fn select<'a>(&self, counts: &'a RevisionCounts) -> Option<&'a RevisionBucket> {
        counts
            .get(&RevisionPeriod::NextYear)
            .or_else(|| counts.get(&RevisionPeriod::CurrentYear))
    }

    /// Revision adjustment in percentage points.
    #[must_use]
    pub fn score(&self, counts: &RevisionCounts) -> f64 {
        let Some(bucket) = self.select(counts) else {
            return 0.0;
        };
        let total = bucket.total_30d().max(1) as f64;
        let adj = self.config.scale * bucket.net_30d() as f64 / total;
        adj.min(self.config.cap).max(-self.config.cap)
    }
}
