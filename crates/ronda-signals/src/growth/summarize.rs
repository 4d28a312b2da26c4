//! Growth summaries over a forward EPS path.

use ronda_traits::EpsPath;
use serde::{Deserialize, Serialize};

/// Year-over-year and compounded growth of a path, in percent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrowthSummary {
    /// Growth between consecutive points.
    pub yoy_pct: Vec<f64>,
    /// Mean of `yoy_pct`.
    pub arithmetic_pct: Option<f64>,
    /// Compound annual growth from first to last point.
    pub cagr_pct: Option<f64>,
}

/// Summarizes an EPS path as arithmetic-mean and compounded growth.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthSummarizer;

impl GrowthSummarizer {
    /// Summarize `path`. Paths with fewer than two points have no growth.
    #[must_use]
    pub fn summarize(&self, path: &EpsPath) -> GrowthSummary {
        let values = path.values();
        if values.len() < 2 {
            return GrowthSummary::default();
        }
        let yoy_pct = yoy_series(&values);
        let arithmetic_pct =
            (!yoy_pct.is_empty()).then(|| yoy_pct.iter().sum::<f64>() / yoy_pct.len() as f64);
        GrowthSummary {
            arithmetic_pct,
            cagr_pct: cagr_pct(&values),
            yoy_pct,
        }
    }
}

/// Percent change for each consecutive pair with a non-zero, finite prior value.
#[must_use]
pub fn yoy_series(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0 && w[0].is_finite() && w[1].is_finite())
        .map(|w| (w[1] / w[0] - 1.0) * 100.0)
        .collect()
}

/// Compound annual growth between the first and last value, in percent.
///
/// Undefined for a non-positive starting value or a negative ratio.
#[must_use]
pub fn cagr_pct(values: &[f64]) -> Option<f64> {
    let (first, last) = (*values.first()?, *values.last()?);
    let years = values.len().checked_sub(1).filter(|y| *y > 0)?;
    if first <= 0.0 {
        return None;
    }
    let ratio = last / first;
    if !ratio.is_finite() || ratio < 0.0 {
        return None;
    }
    Some((ratio.powf(1.0 / years as f64) - 1.0) * 100.0)
}
