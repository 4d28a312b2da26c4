//! Quarterly earnings records to a newest-first surprise series.

use std::{cmp::Reverse, str::FromStr};

use ronda_traits::{QuarterlyEarningsRecord, RondaError, SurpriseSeries};
use serde::{Deserialize, Serialize};

/// Default per-quarter surprise ceiling, in percent.
pub const DEFAULT_WINSOR_CEILING: f64 = 60.0;

/// Number of quarters summed for trailing-twelve-month EPS.
pub const TTM_QUARTERS: usize = 4;

/// How a record's surprise percentage is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurpriseConvention {
    /// Re-derive from actual and estimate.
    #[default]
    Recompute,
    /// Prefer the provider's own surprise figures, re-deriving only as a fallback.
    Reported,
}

impl FromStr for SurpriseConvention {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recompute" => Ok(Self::Recompute),
            "reported" => Ok(Self::Reported),
            other => Err(RondaError::InvalidData(format!(
                "unknown surprise convention '{other}'"
            ))),
        }
    }
}

/// Order in which the provider delivered quarterly records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrder {
    /// Sort by parsed period end when every label is a date, otherwise assume
    /// newest first.
    #[default]
    Detect,
    /// Records arrive newest first.
    NewestFirst,
    /// Records arrive oldest first.
    OldestFirst,
}

/// Configuration for the surprise normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Magnitude cap applied to each surprise, in percent. `None` disables it.
    pub winsor_ceiling: Option<f64>,
    /// Surprise derivation convention.
    pub convention: SurpriseConvention,
    /// Provider ordering of the records.
    pub order: RecordOrder,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            winsor_ceiling: Some(DEFAULT_WINSOR_CEILING),
            convention: SurpriseConvention::default(),
            order: RecordOrder::default(),
        }
    }
}

/// Clip `value` to `[-ceiling, ceiling]`, preserving sign.
#[must_use]
pub fn winsorize(value: f64, ceiling: Option<f64>) -> f64 {
    match ceiling {
        Some(c) => value.min(c).max(-c),
        None => value,
    }
}

/// Converts raw quarterly actual/estimate pairs into a percentage-surprise
/// series.
///
/// Records that lack either side of the comparison, or whose estimate is zero,
/// are skipped rather than zero-filled. Output is always newest first and in
/// percent regardless of the provider's conventions.
///
/// # Example
///
/// ```
/// use ronda_signals::surprise::SurpriseNormalizer;
/// use ronda_traits::QuarterlyEarningsRecord;
///
/// let records = vec![
///     QuarterlyEarningsRecord::new("2025-03-31", Some(1.10), Some(1.00)),
///     QuarterlyEarningsRecord::new("2025-06-30", Some(0.90), Some(1.00)),
/// ];
/// let series = SurpriseNormalizer::default().normalize(&records);
/// assert_eq!(series.periods, vec!["2025-06-30", "2025-03-31"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SurpriseNormalizer {
    config: NormalizerConfig,
}

impl SurpriseNormalizer {
    /// Create a new normalizer with the given configuration.
    #[must_use]
    pub const fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Get the winsorization ceiling.
    #[must_use]
    pub const fn winsor_ceiling(&self) -> Option<f64> {
        self.config.winsor_ceiling
    }

    /// Surprise percentage for one record, before winsorization.
    #[must_use]
    pub fn surprise_pct(&self, record: &QuarterlyEarningsRecord) -> Option<f64> {
        let pct = match self.config.convention {
            SurpriseConvention::Recompute => recomputed(record),
            SurpriseConvention::Reported => record
                .reported_surprise_pct
                .or_else(|| {
                    let estimate = record.estimate.filter(|e| *e != 0.0)?;
                    Some(record.reported_surprise? / estimate.abs() * 100.0)
                })
                .or_else(|| recomputed(record)),
        };
        pct.filter(|p| p.is_finite())
    }

    /// Records in newest-first order.
    #[must_use]
    pub fn newest_first<'a>(&self, records: &'a [QuarterlyEarningsRecord]) -> Vec<&'a QuarterlyEarningsRecord> {
        let mut ordered: Vec<_> = records.iter().collect();
        match self.config.order {
            RecordOrder::NewestFirst => {}
            RecordOrder::OldestFirst => ordered.reverse(),
            RecordOrder::Detect => {
                let dates: Option<Vec<_>> = ordered.iter().map(|r| r.period_date()).collect();
                match dates {
                    Some(dates) => {
                        let mut keyed: Vec<_> = dates.into_iter().zip(ordered).collect();
                        keyed.sort_by_key(|(date, _)| Reverse(*date));
                        ordered = keyed.into_iter().map(|(_, r)| r).collect();
                    }
                    None => {
                        tracing::debug!(
                            records = records.len(),
                            "period labels are not all dates, assuming newest-first order"
                        );
                    }
                }
            }
        }
        ordered
    }

    /// Build the newest-first surprise series.
    #[must_use]
    pub fn normalize(&self, records: &[QuarterlyEarningsRecord]) -> SurpriseSeries {
        let mut series = SurpriseSeries::default();
        for record in self.newest_first(records) {
            let Some(raw) = self.surprise_pct(record) else {
                continue;
            };
            series.raw.push(raw);
            series.values.push(winsorize(raw, self.config.winsor_ceiling));
            series.periods.push(record.period_end.clone());
        }
        tracing::debug!(
            records = records.len(),
            surprises = series.len(),
            "normalized quarterly surprises"
        );
        series
    }

    /// Trailing-twelve-month EPS: the sum of the newest four reported actuals.
    ///
    /// Quarters without a reported actual are skipped; fewer than four defined
    /// actuals yields `None`.
    #[must_use]
    pub fn trailing_eps(&self, records: &[QuarterlyEarningsRecord]) -> Option<f64> {
        let actuals: Vec<f64> = self
            .newest_first(records)
            .into_iter()
            .filter_map(|r| r.actual)
            .take(TTM_QUARTERS)
            .collect();
        (actuals.len() == TTM_QUARTERS).then(|| actuals.iter().sum())
    }
}

fn recomputed(record: &QuarterlyEarningsRecord) -> Option<f64> {
    let actual = record.actual?;
    let estimate = record.estimate.filter(|e| *e != 0.0)?;
    Some((actual - estimate) / estimate.abs() * 100.0)
}
