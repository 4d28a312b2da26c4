//! Canonical data model shared by the ronda crates.
//!
//! Every provider schema is mapped onto these types once, in
//! [`crate::schema`]. Past that boundary the engine only ever sees optional
//! `f64` fields with canonical names and units: EPS in currency per share,
//! surprises in percent, long-term growth as a decimal fraction.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Result, RondaError};

/// A market symbol identifier, typically a ticker such as "NVDA".
pub type Symbol = String;

/// A fiscal year number, e.g. `2026`.
pub type FiscalYear = i32;

/// One quarter of reported versus consensus EPS.
///
/// `actual` and `estimate` are independent optionals: a provider may report a
/// future quarter with only an estimate, or an old quarter with no estimate.
/// A surprise is only defined when both are present and the estimate is
/// non-zero, or when the provider supplied its own surprise figures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuarterlyEarningsRecord {
    /// Fiscal period end, as labelled by the provider (usually `YYYY-MM-DD`).
    pub period_end: String,
    /// Reported EPS.
    pub actual: Option<f64>,
    /// Consensus EPS estimate.
    pub estimate: Option<f64>,
    /// Provider-computed surprise, already in percent.
    pub reported_surprise_pct: Option<f64>,
    /// Provider-computed absolute surprise (`actual - estimate`).
    pub reported_surprise: Option<f64>,
}

impl QuarterlyEarningsRecord {
    /// Create a record from a period label and actual/estimate pair.
    #[must_use]
    pub fn new(period_end: impl Into<String>, actual: Option<f64>, estimate: Option<f64>) -> Self {
        Self {
            period_end: period_end.into(),
            actual,
            estimate,
            reported_surprise_pct: None,
            reported_surprise: None,
        }
    }

    /// Attach a provider-computed surprise percentage.
    #[must_use]
    pub fn with_reported_surprise_pct(mut self, pct: Option<f64>) -> Self {
        self.reported_surprise_pct = pct;
        self
    }

    /// Attach a provider-computed absolute surprise.
    #[must_use]
    pub fn with_reported_surprise(mut self, surprise: Option<f64>) -> Self {
        self.reported_surprise = surprise;
        self
    }

    /// Parse the period label into a date.
    ///
    /// Accepts `YYYY-MM-DD` (optionally followed by a time component),
    /// `YYYY-MM` (first of month), quarter labels such as `3Q2024` or
    /// `2024Q3` (last day of the quarter) and a bare `YYYY` (January 1st).
    #[must_use]
    pub fn period_date(&self) -> Option<NaiveDate> {
        let label = self.period_end.trim();
        if let Some(date) = quarter_end(label) {
            return Some(date);
        }
        if let Some(day) = label.get(..10)
            && let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        {
            return Some(date);
        }
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d") {
            return Some(date);
        }
        if label.len() == 4 {
            let year = label.parse::<i32>().ok()?;
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
        None
    }
}

/// Last day of the quarter named by `3Q2024` / `2024Q3` style labels.
fn quarter_end(label: &str) -> Option<NaiveDate> {
    let upper = label.to_ascii_uppercase();
    let (left, right) = upper.split_once('Q')?;
    let (quarter, year) = if left.len() == 1 { (left, right) } else { (right, left) };
    let quarter: u32 = quarter.parse().ok().filter(|q| (1..=4).contains(q))?;
    if year.len() != 4 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let (month, day) = match quarter {
        1 => (3, 31),
        2 => (6, 30),
        3 => (9, 30),
        _ => (12, 31),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Newest-first series of percentage surprises.
///
/// `values` are winsorized when a ceiling is configured; `raw` holds the same
/// quarters before clipping and `periods` their labels, all index-aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurpriseSeries {
    /// Surprise percentages, newest first, after winsorization.
    pub values: Vec<f64>,
    /// Period labels parallel to `values`.
    pub periods: Vec<String>,
    /// Surprise percentages before winsorization.
    pub raw: Vec<f64>,
}

impl SurpriseSeries {
    /// Number of defined surprises.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no quarter produced a surprise.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Consensus forward EPS estimates for an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForwardEstimateSet {
    /// Consensus EPS for the current fiscal year.
    pub current_year_eps: Option<f64>,
    /// Consensus EPS for the next fiscal year.
    pub next_year_eps: Option<f64>,
    /// Long-term (typically 5y) annual growth as a decimal fraction, 0.15 = 15%.
    pub long_term_growth: Option<f64>,
    /// Fiscal year the current-year estimate belongs to.
    pub fiscal_base_year: Option<FiscalYear>,
}

/// Canonical estimate period used to key analyst revision counts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RevisionPeriod {
    /// Current fiscal quarter.
    CurrentQuarter,
    /// Next fiscal quarter.
    NextQuarter,
    /// Current fiscal year.
    CurrentYear,
    /// Next fiscal year.
    NextYear,
    /// Long-term (multi-year) horizon.
    LongTerm,
    /// Any label we do not recognise, kept verbatim.
    Other(String),
}

impl RevisionPeriod {
    /// Map a provider period label onto the canonical period.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "0q" | "currentquarter" | "curqtr" | "current quarter" => Self::CurrentQuarter,
            "+1q" | "1q" | "nextquarter" | "next quarter" => Self::NextQuarter,
            "0y" | "currentyear" | "curyear" | "fy0" | "current fiscal year" => Self::CurrentYear,
            "+1y" | "1y" | "nextyear" | "f+1y" | "fy+1" | "next fiscal year" => Self::NextYear,
            "+5y" | "5y" | "longterm" | "long-term" => Self::LongTerm,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Canonical label for this period.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CurrentQuarter => "currentQuarter",
            Self::NextQuarter => "nextQuarter",
            Self::CurrentYear => "currentYear",
            Self::NextYear => "nextYear",
            Self::LongTerm => "longTerm",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for RevisionPeriod {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<RevisionPeriod> for String {
    fn from(period: RevisionPeriod) -> Self {
        period.as_str().to_string()
    }
}

impl fmt::Display for RevisionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Analyst EPS revision counts for one estimate period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevisionBucket {
    /// Upward revisions over the last 7 days.
    pub upgrades_7d: u32,
    /// Upward revisions over the last 30 days.
    pub upgrades_30d: u32,
    /// Downward revisions over the last 7 days.
    pub downgrades_7d: u32,
    /// Downward revisions over the last 30 days.
    pub downgrades_30d: u32,
}

impl RevisionBucket {
    /// Net 30-day revisions (upgrades minus downgrades).
    #[must_use]
    pub const fn net_30d(&self) -> i64 {
        self.upgrades_30d as i64 - self.downgrades_30d as i64
    }

    /// Total 30-day revisions in either direction.
    #[must_use]
    pub const fn total_30d(&self) -> u64 {
        self.upgrades_30d as u64 + self.downgrades_30d as u64
    }
}

/// Revision buckets keyed by canonical period.
pub type RevisionCounts = BTreeMap<RevisionPeriod, RevisionBucket>;

/// A single `(fiscal_year, eps)` point on an EPS path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsPoint {
    /// Fiscal year.
    pub fiscal_year: FiscalYear,
    /// EPS for that year.
    pub eps: f64,
}

/// Forward EPS path: strictly increasing fiscal years, no duplicates.
///
/// Built once (projected or supplied by the caller) and then treated as
/// immutable input to growth summarization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<EpsPoint>", into = "Vec<EpsPoint>")]
pub struct EpsPath {
    points: Vec<EpsPoint>,
}

impl EpsPath {
    /// Build a path from `(year, eps)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] on duplicate years or non-finite EPS.
    pub fn new(pairs: impl IntoIterator<Item = (FiscalYear, f64)>) -> Result<Self> {
        let mut points: Vec<EpsPoint> = pairs
            .into_iter()
            .map(|(fiscal_year, eps)| EpsPoint { fiscal_year, eps })
            .collect();

        if let Some(bad) = points.iter().find(|p| !p.eps.is_finite()) {
            return Err(RondaError::InvalidData(format!(
                "EPS for fiscal year {} is not finite",
                bad.fiscal_year
            )));
        }

        points.sort_by_key(|p| p.fiscal_year);
        if let Some(dup) = points.windows(2).find(|w| w[0].fiscal_year == w[1].fiscal_year) {
            return Err(RondaError::InvalidData(format!(
                "duplicate fiscal year {} in EPS path",
                dup[0].fiscal_year
            )));
        }

        Ok(Self { points })
    }

    /// An empty path.
    #[must_use]
    pub const fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Points in ascending fiscal-year order.
    #[must_use]
    pub fn points(&self) -> &[EpsPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the path has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// EPS values in year order.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.eps).collect()
    }

    /// Fiscal years in ascending order.
    #[must_use]
    pub fn years(&self) -> Vec<FiscalYear> {
        self.points.iter().map(|p| p.fiscal_year).collect()
    }

    /// Keep only the years inside `range` (inclusive).
    #[must_use]
    pub fn filter_years(&self, range: &YearRange) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| range.contains(p.fiscal_year))
                .copied()
                .collect(),
        }
    }
}

impl TryFrom<Vec<EpsPoint>> for EpsPath {
    type Error = RondaError;

    fn try_from(points: Vec<EpsPoint>) -> Result<Self> {
        Self::new(points.into_iter().map(|p| (p.fiscal_year, p.eps)))
    }
}

impl From<EpsPath> for Vec<EpsPoint> {
    fn from(path: EpsPath) -> Self {
        path.points
    }
}

impl FromStr for EpsPath {
    type Err = RondaError;

    /// Parse `"2026:2.0,2027:2.5"` style manual paths.
    fn from_str(s: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (year, eps) = part.split_once(':').ok_or_else(|| {
                RondaError::InvalidData(format!("expected YEAR:EPS, got '{part}'"))
            })?;
            let year = year
                .trim()
                .parse::<FiscalYear>()
                .map_err(|e| RondaError::InvalidData(format!("bad year in '{part}': {e}")))?;
            let eps = eps
                .trim()
                .parse::<f64>()
                .map_err(|e| RondaError::InvalidData(format!("bad EPS in '{part}': {e}")))?;
            pairs.push((year, eps));
        }
        Self::new(pairs)
    }
}

/// Inclusive fiscal-year range used to restrict a projected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "YearBounds")]
pub struct YearRange {
    /// First year kept.
    pub low: FiscalYear,
    /// Last year kept.
    pub high: FiscalYear,
}

impl YearRange {
    /// Create a range.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidData`] when `low > high`.
    pub fn new(low: FiscalYear, high: FiscalYear) -> Result<Self> {
        if low > high {
            return Err(RondaError::InvalidData(format!(
                "year range {low}-{high} is reversed"
            )));
        }
        Ok(Self { low, high })
    }

    /// Whether `year` falls inside the range.
    #[must_use]
    pub const fn contains(&self, year: FiscalYear) -> bool {
        self.low <= year && year <= self.high
    }
}

/// Unchecked wire form of [`YearRange`].
#[derive(Deserialize)]
struct YearBounds {
    low: FiscalYear,
    high: FiscalYear,
}

impl TryFrom<YearBounds> for YearRange {
    type Error = RondaError;

    fn try_from(bounds: YearBounds) -> Result<Self> {
        Self::new(bounds.low, bounds.high)
    }
}

impl FromStr for YearRange {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (low, high) = compact
            .split_once('-')
            .ok_or_else(|| RondaError::InvalidData(format!("expected LOW-HIGH, got '{s}'")))?;
        let low = low
            .parse()
            .map_err(|e| RondaError::InvalidData(format!("bad year range '{s}': {e}")))?;
        let high = high
            .parse()
            .map_err(|e| RondaError::InvalidData(format!("bad year range '{s}': {e}")))?;
        Self::new(low, high)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// The composite output record for one instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeMetric {
    /// Aggregated surprise momentum, percent.
    pub momentum_pct: Option<f64>,
    /// Arithmetic mean of forward YoY EPS growth, percent.
    pub forward_growth_arith_pct: Option<f64>,
    /// Compounded annual forward EPS growth, percent.
    pub forward_growth_cagr_pct: Option<f64>,
    /// Analyst revision adjustment, percent. Always defined.
    pub revision_adj_pct: f64,
    /// Weighted blend of the above, percent.
    pub final_pct: Option<f64>,
    /// EPS path the forward figures were computed from.
    pub path_used: EpsPath,
    /// Year-over-year EPS growth along `path_used`, percent.
    pub yoy_series_pct: Vec<f64>,
}

/// A provider field that was present but could not be parsed.
///
/// The field is treated as absent downstream; the issue is kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Where the value came from (provider section or period label).
    pub source: String,
    /// Provider field name.
    pub field: String,
    /// Raw value as received.
    pub raw: String,
}

/// Everything an [`crate::EarningsDataProvider`] returns for one symbol.
///
/// The default value is the legitimate "no data" answer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EarningsSnapshot {
    /// Quarterly actual/estimate history in provider order.
    pub quarterly: Vec<QuarterlyEarningsRecord>,
    /// Forward consensus estimates.
    pub estimates: ForwardEstimateSet,
    /// Analyst revision counts.
    pub revisions: RevisionCounts,
    /// Fields dropped at the schema boundary.
    pub issues: Vec<FieldIssue>,
}

impl EarningsSnapshot {
    /// Whether the provider returned nothing usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quarterly.is_empty()
            && self.estimates == ForwardEstimateSet::default()
            && self.revisions.is_empty()
    }
}
