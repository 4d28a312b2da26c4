//! Schema adapter between provider JSON and the canonical data model.
//!
//! Providers disagree on field names (`reportedEPS` vs `epsActual` vs
//! `actual`), on number encodings (JSON numbers, numeric strings, `"None"`,
//! Yahoo's `{"raw": .., "fmt": ..}` objects) and on where things live. All of
//! that is resolved here and nowhere else.
//!
//! Parsing is field by field. A value that is present but unreadable becomes a
//! [`FieldIssue`], is logged, and is treated as absent; it never aborts the
//! record or the document.

use serde_json::{Map, Value};

use crate::{
    EarningsSnapshot, FieldIssue, ForwardEstimateSet, QuarterlyEarningsRecord, Result,
    RevisionBucket, RevisionCounts, RevisionPeriod, RondaError,
};

/// Field names carrying the fiscal period end of a quarterly row.
pub const PERIOD_END_FIELDS: &[&str] = &["fiscalDateEnding", "periodEnd", "period_end", "date"];
/// Field names carrying reported EPS.
pub const ACTUAL_EPS_FIELDS: &[&str] = &["reportedEPS", "epsActual", "actual", "eps"];
/// Field names carrying consensus EPS.
pub const ESTIMATED_EPS_FIELDS: &[&str] = &["estimatedEPS", "epsEstimated", "estimate", "epsEstimate"];
/// Field names carrying a provider-computed surprise in percent.
pub const SURPRISE_PCT_FIELDS: &[&str] = &["surprisePercentage", "surprisePercent", "epsSurprisePercent"];
/// Field names carrying a provider-computed absolute surprise.
pub const SURPRISE_FIELDS: &[&str] = &["surprise", "epsSurprise", "epsDifference"];

/// Bounds a scanned long-term growth candidate must fall in to be accepted.
const LONG_TERM_SCAN_BOUNDS: (f64, f64) = (-0.9, 3.0);

const MISSING_MARKERS: &[&str] = &["", "none", "null", "nan", "n/a", "na", "-", "--"];

/// Result of reading one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A finite number.
    Number(f64),
    /// Explicitly absent (`null`, `"None"`, empty object, ...).
    Missing,
    /// Present but not a number; carries the raw text.
    Invalid(String),
}

impl FieldValue {
    /// The number, if any.
    #[must_use]
    pub const fn number(&self) -> Option<f64> {
        match self {
            Self::Number(x) => Some(*x),
            _ => None,
        }
    }
}

/// Parse a JSON value as a number.
///
/// Percent signs and thousands separators in strings are stripped without
/// rescaling, so `"12.5%"` reads as `12.5`.
#[must_use]
pub fn parse_number(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Missing,
        Value::Number(n) => match n.as_f64() {
            Some(x) if x.is_finite() => FieldValue::Number(x),
            _ => FieldValue::Invalid(n.to_string()),
        },
        Value::String(s) => parse_numeric_str(s),
        Value::Object(obj) if obj.is_empty() => FieldValue::Missing,
        Value::Object(obj) => obj
            .get("raw")
            .map_or_else(|| FieldValue::Invalid(value.to_string()), parse_number),
        Value::Bool(_) | Value::Array(_) => FieldValue::Invalid(value.to_string()),
    }
}

fn parse_numeric_str(s: &str) -> FieldValue {
    let trimmed = s.trim();
    if MISSING_MARKERS.contains(&trimmed.to_ascii_lowercase().as_str()) {
        return FieldValue::Missing;
    }
    let cleaned: String = trimmed
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => FieldValue::Number(x),
        _ => FieldValue::Invalid(s.to_string()),
    }
}

/// Parse a growth figure as a decimal fraction.
///
/// Percent strings (`"15%"`) are divided by 100; bare numbers and Yahoo `raw`
/// values are already fractions.
#[must_use]
pub fn parse_growth_fraction(value: &Value) -> FieldValue {
    match value {
        Value::String(s) if s.contains('%') => match parse_numeric_str(s) {
            FieldValue::Number(x) => FieldValue::Number(x / 100.0),
            other => other,
        },
        _ => parse_number(value),
    }
}

/// First alias present with a non-null value.
fn lookup<'a>(row: &'a Map<String, Value>, fields: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    fields
        .iter()
        .find_map(|f| row.get(*f).filter(|v| !v.is_null()).map(|v| (*f, v)))
}

fn record_issue(issues: &mut Vec<FieldIssue>, source: &str, field: &str, raw: String) {
    tracing::warn!(source, field, raw = %raw, "unparseable numeric field treated as absent");
    issues.push(FieldIssue {
        source: source.to_string(),
        field: field.to_string(),
        raw,
    });
}

/// Read the first present alias of a numeric field.
///
/// Unparseable values are recorded in `issues` and returned as `None`.
pub fn number_field(
    row: &Map<String, Value>,
    fields: &[&'static str],
    source: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<f64> {
    let (field, value) = lookup(row, fields)?;
    match parse_number(value) {
        FieldValue::Number(x) => Some(x),
        FieldValue::Missing => None,
        FieldValue::Invalid(raw) => {
            record_issue(issues, source, field, raw);
            None
        }
    }
}

/// Read the first present alias of a string field.
#[must_use]
pub fn text_field(row: &Map<String, Value>, fields: &[&'static str]) -> Option<String> {
    match lookup(row, fields)?.1 {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_field(row: &Map<String, Value>, field: &'static str, source: &str, issues: &mut Vec<FieldIssue>) -> u32 {
    match number_field(row, &[field], source, issues) {
        Some(x) if x >= 0.0 => x.round() as u32,
        Some(x) => {
            record_issue(issues, source, field, x.to_string());
            0
        }
        None => 0,
    }
}

/// Map quarterly rows onto canonical records, preserving provider order.
///
/// Rows that are not JSON objects are skipped and recorded as issues.
pub fn quarterly_records(rows: &[Value], source: &str, issues: &mut Vec<FieldIssue>) -> Vec<QuarterlyEarningsRecord> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let Some(row) = row.as_object() else {
                record_issue(issues, source, &format!("row[{i}]"), row.to_string());
                return None;
            };
            let period = text_field(row, PERIOD_END_FIELDS).unwrap_or_default();
            let context = format!("{source}:{period}");
            let actual = number_field(row, ACTUAL_EPS_FIELDS, &context, issues);
            let estimate = number_field(row, ESTIMATED_EPS_FIELDS, &context, issues);
            let surprise_pct = number_field(row, SURPRISE_PCT_FIELDS, &context, issues);
            let surprise = number_field(row, SURPRISE_FIELDS, &context, issues);
            Some(
                QuarterlyEarningsRecord::new(period, actual, estimate)
                    .with_reported_surprise_pct(surprise_pct)
                    .with_reported_surprise(surprise),
            )
        })
        .collect()
}

/// Locate and map the quarterly rows inside a provider document.
///
/// Understands a bare array of rows, Alpha Vantage's `quarterlyEarnings` and
/// Yahoo's `earningsChart.quarterly`. An object carrying none of those is "no
/// data".
///
/// # Errors
///
/// Returns [`RondaError::MalformedResponse`] when the document is neither an
/// array nor an object, or when the rows container is not an array.
pub fn quarterly_from_document(
    doc: &Value,
    source: &str,
    issues: &mut Vec<FieldIssue>,
) -> Result<Vec<QuarterlyEarningsRecord>> {
    let rows = match doc {
        Value::Array(rows) => rows,
        Value::Object(obj) => {
            let container = obj
                .get("quarterlyEarnings")
                .or_else(|| obj.get("earningsChart").and_then(|c| c.get("quarterly")));
            match container {
                None | Some(Value::Null) => return Ok(Vec::new()),
                Some(Value::Array(rows)) => rows,
                Some(other) => {
                    return Err(RondaError::MalformedResponse(format!(
                        "{source}: quarterly rows are not an array: {other}"
                    )));
                }
            }
        }
        other => {
            return Err(RondaError::MalformedResponse(format!(
                "{source}: expected object or array, got {other}"
            )));
        }
    };
    Ok(quarterly_records(rows, source, issues))
}

fn trend_items(doc: &Value) -> &[Value] {
    match doc {
        Value::Array(items) => items.as_slice(),
        Value::Object(obj) => obj
            .get("trend")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    }
}

/// Parse a Yahoo-shaped `earningsTrend` document.
///
/// Reads consensus EPS for the current and next fiscal year, the fiscal base
/// year from the current-year `endDate`, long-term growth from the long-term
/// period, and 7/30-day revision counts for every period that carries them.
pub fn earnings_trend(doc: &Value, issues: &mut Vec<FieldIssue>) -> (ForwardEstimateSet, RevisionCounts) {
    let mut estimates = ForwardEstimateSet::default();
    let mut revisions = RevisionCounts::new();

    for item in trend_items(doc).iter().filter_map(Value::as_object) {
        let label = text_field(item, &["period"]).unwrap_or_default();
        let period = RevisionPeriod::from_label(&label);
        let source = format!("earningsTrend:{label}");

        if period == RevisionPeriod::LongTerm
            && let Some(growth) = item.get("growth")
        {
            match parse_growth_fraction(growth) {
                FieldValue::Number(g) => estimates.long_term_growth = Some(g),
                FieldValue::Missing => {}
                FieldValue::Invalid(raw) => record_issue(issues, &source, "growth", raw),
            }
        }

        let avg_eps = item
            .get("earningsEstimate")
            .and_then(Value::as_object)
            .and_then(|ee| number_field(ee, &["avg"], &source, issues))
            .or_else(|| {
                item.get("epsTrend")
                    .and_then(Value::as_object)
                    .and_then(|et| number_field(et, &["avg", "mean", "current"], &source, issues))
            });

        match period {
            RevisionPeriod::CurrentYear => {
                estimates.current_year_eps = avg_eps;
                estimates.fiscal_base_year = text_field(item, &["endDate"])
                    .and_then(|d| d.get(..4).and_then(|y| y.parse().ok()));
            }
            RevisionPeriod::NextYear => estimates.next_year_eps = avg_eps,
            _ => {}
        }

        if let Some(rev) = item.get("epsRevisions").and_then(Value::as_object) {
            let bucket = RevisionBucket {
                upgrades_7d: count_field(rev, "upLast7days", &source, issues),
                upgrades_30d: count_field(rev, "upLast30days", &source, issues),
                downgrades_7d: count_field(rev, "downLast7Days", &source, issues)
                    .max(count_field(rev, "downLast7days", &source, issues)),
                downgrades_30d: count_field(rev, "downLast30days", &source, issues),
            };
            revisions.insert(period, bucket);
        }
    }

    (estimates, revisions)
}

/// Recover a long-term growth figure from a nested analysis document.
///
/// Collects percent strings stored under keys mentioning "5" or "long" and
/// returns the first one (as a decimal fraction) inside `[-0.9, 3.0]`.
#[must_use]
pub fn scan_long_term_growth(doc: &Value) -> Option<f64> {
    let mut candidates = Vec::new();
    collect_growth_candidates(doc, &mut candidates);
    let (lo, hi) = LONG_TERM_SCAN_BOUNDS;
    candidates.into_iter().find(|g| (lo..=hi).contains(g))
}

fn collect_growth_candidates(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Object(obj) => {
            for (key, v) in obj {
                match v {
                    Value::Object(_) | Value::Array(_) => collect_growth_candidates(v, out),
                    Value::String(s) if s.contains('%') => {
                        let key = key.to_ascii_lowercase();
                        if (key.contains('5') || key.contains("long"))
                            && let FieldValue::Number(g) = parse_growth_fraction(v)
                        {
                            out.push(g);
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_growth_candidates(v, out)),
        _ => {}
    }
}

/// Assemble a snapshot from a provider-shaped JSON document.
///
/// Recognised top-level sections: the quarterly rows (see
/// [`quarterly_from_document`]), `earningsTrend`, and `analysis` (used only to
/// back-fill long-term growth when the trend has none).
///
/// # Errors
///
/// Propagates [`RondaError::MalformedResponse`] from the quarterly section.
pub fn snapshot_from_document(doc: &Value, source: &str) -> Result<EarningsSnapshot> {
    let mut issues = Vec::new();
    let quarterly = quarterly_from_document(doc, source, &mut issues)?;

    let (mut estimates, revisions) = doc
        .get("earningsTrend")
        .map(|trend| earnings_trend(trend, &mut issues))
        .unwrap_or_default();

    if estimates.long_term_growth.is_none() {
        estimates.long_term_growth = doc.get("analysis").and_then(scan_long_term_growth);
    }

    tracing::debug!(
        source,
        quarters = quarterly.len(),
        revision_periods = revisions.len(),
        issues = issues.len(),
        "mapped provider document"
    );

    Ok(EarningsSnapshot {
        quarterly,
        estimates,
        revisions,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(1.25), FieldValue::Number(1.25))]
    #[case(json!("1.25"), FieldValue::Number(1.25))]
    #[case(json!(" -0.5 "), FieldValue::Number(-0.5))]
    #[case(json!("12.5%"), FieldValue::Number(12.5))]
    #[case(json!("1,234.5"), FieldValue::Number(1234.5))]
    #[case(json!({"raw": 2.1, "fmt": "2.10"}), FieldValue::Number(2.1))]
    #[case(json!(null), FieldValue::Missing)]
    #[case(json!("None"), FieldValue::Missing)]
    #[case(json!(""), FieldValue::Missing)]
    #[case(json!({}), FieldValue::Missing)]
    #[case(json!("abc"), FieldValue::Invalid("abc".to_string()))]
    #[case(json!(true), FieldValue::Invalid("true".to_string()))]
    fn test_parse_number(#[case] value: Value, #[case] expected: FieldValue) {
        assert_eq!(parse_number(&value), expected);
    }

    #[test]
    fn test_parse_growth_fraction() {
        assert_eq!(parse_growth_fraction(&json!("15%")), FieldValue::Number(0.15));
        assert_eq!(parse_growth_fraction(&json!(0.15)), FieldValue::Number(0.15));
        assert_eq!(
            parse_growth_fraction(&json!({"raw": 0.2, "fmt": "20.00%"})),
            FieldValue::Number(0.2)
        );
    }

    #[test]
    fn test_alpha_vantage_rows() {
        let doc = json!({
            "symbol": "NVDA",
            "quarterlyEarnings": [
                {"fiscalDateEnding": "2024-07-31", "reportedEPS": "0.68", "estimatedEPS": "0.64",
                 "surprise": "0.04", "surprisePercentage": "6.25"},
                {"fiscalDateEnding": "2024-04-30", "reportedEPS": "6.12", "estimatedEPS": "None",
                 "surprise": "None", "surprisePercentage": "None"}
            ]
        });
        let mut issues = Vec::new();
        let records = quarterly_from_document(&doc, "alphavantage", &mut issues).unwrap();
        assert_eq!(records.len(), 2);
        assert!(issues.is_empty());

        assert_eq!(records[0].period_end, "2024-07-31");
        assert_relative_eq!(records[0].actual.unwrap(), 0.68);
        assert_relative_eq!(records[0].estimate.unwrap(), 0.64);
        assert_relative_eq!(records[0].reported_surprise_pct.unwrap(), 6.25);
        assert_relative_eq!(records[0].reported_surprise.unwrap(), 0.04);

        assert_eq!(records[1].estimate, None);
        assert_eq!(records[1].reported_surprise_pct, None);
    }

    #[test]
    fn test_fmp_rows_and_field_level_failures() {
        let doc = json!([
            {"symbol": "AAPL", "date": "2025-03-29", "epsActual": 1.65, "epsEstimated": 1.62},
            {"symbol": "AAPL", "date": "2024-12-28", "epsActual": "n/a?", "epsEstimated": 2.35},
            42
        ]);
        let mut issues = Vec::new();
        let records = quarterly_from_document(&doc, "fmp", &mut issues).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].actual, None);
        assert_relative_eq!(records[1].estimate.unwrap(), 2.35);

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "epsActual");
        assert_eq!(issues[0].source, "fmp:2024-12-28");
        assert_eq!(issues[1].field, "row[2]");
    }

    #[test]
    fn test_no_rows_is_no_data_not_error() {
        let mut issues = Vec::new();
        let records = quarterly_from_document(&json!({"Information": "rate"}), "av", &mut issues).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        let mut issues = Vec::new();
        assert!(matches!(
            quarterly_from_document(&json!("oops"), "av", &mut issues),
            Err(RondaError::MalformedResponse(_))
        ));
        assert!(matches!(
            quarterly_from_document(&json!({"quarterlyEarnings": "oops"}), "av", &mut issues),
            Err(RondaError::MalformedResponse(_))
        ));
    }

    fn yahoo_trend() -> Value {
        json!({
            "trend": [
                {"period": "0q", "endDate": "2025-09-30",
                 "earningsEstimate": {"avg": {"raw": 0.9}},
                 "epsRevisions": {"upLast7days": 1, "upLast30days": 4, "downLast7Days": 0, "downLast30days": 1}},
                {"period": "0y", "endDate": "2026-01-31", "growth": "45%",
                 "earningsEstimate": {"avg": {"raw": 2.0, "fmt": "2.00"}},
                 "epsRevisions": {"upLast7days": 2, "upLast30days": 6, "downLast7Days": 1, "downLast30days": 2}},
                {"period": "+1y", "endDate": "2027-01-31",
                 "earningsEstimate": {},
                 "epsTrend": {"current": 2.5},
                 "epsRevisions": {"upLast7days": 3, "upLast30days": 8, "downLast7days": 1, "downLast30days": 2}},
                {"period": "+5y", "growth": {"raw": 0.3, "fmt": "30.00%"}}
            ]
        })
    }

    #[test]
    fn test_earnings_trend() {
        let mut issues = Vec::new();
        let (estimates, revisions) = earnings_trend(&yahoo_trend(), &mut issues);

        assert!(issues.is_empty());
        assert_relative_eq!(estimates.current_year_eps.unwrap(), 2.0);
        assert_relative_eq!(estimates.next_year_eps.unwrap(), 2.5);
        assert_relative_eq!(estimates.long_term_growth.unwrap(), 0.3);
        assert_eq!(estimates.fiscal_base_year, Some(2026));

        let next = revisions[&RevisionPeriod::NextYear];
        assert_eq!(next.upgrades_30d, 8);
        assert_eq!(next.downgrades_30d, 2);
        assert_eq!(next.downgrades_7d, 1);
        assert!(revisions.contains_key(&RevisionPeriod::CurrentQuarter));
        assert!(!revisions.contains_key(&RevisionPeriod::LongTerm));
    }

    #[test]
    fn test_earnings_trend_bad_counts() {
        let doc = json!([
            {"period": "+1y", "epsRevisions": {"upLast30days": "many", "downLast30days": -3}}
        ]);
        let mut issues = Vec::new();
        let (_, revisions) = earnings_trend(&doc, &mut issues);
        assert_eq!(revisions[&RevisionPeriod::NextYear], RevisionBucket::default());
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_scan_long_term_growth() {
        let analysis = json!({
            "growthEstimates": [
                {"label": "next 5 years (per annum)", "stock": "abc"},
                {"Next 5 Years": "1250%"},
                {"longTermGrowth": "18.5%"}
            ],
            "other": {"currentQtr": "12%"}
        });
        let g = scan_long_term_growth(&analysis).unwrap();
        assert_relative_eq!(g, 0.185);

        assert!(scan_long_term_growth(&json!({"x": 1})).is_none());
    }

    #[test]
    fn test_snapshot_from_document() {
        let doc = json!({
            "quarterlyEarnings": [
                {"fiscalDateEnding": "2025-06-30", "reportedEPS": 1.1, "estimatedEPS": 1.0}
            ],
            "earningsTrend": {"trend": [
                {"period": "0y", "endDate": "2025-12-31", "earningsEstimate": {"avg": 4.0}},
                {"period": "+1y", "earningsEstimate": {"avg": 5.0}}
            ]},
            "analysis": {"growth": {"next5Years": "20%"}}
        });
        let snapshot = snapshot_from_document(&doc, "fixture").unwrap();
        assert_eq!(snapshot.quarterly.len(), 1);
        assert_eq!(snapshot.estimates.fiscal_base_year, Some(2025));
        assert_relative_eq!(snapshot.estimates.long_term_growth.unwrap(), 0.2);
        assert!(snapshot.revisions.is_empty());
    }
}
