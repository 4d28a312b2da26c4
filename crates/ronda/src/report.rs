//! Per-instrument output of the engine.

use ronda_signals::growth::ProjectionDetail;
use ronda_traits::{CompositeMetric, FieldIssue, FiscalYear, Symbol};
use serde::{Deserialize, Serialize};

/// Intermediate values behind a report, attached in verbose mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Surprises before winsorization, newest first.
    pub raw_surprises_pct: Vec<f64>,
    /// Surprises fed to the aggregator, newest first.
    pub surprises_pct: Vec<f64>,
    /// Period labels parallel to the surprise series.
    pub quarters: Vec<String>,
    /// How the EPS path was derived, when one exists.
    pub projection: Option<ProjectionDetail>,
    /// Provider fields that failed to parse.
    pub issues: Vec<FieldIssue>,
}

/// Everything computed for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Label of the momentum aggregation in effect.
    pub momentum_label: String,
    /// The composite metric.
    pub composite: CompositeMetric,
    /// Current fiscal-year consensus EPS.
    pub eps_current: Option<f64>,
    /// Next fiscal-year consensus EPS.
    pub eps_next: Option<f64>,
    /// Sum of the four most recent reported quarters.
    pub eps_ttm: Option<f64>,
    /// Last price.
    pub price: Option<f64>,
    /// Price over next fiscal-year EPS.
    pub forward_pe: Option<f64>,
    /// Fiscal year the path starts at.
    pub fiscal_base_year: FiscalYear,
    /// Intermediate values, verbose mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

/// The row a fundamentals store keeps per instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsSnapshot {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Representative EPS.
    pub eps: f64,
    /// Growth as a decimal fraction.
    pub growth: f64,
    /// Surprise momentum, percent.
    pub surprise_sum: Option<f64>,
}

impl MetricReport {
    /// Derive the fundamentals row.
    ///
    /// EPS prefers the trailing twelve months, then next-year and current-year
    /// consensus, skipping zeros. Growth prefers the final metric over forward
    /// arithmetic growth. `None` when either is unavailable.
    #[must_use]
    pub fn fundamentals(&self) -> Option<FundamentalsSnapshot> {
        let eps = [self.eps_ttm, self.eps_next, self.eps_current]
            .into_iter()
            .flatten()
            .find(|eps| *eps != 0.0)?;
        let growth = self
            .composite
            .final_pct
            .or(self.composite.forward_growth_arith_pct)?
            / 100.0;
        Some(FundamentalsSnapshot {
            symbol: self.symbol.clone(),
            eps,
            growth,
            surprise_sum: self.composite.momentum_pct,
        })
    }

    /// Difference between the final metric and a reference value.
    #[must_use]
    pub fn delta_from(&self, baseline: f64) -> Option<f64> {
        self.composite.final_pct.map(|v| v - baseline)
    }
}

/// Forward P/E, defined when both inputs exist and EPS is non-zero.
#[must_use]
pub fn forward_pe(price: Option<f64>, next_eps: Option<f64>) -> Option<f64> {
    match (price, next_eps) {
        (Some(price), Some(eps)) if eps != 0.0 => Some(price / eps),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn report() -> MetricReport {
        MetricReport {
            symbol: "ACME".to_string(),
            momentum_label: "Last4 surprise% sum".to_string(),
            composite: CompositeMetric {
                momentum_pct: Some(12.0),
                forward_growth_arith_pct: Some(20.0),
                final_pct: Some(14.0),
                ..Default::default()
            },
            eps_current: Some(2.0),
            eps_next: Some(2.5),
            eps_ttm: Some(1.8),
            price: Some(50.0),
            forward_pe: forward_pe(Some(50.0), Some(2.5)),
            fiscal_base_year: 2026,
            diagnostics: None,
        }
    }

    #[test]
    fn test_forward_pe() {
        assert_relative_eq!(forward_pe(Some(50.0), Some(2.5)).unwrap(), 20.0);
        assert!(forward_pe(Some(50.0), Some(0.0)).is_none());
        assert!(forward_pe(None, Some(2.5)).is_none());
        assert!(forward_pe(Some(50.0), None).is_none());
    }

    #[test]
    fn test_fundamentals_prefers_ttm_and_final() {
        let row = report().fundamentals().unwrap();
        assert_relative_eq!(row.eps, 1.8);
        assert_relative_eq!(row.growth, 0.14);
        assert_eq!(row.surprise_sum, Some(12.0));
    }

    #[test]
    fn test_fundamentals_fallbacks() {
        let mut r = report();
        r.eps_ttm = Some(0.0);
        r.composite.final_pct = None;
        let row = r.fundamentals().unwrap();
        assert_relative_eq!(row.eps, 2.5);
        assert_relative_eq!(row.growth, 0.20);

        r.eps_next = None;
        assert_relative_eq!(r.fundamentals().unwrap().eps, 2.0);

        r.eps_current = None;
        assert!(r.fundamentals().is_none());

        let mut r = report();
        r.composite.final_pct = None;
        r.composite.forward_growth_arith_pct = None;
        assert!(r.fundamentals().is_none());
    }

    #[test]
    fn test_delta_and_serialization() {
        let r = report();
        assert_relative_eq!(r.delta_from(10.0).unwrap(), 4.0);

        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("diagnostics").is_none());
        assert_eq!(json["fiscal_base_year"], 2026);
        let back: MetricReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }
}
