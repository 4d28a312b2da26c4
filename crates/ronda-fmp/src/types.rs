//! Data types for FMP API responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reporting period for analyst estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Fiscal-year estimates.
    #[default]
    Annual,
    /// Fiscal-quarter estimates.
    Quarter,
}

impl Period {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// Consensus analyst estimate for one fiscal period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystEstimate {
    /// Ticker symbol.
    pub symbol: String,
    /// Fiscal period end date.
    pub date: String,
    /// Mean EPS estimate.
    #[serde(default)]
    pub eps_avg: Option<f64>,
    /// Highest EPS estimate.
    #[serde(default)]
    pub eps_high: Option<f64>,
    /// Lowest EPS estimate.
    #[serde(default)]
    pub eps_low: Option<f64>,
    /// Number of analysts contributing EPS estimates.
    #[serde(default)]
    pub num_analysts_eps: Option<u32>,
}

impl AnalystEstimate {
    /// Parse the fiscal period end date.
    #[must_use]
    pub fn period_end(&self) -> Option<NaiveDate> {
        let date = self.date.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

/// Real-time quote data from FMP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Ticker symbol.
    pub symbol: String,
    /// Company name.
    #[serde(default)]
    pub name: String,
    /// Current price.
    #[serde(default)]
    pub price: Option<f64>,
    /// Market cap.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Previous close.
    #[serde(default)]
    pub previous_close: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_deserialize() {
        let json = r#"{
            "symbol": "AAPL",
            "date": "2026-09-27",
            "revenueAvg": 450000000000,
            "epsAvg": 7.85,
            "epsHigh": 8.4,
            "epsLow": null,
            "numAnalystsEps": 28
        }"#;
        let estimate: AnalystEstimate = serde_json::from_str(json).unwrap();
        assert_eq!(estimate.eps_avg, Some(7.85));
        assert_eq!(estimate.eps_low, None);
        assert_eq!(estimate.num_analysts_eps, Some(28));
        assert_eq!(
            estimate.period_end(),
            NaiveDate::from_ymd_opt(2026, 9, 27)
        );
    }

    #[test]
    fn test_quote_without_price() {
        let quote: Quote = serde_json::from_str(r#"{"symbol": "XYZ"}"#).unwrap();
        assert!(quote.price.is_none());
        assert_eq!(Period::Annual.as_str(), "annual");
    }
}
