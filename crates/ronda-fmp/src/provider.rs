//! Provider trait implementations backed by FMP.

use chrono::{Datelike, NaiveDate};
use ronda_traits::{
    EarningsDataProvider, EarningsSnapshot, ForwardEstimateSet, PriceProvider, RevisionCounts,
    schema,
};

use crate::{
    client::FmpClient,
    types::{AnalystEstimate, Period},
};

/// Source label attached to field issues.
const SOURCE: &str = "fmp";

/// Quarterly rows requested per symbol.
const EARNINGS_LIMIT: u32 = 12;

/// Pick current and next fiscal-year EPS from annual estimates.
///
/// The current year is the first fiscal period ending on or after `as_of`,
/// the next year the one after it.
#[must_use]
pub fn forward_estimates(rows: &[AnalystEstimate], as_of: NaiveDate) -> ForwardEstimateSet {
    let mut dated: Vec<_> = rows
        .iter()
        .filter_map(|row| row.period_end().map(|date| (date, row)))
        .filter(|(date, _)| *date >= as_of)
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let current = dated.first();
    let next = dated.get(1);
    ForwardEstimateSet {
        current_year_eps: current.and_then(|(_, row)| row.eps_avg),
        next_year_eps: next.and_then(|(_, row)| row.eps_avg),
        long_term_growth: None,
        fiscal_base_year: current.map(|(date, _)| date.year()),
    }
}

impl EarningsDataProvider for FmpClient {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch_earnings(&self, symbol: &str) -> ronda_traits::Result<EarningsSnapshot> {
        let (rows, estimates) = tokio::join!(
            self.earnings(symbol, Some(EARNINGS_LIMIT)),
            self.analyst_estimates(symbol, Period::Annual, None),
        );
        let (rows, estimates) = (rows?, estimates?);

        let mut issues = Vec::new();
        let quarterly = schema::quarterly_records(&rows, SOURCE, &mut issues);
        let estimates = forward_estimates(&estimates, self.as_of());
        tracing::debug!(
            symbol,
            quarters = quarterly.len(),
            current = ?estimates.current_year_eps,
            next = ?estimates.next_year_eps,
            "fetched FMP earnings"
        );

        Ok(EarningsSnapshot {
            quarterly,
            estimates,
            // FMP publishes no revision counts.
            revisions: RevisionCounts::new(),
            issues,
        })
    }
}

impl PriceProvider for FmpClient {
    async fn fetch_price(&self, symbol: &str) -> ronda_traits::Result<Option<f64>> {
        let quote = self.quote(symbol).await?;
        Ok(quote.and_then(|q| q.price))
    }
}
