//! The metric pipeline and its provider-driven entry point.

use chrono::Datelike;
use futures::stream::{self, StreamExt};
use ronda_combine::{Combiner, ComponentScores, WeightedBlender};
use ronda_signals::{
    GrowthProjector, GrowthSummarizer, RevisionScorer, SurpriseAggregator, SurpriseNormalizer,
    growth::resolve_base_year,
};
use ronda_traits::{
    CompositeMetric, EarningsDataProvider, EarningsSnapshot, FiscalYear, PriceProvider, Result,
    RondaError, Symbol,
};

use crate::{
    config::EngineConfig,
    report::{Diagnostics, MetricReport, forward_pe},
};

/// Default number of symbols fetched concurrently by [`Engine::compute_batch`].
pub const DEFAULT_CONCURRENCY: usize = 4;

/// The configured components, built once and reused for every instrument.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: SurpriseNormalizer,
    aggregator: SurpriseAggregator,
    projector: GrowthProjector,
    revisions: RevisionScorer,
    blender: WeightedBlender,
    base_year: Option<FiscalYear>,
    verbose: bool,
}

impl Pipeline {
    /// Build the components described by `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            normalizer: SurpriseNormalizer::new(config.normalizer),
            aggregator: SurpriseAggregator::new(config.aggregator),
            projector: GrowthProjector::new(config.projector.clone()),
            revisions: RevisionScorer::new(config.revisions),
            blender: WeightedBlender::new(config.weights),
            base_year: config.base_year,
            verbose: config.verbose,
        }
    }

    /// Run normalize, aggregate, project, summarize, score and blend.
    #[must_use]
    pub fn evaluate(
        &self,
        symbol: &str,
        snapshot: &EarningsSnapshot,
        price: Option<f64>,
        calendar_year: FiscalYear,
    ) -> MetricReport {
        let series = self.normalizer.normalize(&snapshot.quarterly);
        let momentum = self.aggregator.aggregate(&series.values);

        let estimates = &snapshot.estimates;
        let base_year = resolve_base_year(self.base_year, estimates, calendar_year);
        let projection = self.projector.project(estimates, base_year);
        let summary = projection
            .as_ref()
            .map(|p| GrowthSummarizer.summarize(&p.path))
            .unwrap_or_default();

        let revision_adj = self.revisions.score(&snapshot.revisions);
        let scores = ComponentScores {
            momentum,
            forward: summary.arithmetic_pct,
            revisions: revision_adj,
        };
        let final_pct = self.blender.combine(&scores);

        tracing::debug!(
            symbol,
            momentum = ?momentum,
            forward = ?summary.arithmetic_pct,
            revisions = revision_adj,
            final_pct = ?final_pct,
            blender = self.blender.name(),
            "evaluated metric"
        );

        let diagnostics = self.verbose.then(|| Diagnostics {
            raw_surprises_pct: series.raw.clone(),
            surprises_pct: series.values.clone(),
            quarters: series.periods.clone(),
            projection: projection.as_ref().map(|p| p.detail),
            issues: snapshot.issues.clone(),
        });

        MetricReport {
            symbol: symbol.to_string(),
            momentum_label: self.aggregator.label(),
            composite: CompositeMetric {
                momentum_pct: momentum,
                forward_growth_arith_pct: summary.arithmetic_pct,
                forward_growth_cagr_pct: summary.cagr_pct,
                revision_adj_pct: revision_adj,
                final_pct,
                path_used: projection.map(|p| p.path).unwrap_or_default(),
                yoy_series_pct: summary.yoy_pct,
            },
            eps_current: estimates.current_year_eps,
            eps_next: estimates.next_year_eps,
            eps_ttm: self.normalizer.trailing_eps(&snapshot.quarterly),
            price,
            forward_pe: forward_pe(price, estimates.next_year_eps),
            fiscal_base_year: base_year,
            diagnostics,
        }
    }
}

/// Evaluate one instrument from already-fetched inputs.
///
/// This is a pure function: identical inputs give bit-identical reports.
#[must_use]
pub fn evaluate(
    symbol: &str,
    snapshot: &EarningsSnapshot,
    price: Option<f64>,
    config: &EngineConfig,
    calendar_year: FiscalYear,
) -> MetricReport {
    Pipeline::new(config).evaluate(symbol, snapshot, price, calendar_year)
}

/// Computes metric reports from injected data providers.
///
/// # Example
///
/// ```
/// use ronda::{Engine, EngineConfig, StaticProvider};
/// use ronda::traits::{EarningsSnapshot, ForwardEstimateSet};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> ronda::Result<()> {
/// let snapshot = EarningsSnapshot {
///     estimates: ForwardEstimateSet {
///         current_year_eps: Some(2.0),
///         next_year_eps: Some(2.5),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let provider = StaticProvider::new().with_snapshot("ACME", snapshot);
/// let engine = Engine::new(provider.clone(), provider, EngineConfig::default())?
///     .with_calendar_year(2026);
///
/// let report = engine.compute("acme").await?;
/// assert_eq!(report.symbol, "ACME");
/// assert!(report.composite.final_pct.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Engine<E, P> {
    earnings: E,
    prices: P,
    pipeline: Pipeline,
    calendar_year: Option<FiscalYear>,
}

impl<E: EarningsDataProvider, P: PriceProvider> Engine<E, P> {
    /// Create an engine.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] when `config` fails validation.
    pub fn new(earnings: E, prices: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            earnings,
            prices,
            pipeline: Pipeline::new(&config),
            calendar_year: None,
        })
    }

    /// Pin the calendar year used when neither config nor estimates name a
    /// base year. Defaults to the current UTC year.
    #[must_use]
    pub const fn with_calendar_year(mut self, year: FiscalYear) -> Self {
        self.calendar_year = Some(year);
        self
    }

    fn calendar_year(&self) -> FiscalYear {
        self.calendar_year.unwrap_or_else(|| chrono::Utc::now().year())
    }

    /// Fetch and evaluate one symbol.
    ///
    /// A price lookup failure only costs the forward P/E and is logged.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty symbol or when the earnings provider
    /// fails.
    pub async fn compute(&self, symbol: &str) -> Result<MetricReport> {
        let symbol = normalize_symbol(symbol)?;
        let (snapshot, price) = futures::join!(
            self.earnings.fetch_earnings(&symbol),
            self.prices.fetch_price(&symbol),
        );
        let snapshot = snapshot?;
        let price = price.unwrap_or_else(|e| {
            tracing::warn!(symbol = %symbol, error = %e, "price lookup failed");
            None
        });
        if snapshot.is_empty() {
            tracing::info!(symbol = %symbol, provider = self.earnings.name(), "no earnings data");
        }
        Ok(self.pipeline.evaluate(&symbol, &snapshot, price, self.calendar_year()))
    }

    /// Fetch and evaluate many symbols, at most `concurrency` at a time.
    ///
    /// Results come back in input order, one per symbol; a failing symbol does
    /// not stop the others.
    pub async fn compute_batch<S: AsRef<str>>(
        &self,
        symbols: &[S],
        concurrency: usize,
    ) -> Vec<(Symbol, Result<MetricReport>)> {
        stream::iter(symbols)
            .map(|symbol| async move {
                let symbol = symbol.as_ref();
                let result = self.compute(symbol).await;
                if let Err(e) = &result {
                    tracing::warn!(symbol, error = %e, "metric computation failed");
                }
                (symbol.to_string(), result)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

fn normalize_symbol(symbol: &str) -> Result<Symbol> {
    let symbol = symbol.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(RondaError::InvalidData("empty symbol".to_string()));
    }
    Ok(symbol)
}
