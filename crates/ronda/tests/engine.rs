//! End-to-end engine runs over snapshot fixtures and in-memory providers.

use std::path::PathBuf;

use approx::assert_relative_eq;
use ronda::signals::surprise::MomentumMode;
use ronda::traits::{EarningsSnapshot, ForwardEstimateSet, QuarterlyEarningsRecord};
use ronda::{
    EarningsDataProvider, Engine, EngineConfig, MetricReport, PriceProvider, Result, RondaError,
    SnapshotProvider, StaticProvider, evaluate,
};
use rstest::rstest;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn snapshot_engine(config: EngineConfig) -> Engine<SnapshotProvider, SnapshotProvider> {
    let provider = SnapshotProvider::new(fixtures());
    Engine::new(provider.clone(), provider, config)
        .unwrap()
        .with_calendar_year(2030)
}

/// Fails for one symbol, serves an empty snapshot for the rest.
struct Flaky;

impl EarningsDataProvider for Flaky {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch_earnings(&self, symbol: &str) -> Result<EarningsSnapshot> {
        if symbol == "FAIL" {
            return Err(RondaError::DataFetch("connection reset".to_string()));
        }
        Ok(EarningsSnapshot::default())
    }
}

impl PriceProvider for Flaky {
    async fn fetch_price(&self, _symbol: &str) -> Result<Option<f64>> {
        Err(RondaError::DataFetch("quote service down".to_string()))
    }
}

#[tokio::test]
async fn test_snapshot_fixture_report() {
    let report = snapshot_engine(EngineConfig::default())
        .compute("acme")
        .await
        .unwrap();
    let c = &report.composite;

    assert_eq!(report.symbol, "ACME");
    // 10 + 20 - 10 + 4, the n/a quarter is skipped.
    assert_relative_eq!(c.momentum_pct.unwrap(), 24.0, epsilon = 1e-9);
    assert_relative_eq!(report.eps_ttm.unwrap(), 2.44, epsilon = 1e-9);

    assert_eq!(report.fiscal_base_year, 2026);
    assert_eq!(c.path_used.years(), vec![2026, 2027, 2028, 2029, 2030]);
    assert_relative_eq!(c.forward_growth_arith_pct.unwrap(), 26.5, epsilon = 1e-9);
    assert_relative_eq!(c.revision_adj_pct, 3.0);
    assert_relative_eq!(c.final_pct.unwrap(), 22.9, epsilon = 1e-9);

    assert_relative_eq!(report.price.unwrap(), 62.5);
    assert_relative_eq!(report.forward_pe.unwrap(), 25.0);

    let row = report.fundamentals().unwrap();
    assert_relative_eq!(row.eps, 2.44, epsilon = 1e-9);
    assert_relative_eq!(row.growth, 0.229, epsilon = 1e-9);
}

#[tokio::test]
async fn test_sparse_fixture() {
    let report = snapshot_engine(EngineConfig::default())
        .compute("BETA")
        .await
        .unwrap();

    // Two quarters are not enough for a sum and there are no estimates.
    assert!(report.composite.momentum_pct.is_none());
    assert!(report.composite.forward_growth_arith_pct.is_none());
    assert!(report.composite.final_pct.is_none());
    assert!(report.fundamentals().is_none());
    assert_eq!(report.fiscal_base_year, 2030);

    let mut config = EngineConfig::default();
    config.aggregator.mode = MomentumMode::Ewma;
    let ewma = snapshot_engine(config).compute("BETA").await.unwrap();
    let momentum = ewma.composite.momentum_pct.unwrap();
    assert!((-5.0..=10.0).contains(&momentum));
    assert_relative_eq!(ewma.composite.final_pct.unwrap(), 0.5 * momentum, epsilon = 1e-9);
    assert_eq!(ewma.momentum_label, "Last4 surprise% EWMA");
}

#[tokio::test]
async fn test_unknown_symbol_is_no_data() {
    let report = snapshot_engine(EngineConfig::default())
        .compute("ZZZZ")
        .await
        .unwrap();
    assert!(report.composite.final_pct.is_none());
    assert!(report.price.is_none());
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let config = EngineConfig {
        base_year: Some(2026),
        verbose: true,
        ..Default::default()
    };
    let engine = snapshot_engine(config.clone());
    let first = engine.compute("ACME").await.unwrap();
    let second = engine.compute("ACME").await.unwrap();
    assert_eq!(first, second);

    let snapshot = SnapshotProvider::new(fixtures())
        .fetch_earnings("ACME")
        .await
        .unwrap();
    let pure = evaluate("ACME", &snapshot, Some(62.5), &config, 1999);
    assert_eq!(pure, first);
}

#[tokio::test]
async fn test_manual_path_and_forced_years() {
    let mut config = EngineConfig::default();
    config.projector.manual_path = Some("2026:2.0,2027:2.5,2028:3.0".parse().unwrap());
    config.projector.forced_years = Some("2027-2028".parse().unwrap());

    let report = snapshot_engine(config).compute("ACME").await.unwrap();
    let c = &report.composite;
    assert_eq!(c.path_used.years(), vec![2027, 2028]);
    assert_eq!(c.yoy_series_pct.len(), 1);
    assert_relative_eq!(c.forward_growth_arith_pct.unwrap(), 20.0, epsilon = 1e-9);
    assert_relative_eq!(c.forward_growth_cagr_pct.unwrap(), 20.0, epsilon = 1e-9);
}

#[tokio::test]
async fn test_batch_preserves_order_and_reports_failures() {
    let engine = Engine::new(Flaky, Flaky, EngineConfig::default())
        .unwrap()
        .with_calendar_year(2026);
    let symbols = ["aaa", "FAIL", "ccc", "ddd"];
    let results = engine.compute_batch(&symbols, 2).await;

    let names: Vec<_> = results.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(names, symbols);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(RondaError::DataFetch(_))));
    assert!(results[2].1.is_ok());

    // Price failures only drop the price.
    let report: &MetricReport = results[3].1.as_ref().unwrap();
    assert!(report.price.is_none());
    assert!(report.forward_pe.is_none());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(8)]
#[tokio::test]
async fn test_batch_concurrency_levels(#[case] concurrency: usize) {
    let snapshot = EarningsSnapshot {
        quarterly: (0..4)
            .map(|q| QuarterlyEarningsRecord::new(format!("2025-0{}-28", q + 1), Some(1.1), Some(1.0)))
            .collect(),
        estimates: ForwardEstimateSet {
            current_year_eps: Some(1.0),
            next_year_eps: Some(1.1),
            ..Default::default()
        },
        ..Default::default()
    };
    let provider = StaticProvider::new()
        .with_snapshot("ONE", snapshot.clone())
        .with_snapshot("TWO", snapshot)
        .with_price("TWO", 22.0);
    let engine = Engine::new(provider.clone(), provider, EngineConfig::default())
        .unwrap()
        .with_calendar_year(2026);

    let results = engine.compute_batch(&["one", "two", "three"], concurrency).await;
    assert_eq!(results.len(), 3);
    let one = results[0].1.as_ref().unwrap();
    let two = results[1].1.as_ref().unwrap();
    assert_eq!(one.composite, two.composite);
    assert_relative_eq!(two.forward_pe.unwrap(), 20.0, epsilon = 1e-9);
    assert!(results[2].1.as_ref().unwrap().composite.final_pct.is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = EngineConfig::default();
    config.aggregator.window = 0;
    let provider = StaticProvider::new();
    assert!(matches!(
        Engine::new(provider.clone(), provider, config),
        Err(RondaError::Config(_))
    ));
}
