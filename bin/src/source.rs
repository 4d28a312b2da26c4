//! Data source selection for the CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ronda::fmp::FmpClient;
use ronda::traits::EarningsSnapshot;
use ronda::{EarningsDataProvider, PriceProvider, SnapshotProvider};

/// The provider a command reads from.
#[derive(Debug, Clone)]
pub(crate) enum Source {
    Snapshot(SnapshotProvider),
    Fmp(FmpClient),
}

impl Source {
    /// Snapshots when a directory is given, FMP otherwise.
    pub(crate) fn select(snapshot_dir: Option<&PathBuf>) -> Result<Self> {
        match snapshot_dir {
            Some(dir) => Ok(Self::Snapshot(SnapshotProvider::new(dir))),
            None => {
                let client = FmpClient::from_env()
                    .context("FMP client unavailable (set FMP_API_KEY or pass --snapshot-dir)")?;
                Ok(Self::Fmp(client))
            }
        }
    }
}

impl EarningsDataProvider for Source {
    fn name(&self) -> &str {
        match self {
            Self::Snapshot(p) => p.name(),
            Self::Fmp(p) => EarningsDataProvider::name(p),
        }
    }

    async fn fetch_earnings(&self, symbol: &str) -> ronda::Result<EarningsSnapshot> {
        match self {
            Self::Snapshot(p) => p.fetch_earnings(symbol).await,
            Self::Fmp(p) => p.fetch_earnings(symbol).await,
        }
    }
}

impl PriceProvider for Source {
    async fn fetch_price(&self, symbol: &str) -> ronda::Result<Option<f64>> {
        match self {
            Self::Snapshot(p) => p.fetch_price(symbol).await,
            Self::Fmp(p) => p.fetch_price(symbol).await,
        }
    }
}
