//! Offline providers: JSON snapshots on disk and in-memory fixtures.

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use ronda_traits::{
    EarningsDataProvider, EarningsSnapshot, PriceProvider, Result, RondaError,
    schema::{self, FieldValue},
};
use serde_json::Value;

/// Reads `<dir>/<SYMBOL>.json` documents captured from an earnings provider.
///
/// A document may carry quarterly rows (`quarterlyEarnings` or
/// `earningsChart.quarterly`), a Yahoo-style `earningsTrend`, an `analysis`
/// section, and a top-level `price`. A missing file means "no data".
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    dir: PathBuf,
}

impl SnapshotProvider {
    /// Create a provider over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshot directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Snapshot file for `symbol`, which must name a file inside the directory.
    fn path_for(&self, symbol: &str) -> Result<PathBuf> {
        if symbol.is_empty() || symbol.contains(['/', '\\', '\0']) || symbol.contains("..") {
            return Err(RondaError::InvalidData(format!(
                "symbol '{symbol}' cannot name a snapshot file"
            )));
        }
        Ok(self.dir.join(format!("{symbol}.json")))
    }

    async fn load(&self, symbol: &str) -> Result<Option<Value>> {
        let path = self.path_for(symbol)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no snapshot file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| RondaError::MalformedResponse(format!("{}: {e}", path.display())))
    }
}

impl EarningsDataProvider for SnapshotProvider {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn fetch_earnings(&self, symbol: &str) -> Result<EarningsSnapshot> {
        match self.load(symbol).await? {
            Some(doc) => schema::snapshot_from_document(&doc, &format!("snapshot:{symbol}")),
            None => Ok(EarningsSnapshot::default()),
        }
    }
}

impl PriceProvider for SnapshotProvider {
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        let Some(doc) = self.load(symbol).await? else {
            return Ok(None);
        };
        Ok(match doc.get("price").map(schema::parse_number) {
            Some(FieldValue::Number(price)) => Some(price),
            Some(FieldValue::Invalid(raw)) => {
                tracing::warn!(symbol, raw = %raw, "unparseable snapshot price");
                None
            }
            Some(FieldValue::Missing) | None => None,
        })
    }
}

/// In-memory provider keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    snapshots: HashMap<String, EarningsSnapshot>,
    prices: HashMap<String, f64>,
}

impl StaticProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the earnings snapshot for `symbol`.
    #[must_use]
    pub fn with_snapshot(mut self, symbol: impl Into<String>, snapshot: EarningsSnapshot) -> Self {
        self.snapshots.insert(symbol.into(), snapshot);
        self
    }

    /// Add the price for `symbol`.
    #[must_use]
    pub fn with_price(mut self, symbol: impl Into<String>, price: f64) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }
}

impl EarningsDataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_earnings(&self, symbol: &str) -> Result<EarningsSnapshot> {
        Ok(self.snapshots.get(symbol).cloned().unwrap_or_default())
    }
}

impl PriceProvider for StaticProvider {
    async fn fetch_price(&self, symbol: &str) -> Result<Option<f64>> {
        Ok(self.prices.get(symbol).copied())
    }
}
