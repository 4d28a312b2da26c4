//! Collaborator traits for data acquisition.
//!
//! The engine never talks to the network itself. It is handed an
//! [`EarningsDataProvider`] and a [`PriceProvider`] at construction time and
//! calls them once per symbol. Retry, backoff and rate limiting belong to the
//! implementations.

use std::future::Future;

use crate::{EarningsSnapshot, Result};

/// Source of quarterly earnings, forward estimates and revision counts.
///
/// Implementations must distinguish "no data" from failure: a symbol the
/// provider has nothing for yields `Ok(EarningsSnapshot::default())` (or a
/// partially filled snapshot), while transport errors and unreadable bodies
/// yield `Err`.
///
/// # Example
///
/// ```no_run
/// use ronda_traits::{EarningsDataProvider, EarningsSnapshot, Result};
///
/// struct Empty;
///
/// impl EarningsDataProvider for Empty {
///     fn name(&self) -> &str {
///         "empty"
///     }
///
///     async fn fetch_earnings(&self, _symbol: &str) -> Result<EarningsSnapshot> {
///         Ok(EarningsSnapshot::default())
///     }
/// }
/// ```
pub trait EarningsDataProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Fetch everything the engine needs for `symbol`.
    fn fetch_earnings(&self, symbol: &str) -> impl Future<Output = Result<EarningsSnapshot>> + Send;
}

/// Source of a last-trade price.
///
/// Only used to derive a forward P/E next to the composite metric.
pub trait PriceProvider: Send + Sync {
    /// Fetch the latest price, `None` when the provider has none.
    fn fetch_price(&self, symbol: &str) -> impl Future<Output = Result<Option<f64>>> + Send;
}
