#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Quick Start
//!
//! ```
//! use ronda::{EngineConfig, evaluate};
//! use ronda::traits::{EarningsSnapshot, ForwardEstimateSet, QuarterlyEarningsRecord};
//!
//! let snapshot = EarningsSnapshot {
//!     quarterly: vec![
//!         QuarterlyEarningsRecord::new("2025-06-30", Some(1.10), Some(1.00)),
//!         QuarterlyEarningsRecord::new("2025-03-31", Some(1.05), Some(1.00)),
//!         QuarterlyEarningsRecord::new("2024-12-31", Some(0.90), Some(1.00)),
//!         QuarterlyEarningsRecord::new("2024-09-30", Some(1.20), Some(1.00)),
//!     ],
//!     estimates: ForwardEstimateSet {
//!         current_year_eps: Some(2.0),
//!         next_year_eps: Some(2.5),
//!         long_term_growth: Some(0.30),
//!         fiscal_base_year: Some(2026),
//!     },
//!     ..Default::default()
//! };
//!
//! let report = evaluate("ACME", &snapshot, Some(50.0), &EngineConfig::default(), 2026);
//! assert!(report.composite.momentum_pct.is_some());
//! assert!(report.composite.final_pct.is_some());
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Data model, provider traits and schema adapter
//! - [`signals`] - Surprise, growth and revision components
//! - [`combine`] - Final-metric blending
//! - [`fmp`] - Financial Modeling Prep provider
//!
//! ## Pipeline
//!
//! 1. **Normalize** quarterly actual/estimate pairs into winsorized surprises
//! 2. **Aggregate** the newest surprises into momentum
//! 3. **Project** a forward EPS path and **summarize** its growth
//! 4. **Score** analyst revision breadth
//! 5. **Blend** the three components into the final metric

/// Version information for the ronda crate.
///
/// This constant contains the current version of ronda as specified in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod engine;
mod report;
mod snapshot;

pub use config::EngineConfig;
pub use engine::{DEFAULT_CONCURRENCY, Engine, Pipeline, evaluate};
pub use report::{Diagnostics, FundamentalsSnapshot, MetricReport, forward_pe};
pub use snapshot::{SnapshotProvider, StaticProvider};

// ============================================================================
// Core Definitions
// ============================================================================

/// Core definitions for ronda.
///
/// This module re-exports the canonical data model, the
/// [`EarningsDataProvider`] and [`PriceProvider`] traits, and the schema
/// adapter.
pub mod traits {
    pub use ronda_traits::*;
}

// Re-export core traits at top level for convenience
pub use ronda_combine::Combiner;
pub use ronda_traits::{EarningsDataProvider, PriceProvider};

// Re-export error types
pub use ronda_traits::{Result, RondaError};

// Re-export common types
pub use ronda_traits::{CompositeMetric, EarningsSnapshot, EpsPath, Symbol, YearRange};

// ============================================================================
// Components
// ============================================================================

/// Component scores.
///
/// - **surprise**: [`SurpriseNormalizer`](signals::surprise::SurpriseNormalizer)
///   and [`SurpriseAggregator`](signals::surprise::SurpriseAggregator)
/// - **growth**: [`GrowthProjector`](signals::growth::GrowthProjector) and
///   [`GrowthSummarizer`](signals::growth::GrowthSummarizer)
/// - **revisions**: [`RevisionScorer`](signals::revisions::RevisionScorer)
/// - **registry**: metadata for every reported figure
pub mod signals {
    pub use ronda_signals::*;
}

/// Final-metric blending.
///
/// ```
/// use ronda::combine::{BlendWeights, WeightedBlender};
///
/// let weights: BlendWeights = "momentum=0.6,forward=0.3,revisions=0.1".parse().unwrap();
/// let blender = WeightedBlender::new(weights);
/// # let _ = blender;
/// ```
pub mod combine {
    pub use ronda_combine::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) provider.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
///
/// ## Example
///
/// ```ignore
/// use ronda::fmp::FmpClient;
/// use ronda::{Engine, EngineConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = FmpClient::from_env()?;
///     let engine = Engine::new(client.clone(), client, EngineConfig::default())?;
///
///     let report = engine.compute("AAPL").await?;
///     println!("{:?}", report.composite.final_pct);
///
///     Ok(())
/// }
/// ```
pub mod fmp {
    pub use ronda_fmp::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use ronda::prelude::*;
/// ```
///
/// This brings into scope:
/// - Engine entry points: [`Engine`], [`EngineConfig`], [`evaluate`]
/// - Provider traits: [`EarningsDataProvider`], [`PriceProvider`]
/// - Error types: [`Result`], [`RondaError`]
pub mod prelude {
    pub use crate::{
        EarningsDataProvider, Engine, EngineConfig, MetricReport, PriceProvider, Result,
        RondaError, evaluate,
    };
}

// ============================================================================
// Tests
// ============================================================================
