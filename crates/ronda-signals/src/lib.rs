//! Component scores for the ronda forward earnings-growth metric.
//!
//! This crate provides the per-instrument computations the metric is built from:
//! - Surprise: normalization of quarterly beats and misses, then sum or EWMA momentum
//! - Growth: forward EPS path projection and arithmetic / compounded summaries
//! - Revisions: 30-day analyst revision breadth
//!
//! Every component is a pure function of its inputs and configuration.
//!
//! # Example
//!
//! ```
//! use ronda_signals::growth::{GrowthProjector, GrowthSummarizer};
//! use ronda_traits::ForwardEstimateSet;
//!
//! let estimates = ForwardEstimateSet {
//!     current_year_eps: Some(2.0),
//!     next_year_eps: Some(2.5),
//!     ..Default::default()
//! };
//! let projection = GrowthProjector::default().project(&estimates, 2026).unwrap();
//! let summary = GrowthSummarizer.summarize(&projection.path);
//! assert_eq!(summary.yoy_pct.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod growth;
pub mod registry;
pub mod revisions;
pub mod surprise;

// Re-export key types
pub use growth::{GrowthProjector, GrowthSummarizer, ProjectorConfig};
pub use registry::{ComponentCategory, ComponentInfo};
pub use revisions::{RevisionConfig, RevisionScorer};
pub use surprise::{AggregatorConfig, NormalizerConfig, SurpriseAggregator, SurpriseNormalizer};
