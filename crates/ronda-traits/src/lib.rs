#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core definitions for the ronda forward earnings-growth engine.
//!
//! This crate holds the canonical data model every other ronda crate speaks,
//! the collaborator traits through which raw data enters the engine, and the
//! schema adapter that maps provider documents onto the model.

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod provider;
pub mod schema;
pub mod types;

// Re-exports
pub use error::{Result, RondaError};
pub use provider::{EarningsDataProvider, PriceProvider};
pub use types::{
    CompositeMetric, EarningsSnapshot, EpsPath, EpsPoint, FieldIssue, FiscalYear,
    ForwardEstimateSet, QuarterlyEarningsRecord, RevisionBucket, RevisionCounts, RevisionPeriod,
    SurpriseSeries, Symbol, YearRange,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
