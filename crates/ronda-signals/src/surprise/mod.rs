//! Earnings surprise momentum.
//!
//! Quarterly records are first normalized into a newest-first, winsorized
//! series of percentage surprises, which is then aggregated into a single
//! momentum figure.

mod aggregate;
mod normalize;

pub use aggregate::{AggregatorConfig, MomentumMode, SurpriseAggregator, ewma, sum_last};
pub use normalize::{
    DEFAULT_WINSOR_CEILING, NormalizerConfig, RecordOrder, SurpriseConvention, SurpriseNormalizer,
    TTM_QUARTERS, winsorize,
};
