//! Forward earnings growth.
//!
//! The projector turns consensus estimates into a multi-year EPS path and the
//! summarizer reduces that path to arithmetic and compounded growth rates.

mod project;
mod summarize;

pub use project::{
    GrowthProjector, MAX_HORIZON_YEARS, Projection, ProjectionDetail, ProjectionMode, ProjectorConfig,
    resolve_base_year,
};
pub use summarize::{GrowthSummarizer, GrowthSummary, cagr_pct, yoy_series};
