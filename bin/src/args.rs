//! Engine settings shared by the `score` and `batch` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ronda::EngineConfig;
use ronda::combine::BlendWeights;
use ronda::signals::growth::ProjectionMode;
use ronda::signals::surprise::{MomentumMode, SurpriseConvention};
use ronda::traits::{EpsPath, YearRange};

/// Flags that override the engine configuration.
///
/// Precedence: defaults, then `--config`, then individual flags.
#[derive(Debug, Clone, Args)]
pub(crate) struct EngineArgs {
    /// JSON config file (partial files keep defaults for omitted settings)
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Read `<DIR>/<SYMBOL>.json` snapshots instead of calling FMP
    #[arg(long, value_name = "DIR")]
    pub(crate) snapshot_dir: Option<PathBuf>,

    /// Surprise momentum aggregation (sum, ewma)
    #[arg(long, value_name = "MODE")]
    pub(crate) momentum_mode: Option<MomentumMode>,

    /// Surprise winsorization ceiling in percent
    #[arg(long, value_name = "PCT", conflicts_with = "no_winsor")]
    pub(crate) winsor: Option<f64>,

    /// Disable surprise winsorization
    #[arg(long)]
    pub(crate) no_winsor: bool,

    /// Surprise derivation (recompute, reported)
    #[arg(long, value_name = "CONVENTION")]
    pub(crate) surprise_convention: Option<SurpriseConvention>,

    /// Do not blend long-term growth into the projection
    #[arg(long)]
    pub(crate) no_blend_longterm: bool,

    /// Blend weights, e.g. "momentum=0.5,forward=0.4,revisions=0.1"
    #[arg(long, value_name = "WEIGHTS")]
    pub(crate) weights: Option<BlendWeights>,

    /// Keep only these fiscal years in the EPS path, e.g. "2026-2029"
    #[arg(long, value_name = "LOW-HIGH")]
    pub(crate) force_years: Option<YearRange>,

    /// EPS path projection (constant, glide)
    #[arg(long, value_name = "MODE")]
    pub(crate) projection: Option<ProjectionMode>,

    /// Terminal growth for glide projection, as a decimal fraction
    #[arg(long, value_name = "G")]
    pub(crate) terminal_growth: Option<f64>,

    /// Number of fiscal years in the projected path
    #[arg(long, value_name = "YEARS")]
    pub(crate) horizon: Option<usize>,

    /// Use this EPS path instead of projecting, e.g. "2026:2.0,2027:2.5"
    #[arg(long, value_name = "PATH")]
    pub(crate) manual_path: Option<EpsPath>,

    /// Fiscal year of the first path point
    #[arg(long, value_name = "YEAR")]
    pub(crate) base_year: Option<i32>,

    /// Attach diagnostics and log at debug level
    #[arg(long)]
    pub(crate) verbose: bool,
}

impl EngineArgs {
    /// Resolve the effective engine configuration.
    pub(crate) fn to_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };

        if let Some(mode) = self.momentum_mode {
            config.aggregator.mode = mode;
        }
        if self.no_winsor {
            config.normalizer.winsor_ceiling = None;
        } else if let Some(ceiling) = self.winsor {
            config.normalizer.winsor_ceiling = Some(ceiling);
        }
        if let Some(convention) = self.surprise_convention {
            config.normalizer.convention = convention;
        }
        if self.no_blend_longterm {
            config.projector.blend_long_term = false;
        }
        if let Some(weights) = self.weights {
            config.weights = weights;
        }
        if let Some(range) = self.force_years {
            config.projector.forced_years = Some(range);
        }
        if let Some(mode) = self.projection {
            config.projector.mode = mode;
        }
        if let Some(g) = self.terminal_growth {
            config.projector.terminal_growth = Some(g);
        }
        if let Some(h) = self.horizon {
            config.projector.horizon_years = h;
        }
        if let Some(path) = &self.manual_path {
            config.projector.manual_path = Some(path.clone());
        }
        if self.base_year.is_some() {
            config.base_year = self.base_year;
        }
        config.verbose |= self.verbose;

        config.validate()?;
        Ok(config)
    }
}
