//! Engine configuration.

use std::path::Path;

use ronda_combine::BlendWeights;
use ronda_signals::growth::MAX_HORIZON_YEARS;
use ronda_signals::{AggregatorConfig, NormalizerConfig, ProjectorConfig, RevisionConfig};
use ronda_traits::{FiscalYear, Result, RondaError};
use serde::{Deserialize, Serialize};

/// Every tunable of the metric pipeline.
///
/// Deserialization fills unnamed fields with defaults, so a config file only
/// needs to carry the settings it changes:
///
/// ```
/// use ronda::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{"aggregator": {"window": 6}}"#).unwrap();
/// assert_eq!(config.aggregator.window, 6);
/// assert_eq!(config.aggregator.half_life, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Surprise normalization.
    pub normalizer: NormalizerConfig,
    /// Surprise momentum aggregation.
    pub aggregator: AggregatorConfig,
    /// Forward EPS path projection.
    pub projector: ProjectorConfig,
    /// Revision breadth scoring.
    pub revisions: RevisionConfig,
    /// Final blend weights.
    pub weights: BlendWeights,
    /// Fiscal year of the first path point, overriding the estimates.
    pub base_year: Option<FiscalYear>,
    /// Attach diagnostics to reports.
    pub verbose: bool,
}

impl EngineConfig {
    /// Load a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// [`validate`](Self::validate).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| RondaError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration describes a computable pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if let Some(ceiling) = self.normalizer.winsor_ceiling
            && !(ceiling.is_finite() && ceiling > 0.0)
        {
            return Err(invalid("normalizer.winsor_ceiling must be positive"));
        }
        if self.aggregator.window == 0 {
            return Err(invalid("aggregator.window must be at least 1"));
        }
        if !(self.aggregator.half_life.is_finite() && self.aggregator.half_life > 0.0) {
            return Err(invalid("aggregator.half_life must be positive"));
        }

        let p = &self.projector;
        if !(p.growth_floor.is_finite() && p.growth_cap.is_finite()) || p.growth_floor > p.growth_cap {
            return Err(invalid("projector.growth_floor must not exceed projector.growth_cap"));
        }
        if [p.near_term_weight, p.long_term_weight]
            .iter()
            .any(|x| !x.is_finite() || *x < 0.0)
        {
            return Err(invalid("projector blend weights must be non-negative"));
        }
        if p.horizon_years > MAX_HORIZON_YEARS {
            return Err(RondaError::Config(format!(
                "projector.horizon_years must not exceed {MAX_HORIZON_YEARS}"
            )));
        }
        let terminal = [Some(p.terminal_cap), Some(p.terminal_near_term_share), p.terminal_growth];
        if terminal.iter().flatten().any(|x| !x.is_finite()) {
            return Err(invalid("projector terminal growth settings must be finite"));
        }
        if self.revisions.cap < 0.0 {
            return Err(invalid("revisions.cap must be non-negative"));
        }

        let w = &self.weights;
        if [w.momentum, w.forward, w.revisions]
            .iter()
            .any(|x| !x.is_finite() || *x < 0.0)
        {
            return Err(invalid("blend weights must be non-negative"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RondaError {
    RondaError::Config(msg.to_string())
}
