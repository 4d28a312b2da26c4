//! Forward EPS path projection.

use std::{fmt, str::FromStr};

use ronda_traits::{EpsPath, FiscalYear, ForwardEstimateSet, RondaError, YearRange};
use serde::{Deserialize, Serialize};

/// Longest path a projector will build, in fiscal years.
pub const MAX_HORIZON_YEARS: usize = 100;

/// How years beyond the next fiscal year are extrapolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    /// One growth rate compounded for every year.
    #[default]
    Constant,
    /// Growth glides linearly from the near-term rate to a terminal rate.
    Glide,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => write!(f, "constant"),
            Self::Glide => write!(f, "glide"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "glide" => Ok(Self::Glide),
            other => Err(RondaError::InvalidData(format!("unknown projection mode '{other}'"))),
        }
    }
}

/// Configuration for the growth projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Projection mode.
    pub mode: ProjectionMode,
    /// Number of fiscal years in the path, counting the current year (default: 5).
    pub horizon_years: usize,
    /// Blend the long-term growth estimate into the near-term rate (default: true).
    pub blend_long_term: bool,
    /// Weight on next/current growth when blending (default: 0.60).
    pub near_term_weight: f64,
    /// Weight on long-term growth when blending (default: 0.40).
    pub long_term_weight: f64,
    /// Lower bound on any applied annual growth rate (default: -0.90).
    pub growth_floor: f64,
    /// Upper bound on any applied annual growth rate (default: 3.00).
    pub growth_cap: f64,
    /// Glide terminal growth used when no long-term estimate applies (default: 0.22).
    pub terminal_growth: Option<f64>,
    /// Cap on the derived terminal growth when `terminal_growth` is unset.
    pub terminal_cap: f64,
    /// Share of near-term growth used as derived terminal growth.
    pub terminal_near_term_share: f64,
    /// Keep only these fiscal years in the result.
    pub forced_years: Option<YearRange>,
    /// Caller-supplied path that replaces projection entirely.
    pub manual_path: Option<EpsPath>,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::default(),
            horizon_years: 5,
            blend_long_term: true,
            near_term_weight: 0.60,
            long_term_weight: 0.40,
            growth_floor: -0.90,
            growth_cap: 3.00,
            terminal_growth: Some(0.22),
            terminal_cap: 0.25,
            terminal_near_term_share: 0.60,
            forced_years: None,
            manual_path: None,
        }
    }
}

/// How a path was obtained, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDetail {
    /// Mode in effect.
    pub mode: ProjectionMode,
    /// Fiscal year of the first point.
    pub base_year: FiscalYear,
    /// Raw next/current growth.
    pub near_term_growth: Option<f64>,
    /// Clamped rate compounded in constant mode.
    pub applied_growth: Option<f64>,
    /// Terminal rate in glide mode, before clamping.
    pub terminal_growth: Option<f64>,
    /// Whether the path was supplied by the caller.
    pub manual: bool,
}

/// A projected path together with how it was derived.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The forward EPS path.
    pub path: EpsPath,
    /// Derivation details.
    pub detail: ProjectionDetail,
}

/// Pick the fiscal year of the first path point.
///
/// An explicit year wins, then the year the estimates are anchored to, then
/// `calendar_year`.
#[must_use]
pub fn resolve_base_year(
    explicit: Option<FiscalYear>,
    estimates: &ForwardEstimateSet,
    calendar_year: FiscalYear,
) -> FiscalYear {
    explicit.or(estimates.fiscal_base_year).unwrap_or(calendar_year)
}

/// Builds a multi-year forward EPS path from current and next fiscal-year
/// consensus, optionally informed by a long-term growth estimate.
///
/// Years 0 and 1 always carry the given estimates. A manual path in the
/// configuration bypasses projection.
#[derive(Debug, Clone, Default)]
pub struct GrowthProjector {
    config: ProjectorConfig,
}

impl GrowthProjector {
    /// Create a new projector with the given configuration.
    #[must_use]
    pub const fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    fn clamp_growth(&self, g: f64) -> f64 {
        g.min(self.config.growth_cap).max(self.config.growth_floor)
    }

    /// Project the path starting at `base_year`.
    ///
    /// Returns `None` when no usable path exists: current or next EPS is
    /// missing, the path would run past the last representable fiscal year,
    /// or the forced year range removes every point.
    ///
    /// The horizon is capped at [`MAX_HORIZON_YEARS`].
    #[must_use]
    pub fn project(&self, estimates: &ForwardEstimateSet, base_year: FiscalYear) -> Option<Projection> {
        let cfg = &self.config;

        let (path, detail) = if let Some(manual) = &cfg.manual_path {
            let detail = ProjectionDetail {
                mode: cfg.mode,
                base_year: manual.years().first().copied().unwrap_or(base_year),
                near_term_growth: None,
                applied_growth: None,
                terminal_growth: None,
                manual: true,
            };
            (manual.clone(), detail)
        } else {
            let current = estimates.current_year_eps?;
            let next = estimates.next_year_eps?;
            let g1 = if current == 0.0 { 0.0 } else { next / current - 1.0 };
            let long_term = estimates
                .long_term_growth
                .filter(|g| cfg.blend_long_term && g.is_finite());

            let mut detail = ProjectionDetail {
                mode: cfg.mode,
                base_year,
                near_term_growth: Some(g1),
                applied_growth: None,
                terminal_growth: None,
                manual: false,
            };
            let remain = cfg.horizon_years.min(MAX_HORIZON_YEARS).saturating_sub(2);
            let steps = match cfg.mode {
                ProjectionMode::Constant => {
                    let g = self.clamp_growth(match long_term {
                        Some(ltg) => cfg.near_term_weight * g1 + cfg.long_term_weight * ltg,
                        None => g1,
                    });
                    detail.applied_growth = Some(g);
                    vec![g; remain]
                }
                ProjectionMode::Glide => {
                    let terminal = long_term.or(cfg.terminal_growth).unwrap_or_else(|| {
                        (cfg.terminal_near_term_share * g1).min(cfg.terminal_cap)
                    });
                    detail.terminal_growth = Some(terminal);
                    glide_steps(g1, terminal, remain)
                        .into_iter()
                        .map(|g| self.clamp_growth(g))
                        .collect()
                }
            };

            let mut values = vec![current, next];
            for g in steps {
                let prev = values[values.len() - 1];
                values.push(prev * (1.0 + g));
            }

            let Some(years) = fiscal_years(base_year, values.len()) else {
                tracing::warn!(base_year, points = values.len(), "fiscal years overflow");
                return None;
            };
            match EpsPath::new(years.into_iter().zip(values)) {
                Ok(path) => (path, detail),
                Err(e) => {
                    tracing::warn!(error = %e, "projected EPS path rejected");
                    return None;
                }
            }
        };

        let path = match &cfg.forced_years {
            Some(range) => path.filter_years(range),
            None => path,
        };
        if path.is_empty() {
            tracing::debug!(forced_years = ?cfg.forced_years, "no usable EPS path");
            return None;
        }

        tracing::debug!(
            mode = %detail.mode,
            base_year = detail.base_year,
            points = path.len(),
            manual = detail.manual,
            "projected EPS path"
        );
        Some(Projection { path, detail })
    }
}

/// `len` consecutive years from `base_year`, `None` past `FiscalYear::MAX`.
fn fiscal_years(base_year: FiscalYear, len: usize) -> Option<Vec<FiscalYear>> {
    (0..len)
        .map(|i| FiscalYear::try_from(i).ok().and_then(|i| base_year.checked_add(i)))
        .collect()
}

/// Per-year growth rates gliding from `start` to `terminal` over `remain` steps.
fn glide_steps(start: f64, terminal: f64, remain: usize) -> Vec<f64> {
    (1..=remain)
        .map(|i| {
            let w = if remain <= 1 { 1.0 } else { i as f64 / remain as f64 };
            (1.0 - w) * start + w * terminal
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn estimates(current: f64, next: f64, ltg: Option<f64>) -> ForwardEstimateSet {
        ForwardEstimateSet {
            current_year_eps: Some(current),
            next_year_eps: Some(next),
            long_term_growth: ltg,
            fiscal_base_year: None,
        }
    }

    fn assert_path(path: &EpsPath, expected: &[f64]) {
        let values = path.values();
        assert_eq!(values.len(), expected.len(), "path {values:?}");
        for (v, e) in values.iter().zip(expected) {
            assert_relative_eq!(*v, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_constant_blended_growth() {
        let projection = GrowthProjector::default()
            .project(&estimates(2.0, 2.5, Some(0.30)), 2026)
            .unwrap();

        assert_relative_eq!(projection.detail.near_term_growth.unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(projection.detail.applied_growth.unwrap(), 0.27, epsilon = 1e-12);
        assert_path(&projection.path, &[2.0, 2.5, 3.175, 4.03225, 5.1209575]);
        assert_eq!(projection.path.years(), vec![2026, 2027, 2028, 2029, 2030]);
    }

    #[test]
    fn test_constant_without_blending() {
        let projector = GrowthProjector::new(ProjectorConfig {
            blend_long_term: false,
            horizon_years: 3,
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, Some(0.30)), 2026).unwrap();
        assert_path(&projection.path, &[2.0, 2.5, 3.125]);
    }

    #[test]
    fn test_constant_growth_is_clamped() {
        let projector = GrowthProjector::new(ProjectorConfig {
            horizon_years: 3,
            ..Default::default()
        });
        let projection = projector.project(&estimates(0.1, 1.0, None), 2026).unwrap();
        assert_relative_eq!(projection.detail.applied_growth.unwrap(), 3.0);
        assert_path(&projection.path, &[0.1, 1.0, 4.0]);
    }

    #[test]
    fn test_glide_to_configured_terminal() {
        let projector = GrowthProjector::new(ProjectorConfig {
            mode: ProjectionMode::Glide,
            blend_long_term: false,
            terminal_growth: Some(0.10),
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, Some(0.30)), 2026).unwrap();
        assert_path(&projection.path, &[2.0, 2.5, 3.0, 3.45, 3.795]);
        assert_relative_eq!(projection.detail.terminal_growth.unwrap(), 0.10);
    }

    #[test]
    fn test_glide_terminal_priority() {
        let glide = |terminal_growth, blend_long_term| {
            GrowthProjector::new(ProjectorConfig {
                mode: ProjectionMode::Glide,
                terminal_growth,
                blend_long_term,
                ..Default::default()
            })
            .project(&estimates(2.0, 2.5, Some(0.30)), 2026)
            .unwrap()
            .detail
            .terminal_growth
            .unwrap()
        };

        // Long-term estimate wins when blending.
        assert_relative_eq!(glide(Some(0.10), true), 0.30);
        // Otherwise the configured terminal growth.
        assert_relative_eq!(glide(Some(0.10), false), 0.10);
        // Otherwise a capped share of near-term growth.
        assert_relative_eq!(glide(None, false), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_glide_derived_terminal_is_capped() {
        let projector = GrowthProjector::new(ProjectorConfig {
            mode: ProjectionMode::Glide,
            terminal_growth: None,
            ..Default::default()
        });
        let projection = projector.project(&estimates(1.0, 2.0, None), 2026).unwrap();
        assert_relative_eq!(projection.detail.terminal_growth.unwrap(), 0.25);
    }

    #[rstest]
    #[case(ProjectionMode::Constant, 0)]
    #[case(ProjectionMode::Constant, 1)]
    #[case(ProjectionMode::Glide, 1)]
    #[case(ProjectionMode::Glide, 2)]
    fn test_short_horizon_keeps_given_points(#[case] mode: ProjectionMode, #[case] horizon: usize) {
        let projector = GrowthProjector::new(ProjectorConfig {
            mode,
            horizon_years: horizon,
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, None), 2026).unwrap();
        assert_path(&projection.path, &[2.0, 2.5]);
    }

    #[test]
    fn test_glide_single_remaining_step_lands_on_terminal() {
        let projector = GrowthProjector::new(ProjectorConfig {
            mode: ProjectionMode::Glide,
            horizon_years: 3,
            blend_long_term: false,
            terminal_growth: Some(0.10),
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, None), 2026).unwrap();
        assert_path(&projection.path, &[2.0, 2.5, 2.75]);
    }

    #[test]
    fn test_glide_interpolates_from_unclamped_near_term_growth() {
        // g1 = 5.0 lies above the cap; only each glided rate is clamped.
        let projector = GrowthProjector::new(ProjectorConfig {
            mode: ProjectionMode::Glide,
            ..Default::default()
        });
        let projection = projector.project(&estimates(0.5, 3.0, None), 2026).unwrap();
        assert_relative_eq!(projection.detail.near_term_growth.unwrap(), 5.0);
        assert_path(&projection.path, &[0.5, 3.0, 12.0, 33.76, 41.1872]);
    }

    #[test]
    fn test_glide_from_deep_decline() {
        // g1 = -0.95 lies below the floor; the midpoint rate is -0.425.
        let projector = GrowthProjector::new(ProjectorConfig {
            mode: ProjectionMode::Glide,
            horizon_years: 4,
            blend_long_term: false,
            terminal_growth: Some(0.10),
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 0.1, None), 2026).unwrap();
        assert_path(&projection.path, &[2.0, 0.1, 0.0575, 0.06325]);
    }

    #[test]
    fn test_base_year_overflow_yields_no_path() {
        let projector = GrowthProjector::default();
        assert!(projector.project(&estimates(2.0, 2.5, None), FiscalYear::MAX - 1).is_none());

        let short = GrowthProjector::new(ProjectorConfig {
            horizon_years: 2,
            ..Default::default()
        });
        let projection = short.project(&estimates(2.0, 2.5, None), FiscalYear::MAX - 1).unwrap();
        assert_eq!(projection.path.years(), vec![FiscalYear::MAX - 1, FiscalYear::MAX]);
    }

    #[test]
    fn test_horizon_is_capped() {
        let projector = GrowthProjector::new(ProjectorConfig {
            horizon_years: usize::MAX,
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, None), 2026).unwrap();
        assert_eq!(projection.path.len(), MAX_HORIZON_YEARS);
    }

    #[test]
    fn test_missing_estimates_yield_no_path() {
        let projector = GrowthProjector::default();
        let mut set = estimates(2.0, 2.5, None);
        set.next_year_eps = None;
        assert!(projector.project(&set, 2026).is_none());

        let mut set = estimates(2.0, 2.5, None);
        set.current_year_eps = None;
        assert!(projector.project(&set, 2026).is_none());
    }

    #[test]
    fn test_zero_current_eps_means_zero_near_term_growth() {
        let projection = GrowthProjector::default()
            .project(&estimates(0.0, 1.0, None), 2026)
            .unwrap();
        assert_relative_eq!(projection.detail.near_term_growth.unwrap(), 0.0);
        assert_path(&projection.path, &[0.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_manual_path_is_used_verbatim() {
        let manual: EpsPath = "2027:2.5,2026:2.0,2028:2.8".parse().unwrap();
        let projector = GrowthProjector::new(ProjectorConfig {
            manual_path: Some(manual.clone()),
            ..Default::default()
        });
        let projection = projector.project(&ForwardEstimateSet::default(), 2030).unwrap();
        assert_eq!(projection.path, manual);
        assert!(projection.detail.manual);
        assert_eq!(projection.detail.base_year, 2026);
    }

    #[test]
    fn test_forced_years_filter() {
        let projector = GrowthProjector::new(ProjectorConfig {
            forced_years: Some("2027 - 2028".parse().unwrap()),
            ..Default::default()
        });
        let projection = projector.project(&estimates(2.0, 2.5, Some(0.30)), 2026).unwrap();
        assert_eq!(projection.path.years(), vec![2027, 2028]);
        assert_path(&projection.path, &[2.5, 3.175]);

        let disjoint = GrowthProjector::new(ProjectorConfig {
            forced_years: Some(YearRange::new(2040, 2045).unwrap()),
            ..Default::default()
        });
        assert!(disjoint.project(&estimates(2.0, 2.5, None), 2026).is_none());
    }

    #[test]
    fn test_resolve_base_year() {
        let mut set = ForwardEstimateSet::default();
        assert_eq!(resolve_base_year(None, &set, 2026), 2026);
        set.fiscal_base_year = Some(2025);
        assert_eq!(resolve_base_year(None, &set, 2026), 2025);
        assert_eq!(resolve_base_year(Some(2030), &set, 2026), 2030);
    }
}
