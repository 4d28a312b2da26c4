//! Component registry for discovering the sub-scores behind the metric.
//!
//! This module provides metadata for every figure that appears on a metric
//! report, so front ends can list and explain them.

use serde::{Deserialize, Serialize};

/// Component category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentCategory {
    /// Earnings surprise momentum
    Surprise,
    /// Forward EPS growth
    Growth,
    /// Analyst revision breadth
    Revisions,
    /// Weighted blend of the other components
    Composite,
}

impl ComponentCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Surprise => "Recent quarterly EPS beats and misses against consensus",
            Self::Growth => "Growth implied by the projected forward EPS path",
            Self::Revisions => "Direction of recent analyst estimate changes",
            Self::Composite => "Weighted combination of the component scores",
        }
    }
}

/// Metadata about a component score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Unique identifier for the component
    pub name: &'static str,

    /// Category classification
    pub category: ComponentCategory,

    /// Human-readable description
    pub description: &'static str,

    /// Unit of the reported value
    pub unit: &'static str,

    /// Whether the value can be undefined for lack of data
    pub optional: bool,
}

/// Get information about all components.
#[must_use]
pub fn available_components() -> Vec<ComponentInfo> {
    vec![
        ComponentInfo {
            name: "surprise_momentum_sum",
            category: ComponentCategory::Surprise,
            description: "Sum of the last four winsorized quarterly surprises",
            unit: "percent",
            optional: true,
        },
        ComponentInfo {
            name: "surprise_momentum_ewma",
            category: ComponentCategory::Surprise,
            description: "Half-life weighted mean of up to four recent surprises",
            unit: "percent",
            optional: true,
        },
        ComponentInfo {
            name: "forward_growth_arith",
            category: ComponentCategory::Growth,
            description: "Mean year-over-year growth along the forward EPS path",
            unit: "percent",
            optional: true,
        },
        ComponentInfo {
            name: "forward_growth_cagr",
            category: ComponentCategory::Growth,
            description: "Compound annual growth from first to last path year",
            unit: "percent",
            optional: true,
        },
        ComponentInfo {
            name: "revision_breadth",
            category: ComponentCategory::Revisions,
            description: "30-day net upgrades over total revisions, scaled and capped",
            unit: "points",
            optional: false,
        },
        ComponentInfo {
            name: "final_metric",
            category: ComponentCategory::Composite,
            description: "Weighted blend of momentum, forward growth and revisions",
            unit: "percent",
            optional: true,
        },
    ]
}

/// Get all components in a specific category.
#[must_use]
pub fn components_by_category(category: &ComponentCategory) -> Vec<ComponentInfo> {
    available_components()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific component by name.
#[must_use]
pub fn get_component_info(name: &str) -> Option<ComponentInfo> {
    available_components()
        .into_iter()
        .find(|info| info.name == name)
}

/// Get all categories that have components.
#[must_use]
pub fn available_categories() -> Vec<ComponentCategory> {
    let mut categories: Vec<_> = available_components()
        .into_iter()
        .map(|info| info.category)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_components() {
        let components = available_components();
        assert_eq!(components.len(), 6);

        let mut names: Vec<_> = components.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_components_by_category() {
        assert_eq!(components_by_category(&ComponentCategory::Surprise).len(), 2);
        assert_eq!(components_by_category(&ComponentCategory::Growth).len(), 2);
        assert_eq!(components_by_category(&ComponentCategory::Revisions).len(), 1);
        assert_eq!(components_by_category(&ComponentCategory::Composite).len(), 1);
    }

    #[test]
    fn test_get_component_info() {
        let info = get_component_info("revision_breadth").unwrap();
        assert_eq!(info.category, ComponentCategory::Revisions);
        assert!(!info.optional);

        assert!(get_component_info("nonexistent_component").is_none());
    }

    #[test]
    fn test_available_categories() {
        let categories = available_categories();
        assert_eq!(
            categories,
            vec![
                ComponentCategory::Surprise,
                ComponentCategory::Growth,
                ComponentCategory::Revisions,
                ComponentCategory::Composite,
            ]
        );
        for category in categories {
            assert!(!category.description().is_empty());
        }
    }
}
