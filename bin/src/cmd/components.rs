//! Component listing command implementation.

use anyhow::Result;
use ronda::signals::registry::{available_categories, components_by_category};

/// List the figures a report carries, optionally filtered by category.
pub(crate) fn list_components(category: Option<String>, verbose: bool) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Metric Components                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for cat in available_categories() {
        let cat_name = format!("{cat:?}");
        if let Some(ref filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));

        for component in components_by_category(&cat) {
            if verbose {
                println!(
                    "  {:25} - {} ({}{})",
                    component.name,
                    component.description,
                    component.unit,
                    if component.optional { ", may be undefined" } else { "" }
                );
            } else {
                println!("  {}", component.name);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for detailed component descriptions.\n");
    }

    Ok(())
}
