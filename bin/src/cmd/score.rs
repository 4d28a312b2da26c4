//! Score command implementation.

use crate::{args::EngineArgs, source::Source};
use anyhow::Result;
use ronda::{Engine, MetricReport};

/// Compute and print the metric for one symbol.
pub(crate) async fn score_symbol(
    symbol: &str,
    engine_args: &EngineArgs,
    json: bool,
    baseline: Option<f64>,
) -> Result<()> {
    let config = engine_args.to_config()?;
    let source = Source::select(engine_args.snapshot_dir.as_ref())?;
    let engine = Engine::new(source.clone(), source, config)?;

    let report = engine.compute(symbol).await?;

    if json {
        let mut value = serde_json::to_value(&report)?;
        if let Some(base) = baseline {
            value["baseline"] = serde_json::json!(base);
            value["delta"] = serde_json::json!(report.delta_from(base));
        }
        value["fundamentals"] = serde_json::json!(report.fundamentals());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_report(&report, baseline);
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{suffix}"))
}

/// Human-readable report.
fn print_report(report: &MetricReport, baseline: Option<f64>) {
    let c = &report.composite;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║              Forward Earnings-Growth Quality                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Symbol:      {}", report.symbol);
    println!("Base year:   {}", report.fiscal_base_year);
    println!();

    println!("{:<28} {:>12}", "Component", "Value");
    println!("{}", "─".repeat(41));
    println!("{:<28} {:>12}", report.momentum_label, fmt_opt(c.momentum_pct, "%"));
    println!("{:<28} {:>12}", "Forward growth (arith)", fmt_opt(c.forward_growth_arith_pct, "%"));
    println!("{:<28} {:>12}", "Forward growth (CAGR)", fmt_opt(c.forward_growth_cagr_pct, "%"));
    println!("{:<28} {:>12}", "Revision adjustment", format!("{:.2}", c.revision_adj_pct));
    println!("{}", "─".repeat(41));
    println!("{:<28} {:>12}", "Final metric", fmt_opt(c.final_pct, "%"));
    if let Some(base) = baseline {
        println!("{:<28} {:>12}", format!("Delta vs {base:.2}"), fmt_opt(report.delta_from(base), ""));
    }
    println!();

    println!("EPS current: {}", fmt_opt(report.eps_current, ""));
    println!("EPS next:    {}", fmt_opt(report.eps_next, ""));
    println!("EPS TTM:     {}", fmt_opt(report.eps_ttm, ""));
    println!("Price:       {}", fmt_opt(report.price, ""));
    println!("Forward P/E: {}", fmt_opt(report.forward_pe, "x"));
    println!();

    if !c.path_used.is_empty() {
        println!("EPS path:");
        for point in c.path_used.points() {
            println!("  {}  {:>10.4}", point.fiscal_year, point.eps);
        }
        println!();
    }

    if let Some(diag) = &report.diagnostics {
        println!("Surprises (newest first):");
        for ((quarter, raw), clipped) in diag
            .quarters
            .iter()
            .zip(&diag.raw_surprises_pct)
            .zip(&diag.surprises_pct)
        {
            println!("  {quarter:<12} raw {raw:>9.2}%  used {clipped:>9.2}%");
        }
        if let Some(p) = &diag.projection {
            println!(
                "Projection:  {} (manual: {}, g1: {}, applied: {}, terminal: {})",
                p.mode,
                p.manual,
                fmt_opt(p.near_term_growth, ""),
                fmt_opt(p.applied_growth, ""),
                fmt_opt(p.terminal_growth, "")
            );
        }
        for issue in &diag.issues {
            println!("Unparsed:    {} {} = {}", issue.source, issue.field, issue.raw);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(12.5), "%"), "12.50%");
        assert_eq!(fmt_opt(None, "%"), "n/a");
    }
}
