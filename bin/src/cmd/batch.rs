//! Batch command implementation.

use crate::{args::EngineArgs, source::Source};
use anyhow::{Result, bail};
use ronda::Engine;

/// Score many symbols, reporting failures per symbol without stopping.
pub(crate) async fn score_batch(
    symbols: &[String],
    engine_args: &EngineArgs,
    concurrency: usize,
    json: bool,
) -> Result<()> {
    if symbols.is_empty() {
        bail!("no symbols given");
    }
    let config = engine_args.to_config()?;
    let source = Source::select(engine_args.snapshot_dir.as_ref())?;
    let engine = Engine::new(source.clone(), source, config)?;

    let results = engine.compute_batch(symbols, concurrency).await;
    let failures = results.iter().filter(|(_, r)| r.is_err()).count();

    if json {
        let rows: Vec<_> = results
            .iter()
            .map(|(symbol, result)| match result {
                Ok(report) => serde_json::to_value(report).unwrap_or_default(),
                Err(e) => serde_json::json!({ "symbol": symbol, "error": e.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "\n{:<10} {:>10} {:>10} {:>10} {:>8} {:>10} {:>8}",
            "Symbol", "Momentum", "Forward", "CAGR", "Rev", "Final", "Fwd P/E"
        );
        println!("{}", "─".repeat(72));
        for (symbol, result) in &results {
            match result {
                Ok(report) => {
                    let c = &report.composite;
                    println!(
                        "{:<10} {:>10} {:>10} {:>10} {:>8.2} {:>10} {:>8}",
                        report.symbol,
                        cell(c.momentum_pct),
                        cell(c.forward_growth_arith_pct),
                        cell(c.forward_growth_cagr_pct),
                        c.revision_adj_pct,
                        cell(c.final_pct),
                        cell(report.forward_pe),
                    );
                }
                Err(e) => println!("{symbol:<10} error: {e}"),
            }
        }
        println!();
        println!("{} scored, {} failed", results.len() - failures, failures);
    }

    Ok(())
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
