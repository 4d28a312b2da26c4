//! Ronda CLI binary.
//!
//! Provides command-line interface for the ronda forward earnings-growth metric.

mod args;
mod cmd;
mod source;

use anyhow::Result;
use args::EngineArgs;
use clap::{Parser, Subcommand};
use ronda::DEFAULT_CONCURRENCY;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Forward earnings-growth quality score", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the metric for one symbol
    Score {
        /// Ticker symbol
        symbol: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Reference value to report the final metric against
        #[arg(long, value_name = "X", allow_negative_numbers = true)]
        baseline: Option<f64>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Compute the metric for many symbols
    Batch {
        /// Ticker symbols
        #[arg(value_delimiter = ',', required = true)]
        symbols: Vec<String>,

        /// Symbols fetched at the same time
        #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// List metric components
    Components {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Commands {
    const fn debug_logging(&self) -> bool {
        match self {
            Self::Score { engine, .. } | Self::Batch { engine, .. } => engine.verbose,
            Self::Components { .. } => false,
        }
    }
}

fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.debug_logging());

    match cli.command {
        Commands::Score {
            symbol,
            json,
            baseline,
            engine,
        } => {
            cmd::score::score_symbol(&symbol, &engine, json, baseline).await?;
        }
        Commands::Batch {
            symbols,
            concurrency,
            json,
            engine,
        } => {
            cmd::batch::score_batch(&symbols, &engine, concurrency, json).await?;
        }
        Commands::Components { category, verbose } => {
            cmd::components::list_components(category, verbose)?;
        }
    }

    Ok(())
}
