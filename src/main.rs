//! drilldash - Restaurant Sales Drill-Down Explorer
//!
//! Loads an orders CSV and explores revenue interactively:
//! city → product → purchase channel.

mod agg;
mod cli;
mod data;
mod nav;

use anyhow::Context;
use clap::Parser;
use cli::Session;
use data::DatasetLoader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drilldash")]
#[command(about = "Explore restaurant sales: city → product → purchase channel")]
#[command(version)]
struct Cli {
    /// Path to the orders CSV file
    data: PathBuf,

    /// Maximum rows shown per table
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let outcome = DatasetLoader::load(&cli.data)
        .with_context(|| format!("failed to load dataset from {}", cli.data.display()))?;

    Session::new(outcome, cli.top).run()
}
