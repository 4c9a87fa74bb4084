//! Impulse CLI - Behavioral spending analysis
//!
//! Usage:
//!   impulse analyze --file tx.csv --full   Detect patterns and triggers
//!   impulse summary --file tx.json         Print reporting counts
//!   impulse insights --file tx.csv         Human-readable insight report
//!   impulse config                         Show effective thresholds
//!   impulse serve --port 3000              Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze { file, full, pretty } => {
            commands::cmd_analyze(config_path, &file, full, pretty)
        }
        Commands::Summary { file, pretty } => commands::cmd_summary(config_path, &file, pretty),
        Commands::Insights { file } => commands::cmd_insights(config_path, &file),
        Commands::Config => commands::cmd_config(config_path),
        Commands::Serve { port, host } => commands::cmd_serve(config_path, &host, port).await,
    }
}
