//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI arguments.
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Impulse - Spot the habits behind your spending
#[derive(Parser)]
#[command(name = "impulse")]
#[command(about = "Behavioral spending analysis for transaction exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (defaults to the user override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect binge patterns and temporal triggers
    Analyze {
        /// Transactions file (.json array, anything else is read as CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Include insights and proposed challenges
        #[arg(long)]
        full: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print reporting counts for a transactions file
    Summary {
        /// Transactions file (.json array, anything else is read as CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show insights and proposed challenges
    Insights {
        /// Transactions file (.json array, anything else is read as CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the effective analysis configuration
    Config,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
