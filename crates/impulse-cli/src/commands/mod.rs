//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Analysis commands (analyze, summary, insights)
//! - `config` - Effective configuration display
//! - `serve` - Web server command
//!
//! Shared utilities for loading inputs live here.

pub mod analyze;
pub mod config;
pub mod serve;

// Re-export command functions for main.rs
pub use analyze::*;
pub use config::*;
pub use serve::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use impulse_core::{import, AnalysisConfig, BehaviorAnalyzer, Transaction};
use serde::Serialize;
use tracing::debug;

/// Build an analyzer from the resolved configuration
pub fn load_analyzer(config_path: Option<&Path>) -> Result<BehaviorAnalyzer> {
    let (config, source) =
        AnalysisConfig::load(config_path).context("Failed to load analysis config")?;
    debug!(source = %source, "Using analysis config");
    Ok(BehaviorAnalyzer::new(config))
}

/// Read transactions from a file, choosing the format by extension
///
/// `.json` files hold an array of transaction records; anything else is
/// parsed as CSV.
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        import::parse_json(BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON transactions in {}", path.display()))
    } else {
        let content =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        import::parse_csv_bytes(&content)
            .with_context(|| format!("Failed to parse CSV transactions in {}", path.display()))
    }
}

/// Serialize command output as JSON
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
