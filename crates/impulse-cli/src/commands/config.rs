//! Configuration display command

use std::path::Path;

use anyhow::{Context, Result};
use impulse_core::{default_config_path, AnalysisConfig};

/// Effective configuration as TOML with a header naming its source
pub fn config_report(config_path: Option<&Path>) -> Result<String> {
    let (config, source) =
        AnalysisConfig::load(config_path).context("Failed to load analysis config")?;
    let toml = config.to_toml().context("Failed to render config")?;
    Ok(format!("# Source: {}\n{}", source, toml))
}

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    print!("{}", config_report(config_path)?);

    if config_path.is_none() {
        if let Some(path) = default_config_path() {
            if !path.exists() {
                eprintln!();
                eprintln!("💡 Tip: Save overrides to {}", path.display());
            }
        }
    }
    Ok(())
}
