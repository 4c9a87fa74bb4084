//! Server command implementation

use std::path::Path;

use anyhow::Result;
use impulse_server::ServerConfig;

pub async fn cmd_serve(config_path: Option<&Path>, host: &str, port: u16) -> Result<()> {
    // --config wins over IMPULSE_CONFIG
    let (config, source) = ServerConfig::from_env(config_path)?;

    println!("🚀 Starting Impulse web server...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Analysis config: {}", source);
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            impulse_server::ORIGINS_ENV
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    impulse_server::serve_with_config(host, port, config).await?;

    Ok(())
}
