//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::ForecastConfig;
use tally_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    forecast: ForecastConfig,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!(
        "   Forecast: recency window {}, blend alpha {}",
        forecast.recency_window, forecast.blend_alpha
    );

    let db = open_db(db_path, no_encrypt)?;
    let config = ServerConfig::from_env(forecast);
    if !config.allowed_origins.is_empty() {
        println!("   CORS origins: {}", config.allowed_origins.join(", "));
    }

    tally_server::serve(db, host, port, config)
        .await
        .context("Server error")?;

    Ok(())
}
