//! Batch driver: retrieves every configured (site, year, level) combination,
//! one year batch at a time, logging to the configured file.

use anyhow::Context;
use era5_retrieval::{init_logging, Era5, RetrievalConfig};
use log::info;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "ERA5_RETRIEVAL_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "era5-retrieval.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if !config_path.exists() {
        RetrievalConfig::write_template(&config_path)
            .with_context(|| format!("writing config template to {}", config_path.display()))?;
        println!(
            "Wrote a config template to {}. Fill in archive_key and re-run.",
            config_path.display()
        );
        return Ok(());
    }

    let config = RetrievalConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    init_logging(config.log_file.as_deref()).context("installing logger")?;

    info!(
        "starting batch: years {}-{}, levels {:?}, data dir {}",
        config.first_year,
        config.last_year,
        config.levels,
        config.data_dir.display()
    );

    let era5 = Era5::new(config).await?;
    let summary = era5.fetch_all().await;
    println!("{summary}");

    Ok(())
}
