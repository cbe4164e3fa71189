//! Print the effective configuration.

use std::path::PathBuf;

use heatlens_common::config::{config_file_path, HeatmapConfig};

pub fn run(config: &HeatmapConfig, explicit: Option<PathBuf>) -> anyhow::Result<()> {
    let source = explicit.unwrap_or_else(config_file_path);
    if source.exists() {
        println!("# Loaded from {}", source.display());
    } else {
        println!("# Defaults ({} not found)", source.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
