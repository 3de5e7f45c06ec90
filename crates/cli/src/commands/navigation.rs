use anyhow::{Context, Result};
use site_kit_navigation::{current_year, navigation};
use std::path::PathBuf;

use super::load_config;

/// Print header and footer navigation as JSON for the site build
pub async fn run(path: PathBuf, year: Option<i32>) -> Result<()> {
    let config = load_config(&path)?;
    let nav = navigation(&config.site, year.unwrap_or_else(current_year));

    let json = serde_json::to_string_pretty(&nav).context("Failed to serialize navigation")?;
    println!("{}", json);

    Ok(())
}
