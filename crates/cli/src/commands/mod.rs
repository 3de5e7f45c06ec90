pub mod check;
pub mod navigation;
pub mod serve;

use anyhow::{Context, Result};
use site_kit_core::{Config, load_site_config};
use std::path::Path;

/// Load site.toml (or defaults) and overlay the Discord secrets from the environment
pub fn load_config(path: &Path) -> Result<Config> {
    let config = load_site_config(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    Ok(config.with_process_env())
}
