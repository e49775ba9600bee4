use anyhow::{anyhow, Result};

use crate::config::cli::Args;
use crate::config::proc_loader::{file_to_config, resolve};
use crate::config::proc_validator::validate_settings;
use crate::config::settings::{FileConfig, Settings};

/// Build validated settings from CLI flags and the optional config file.
pub fn run(args: &Args) -> Result<Settings> {
    let file_config = match &args.config {
        Some(path) => file_to_config(path).map_err(|e| anyhow!("Invalid config format: {:#}", e))?,
        None => FileConfig::default(),
    };
    let settings = resolve(args, file_config);
    validate_settings(&settings).map_err(|errors| {
        anyhow!(
            "config is not valid, total errors: {}\n{}",
            errors.len(),
            errors.join("\n")
        )
    })?;
    Ok(settings)
}
