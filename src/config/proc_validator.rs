//! Settings validation with aggregated errors.

use tracing::{error, info};

use crate::config::settings::Settings;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let url = settings.url.trim();
    if url.is_empty() {
        errors.push("url cannot be empty".to_string());
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("url '{}' must start with 'http://' or 'https://'", url));
    }

    if settings.token.trim().is_empty() {
        errors.push("token cannot be empty; pass a literal token or a path to a token file".to_string());
    }

    if !settings.metrics.path.starts_with('/') {
        errors.push(format!(
            "metrics.path '{}' must start with '/'",
            settings.metrics.path
        ));
    }

    if settings.root_cas.is_none() && settings.ca_urls.is_empty() {
        errors.push("ca_urls cannot be empty when root_cas is not provided".to_string());
    }

    if let Some(level) = &settings.logging.level {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            errors.push(format!(
                "logging.level '{}' invalid; allowed: {:?}",
                level, LOG_LEVELS
            ));
        }
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}
