use std::{fs, path::{Path, PathBuf}};
use std::time::Duration;
use crate::config::cli::Args;
use crate::config::settings::{default_ca_urls, FileConfig, LoggingConfig, Settings};
use crate::config::verbosity::Verbosity;
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error};

/// Load a YAML config file, expanding `${VAR}` and `${VAR:default}` first.
pub fn file_to_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config file '{}'", path.display()))?;
    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    let file_config: FileConfig = serde_yaml::from_str(content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
        })?;
    Ok(file_config)
}

/// Merge CLI flags over the file config and apply defaults.
pub fn resolve(args: &Args, file: FileConfig) -> Settings {
    debug!("resolving settings ...");
    let interval = args.interval.or(file.interval).unwrap_or(0);
    let verbosity = args
        .verbose
        .map(Verbosity)
        .or(file.verbose)
        .unwrap_or_default();

    let mut logging = file.logging.unwrap_or_default();
    if let Some(level) = args.log_level {
        logging = LoggingConfig::new(Some(level.as_str().to_owned()), logging.format);
    }

    Settings {
        url: args.url.clone().or(file.url).unwrap_or_default(),
        token: args.token.clone().or(file.token).unwrap_or_default(),
        out: args.out.clone().map(PathBuf::from).or(file.out).filter(|p| !p.as_os_str().is_empty()),
        root_cas: args.root_cas.clone().map(PathBuf::from).or(file.root_cas).filter(|p| !p.as_os_str().is_empty()),
        interval: (interval > 0).then(|| Duration::from_secs(interval)),
        verbosity,
        require_ca: args.require_ca || file.require_ca.unwrap_or(false),
        ca_urls: file.ca_urls.unwrap_or_else(default_ca_urls),
        logging,
        metrics: file.metrics.unwrap_or_default(),
    }
}

pub fn expand_env_vars(input: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("env var pattern is valid")
    });
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
