use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::verbosity::Verbosity;
use crate::utils::constants::{DEFAULT_CA_URLS, DEFAULT_METRICS_HOST, DEFAULT_METRICS_PATH, DEFAULT_METRICS_PORT};

/// ================================
/// YAML file configuration
/// ================================
/// Every key is optional; CLI flags take precedence.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub out: Option<PathBuf>,
    pub root_cas: Option<PathBuf>,
    pub interval: Option<u64>,
    pub verbose: Option<Verbosity>,
    pub require_ca: Option<bool>,
    pub ca_urls: Option<Vec<String>>,
    pub logging: Option<LoggingConfig>,
    pub metrics: Option<MetricsConfig>,
}

/// ================================
/// Resolved runtime settings
/// ================================
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL; the renewal path is appended.
    pub url: String,
    /// Literal token or path to a file holding one.
    pub token: String,
    pub out: Option<PathBuf>,
    /// `None` triggers the CA bootstrap into `$HOME/.certificates`.
    pub root_cas: Option<PathBuf>,
    pub interval: Option<Duration>,
    pub verbosity: Verbosity,
    pub require_ca: bool,
    pub ca_urls: Vec<String>,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default = "default_metrics_host")]
    pub host: String,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
            host: default_metrics_host(),
            port: default_metrics_port(),
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: Option<String>, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new (level: Option<String>, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(None, LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

pub fn default_ca_urls() -> Vec<String> {
    DEFAULT_CA_URLS.iter().map(|url| url.to_string()).collect()
}

fn default_metrics_path() -> String {
    DEFAULT_METRICS_PATH.to_string()
}

fn default_metrics_host() -> String {
    DEFAULT_METRICS_HOST.to_string()
}

fn default_metrics_port() -> u16 {
    DEFAULT_METRICS_PORT
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
