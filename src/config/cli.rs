use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line flags. Each one can also come from the environment.
#[derive(Debug, Clone, Parser, Default)]
#[command(name = "token-renewer", author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the identity service; `/token/renew` is appended
    #[arg(long, env = "TOKEN_RENEWER_URL")]
    pub url: Option<String>,

    /// Token literal or path to a file containing it
    #[arg(long, env = "TOKEN_RENEWER_TOKEN")]
    pub token: Option<String>,

    /// Output file for the access token; not written when absent
    #[arg(long, env = "TOKEN_RENEWER_OUT")]
    pub out: Option<String>,

    /// Directory of PEM root CAs; downloaded into ~/.certificates when absent
    #[arg(long = "root-cas", alias = "rootCAs", env = "TOKEN_RENEWER_ROOT_CAS")]
    pub root_cas: Option<String>,

    /// Seconds between renewals; 0 runs once
    #[arg(long, env = "TOKEN_RENEWER_INTERVAL")]
    pub interval: Option<u64>,

    /// 0 silent, 1 request dump, 2 response dump, 3 trust-store tracing
    #[arg(long, env = "TOKEN_RENEWER_VERBOSE")]
    pub verbose: Option<u8>,

    /// Refuse to run with TLS verification disabled
    #[arg(long, env = "TOKEN_RENEWER_REQUIRE_CA")]
    pub require_ca: bool,

    /// Optional YAML configuration file
    #[arg(short, long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}
