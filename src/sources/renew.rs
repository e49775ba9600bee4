//! Renewal client
//!
//! Exchanges the current token for a new `TokenRecord` with one authenticated GET.

use http::header::{HeaderMap, ACCEPT, AUTHORIZATION};
use http::StatusCode;
use reqwest::{Client, Request};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::verbosity::Verbosity;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::tls::trust_store::TrustMode;
use crate::token::reader::{read_token, TokenError};
use crate::token::record::TokenRecord;
use crate::utils::constants::RENEW_PATH;

static SUCCESS_MSG: &str = "success";
static ERROR_MSG: &str = "error";

#[derive(Debug, Error)]
pub enum RenewError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("unable to build renewal request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unable to make HTTP request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unable to read renewal response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("renewal endpoint answered {status}")]
    Status { status: StatusCode, body: String },
    #[error("unable to decode token record: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl RenewError {
    /// Label used for the failure counter.
    pub fn reason(&self) -> &'static str {
        match self {
            RenewError::Token(_) => "token",
            RenewError::Client(_) => "client",
            RenewError::Request(_) => "request",
            RenewError::Transport(_) => "transport",
            RenewError::Body(_) => "body",
            RenewError::Status { .. } => "status",
            RenewError::Decode { .. } => "decode",
        }
    }
}

/// Base URL with the renewal path appended.
pub fn renewal_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), RENEW_PATH)
}

#[derive(Debug, Clone)]
pub struct Renewer {
    client: Client,
    url: String,
    verbosity: Verbosity,
}

impl Renewer {
    /// Build the client from `trust`. A client that cannot be built with the
    /// custom trust material falls back to the default client and its
    /// built-in roots, never to insecure mode.
    pub fn new(url: String, trust: &TrustMode, verbosity: Verbosity) -> Result<Self, RenewError> {
        let client = match trust.build_client() {
            Ok(client) => client,
            Err(err) => {
                warn!("unable to build transport from root CAs, using default client: {}", err);
                get_metrics().transport_fallbacks.inc();
                Client::builder().build().map_err(RenewError::Client)?
            }
        };
        Ok(Self::with_client(client, url, verbosity))
    }

    pub fn with_client(client: Client, url: String, verbosity: Verbosity) -> Self {
        Self { client, url, verbosity }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one renewal with a token literal or token file path.
    pub async fn renew(&self, token_or_path: &str) -> Result<TokenRecord, RenewError> {
        let metrics = get_metrics();
        let start = get_instant();
        let result = self.exchange(token_or_path).await;
        match &result {
            Ok(_) => {
                metrics.renewals.inc();
                metrics.renewal_duration.with_label_values(&[SUCCESS_MSG]).observe(start.elapsed().as_secs_f64());
            }
            Err(err) => {
                metrics.renewal_failures.with_label_values(&[err.reason()]).inc();
                metrics.renewal_duration.with_label_values(&[ERROR_MSG]).observe(start.elapsed().as_secs_f64());
            }
        }
        result
    }

    async fn exchange(&self, token_or_path: &str) -> Result<TokenRecord, RenewError> {
        let token = read_token(token_or_path)?;
        if self.verbosity.traces_renewal() {
            info!("renew {}\ninput token : {}\noutput token: {}", self.url, token_or_path, token);
        }

        let request = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, "application/json")
            .build()
            .map_err(RenewError::Request)?;
        if self.verbosity.dumps_request() {
            info!("request: {}", dump_request(&request));
        }

        let response = self.client.execute(request).await.map_err(RenewError::Transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(RenewError::Body)?;
        if self.verbosity.dumps_response() {
            info!("response: {}", dump_response(status, &headers, &body));
        }

        if !status.is_success() {
            return Err(RenewError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|source| RenewError::Decode { source, body })
    }
}

fn dump_request(request: &Request) -> String {
    let mut dump = format!("{} {} {:?}\n", request.method(), request.url(), request.version());
    dump.push_str(&dump_headers(request.headers()));
    dump
}

fn dump_response(status: StatusCode, headers: &HeaderMap, body: &str) -> String {
    let mut dump = format!("{}\n", status);
    dump.push_str(&dump_headers(headers));
    dump.push('\n');
    dump.push_str(body);
    dump
}

fn dump_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}\n", name, String::from_utf8_lossy(value.as_bytes())))
        .collect()
}

#[cfg(test)]
mod test {
    use super::renewal_url;

    #[test]
    fn renewal_path_is_appended_once() {
        assert_eq!(renewal_url("https://auth.example.org"), "https://auth.example.org/token/renew");
        assert_eq!(renewal_url("https://auth.example.org/"), "https://auth.example.org/token/renew");
        assert_eq!(renewal_url("http://127.0.0.1:8080/api"), "http://127.0.0.1:8080/api/token/renew");
    }
}
