use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::helpers::time::now_utc;
use crate::observability::metrics::get_metrics;
use crate::sinks::sink_file::{write_token, SinkError};
use crate::sources::renew::{RenewError, Renewer};
use crate::token::record::TokenRecord;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error(transparent)]
    Renew(#[from] RenewError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Renewal chain: each response's refresh token seeds the next renewal.
///
/// Only the most recent `TokenRecord` is kept.
#[derive(Debug)]
pub struct RenewalChain {
    renewer: Renewer,
    next_token: String,
    out: Option<PathBuf>,
    current: Option<TokenRecord>,
}

impl RenewalChain {
    pub fn new(renewer: Renewer, initial_token: String, out: Option<PathBuf>) -> Self {
        Self {
            renewer,
            next_token: initial_token,
            out,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&TokenRecord> {
        self.current.as_ref()
    }

    /// Token (literal or path) the next renewal will present.
    pub fn next_token(&self) -> &str {
        &self.next_token
    }

    /// Renew once, persist the access token and advance the chain.
    pub async fn step(&mut self) -> Result<&TokenRecord, ChainError> {
        let issued_at = now_utc();
        let record = self.renewer.renew(&self.next_token).await?;

        let access_expires_at = record.access_expires_at(issued_at);
        let refresh_expires_at = record.refresh_expires_at(issued_at);
        info!(
            "token renewed via {}, access token expires at {}, refresh token expires at {}",
            self.renewer.url(),
            access_expires_at.to_rfc3339(),
            refresh_expires_at.to_rfc3339()
        );
        let metrics = get_metrics();
        metrics.access_token_expiry_unix.set(access_expires_at.timestamp());
        metrics.refresh_token_expiry_unix.set(refresh_expires_at.timestamp());

        if let Some(out) = &self.out {
            write_token(out, &record.access_token).await?;
        }

        self.next_token = record.refresh_token.clone();
        Ok(&*self.current.insert(record))
    }

    /// Renew once, then every `interval` forever. Without an interval, return after the first renewal.
    pub async fn run(mut self, interval: Option<Duration>) -> Result<(), ChainError> {
        self.step().await?;
        let Some(interval) = interval else {
            info!("no interval configured, single renewal done");
            return Ok(());
        };
        loop {
            debug!("sleep interval {} seconds until next renewal", interval.as_secs());
            tokio::time::sleep(interval).await;
            self.step().await?;
        }
    }
}
