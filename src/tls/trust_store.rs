//! Trust store built from a directory of PEM files.
//!
//! The directory is scanned once; every file that yields at least one
//! certificate contributes its anchors. When nothing usable is found the
//! result is [`TrustMode::Insecure`], which disables peer verification.

use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use reqwest::{Certificate, Client, ClientBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::verbosity::Verbosity;
use crate::observability::metrics::get_metrics;

#[derive(Debug, Error)]
pub enum TrustError {
    #[error("root CAs area is not provided")]
    NotProvided,
    #[error("unable to list files in '{path}': {source}")]
    Unlistable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no usable root CAs found in '{path}' and insecure TLS is not allowed")]
    InsecureRefused { path: PathBuf },
}

/// One parsed trust anchor and the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    pub source: PathBuf,
    pub der: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustMode {
    /// Only the listed anchors are trusted; never empty.
    Verified(Vec<TrustAnchor>),
    /// Peer certificates are not verified.
    Insecure,
}

impl TrustMode {
    /// Scan `dir` and build the trust mode. Fails only when the directory cannot be listed.
    pub fn load(dir: &Path, verbosity: Verbosity) -> Result<TrustMode, TrustError> {
        if dir.as_os_str().is_empty() {
            return Err(TrustError::NotProvided);
        }
        let entries = fs::read_dir(dir).map_err(|source| TrustError::Unlistable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        paths.sort();

        let mut anchors = Vec::new();
        for path in paths {
            let found = match read_pem_certificates(&path) {
                Ok(found) => found,
                Err(err) => {
                    if verbosity.dumps_response() {
                        warn!("unable to read {}: {}", path.display(), err);
                    }
                    continue;
                }
            };

            let before = anchors.len();
            for der in found {
                match validate_anchor(&der) {
                    Ok(()) => anchors.push(TrustAnchor { source: path.clone(), der }),
                    Err(err) => {
                        if verbosity.traces_trust_files() {
                            warn!("skip invalid certificate in {}: {}", path.display(), err);
                        }
                    }
                }
            }
            if verbosity.traces_trust_files() {
                match anchors.len() - before {
                    0 => warn!("invalid PEM format while importing trust-chain: {}", path.display()),
                    loaded => debug!("load CA file {} ({} certificates)", path.display(), loaded),
                }
            }
        }

        let mode = if anchors.is_empty() {
            TrustMode::Insecure
        } else {
            TrustMode::Verified(anchors)
        };
        record_trust_metrics(&mode);
        Ok(mode)
    }

    /// Like [`TrustMode::load`], but an unlistable directory degrades to [`TrustMode::Insecure`].
    pub fn load_or_insecure(dir: &Path, verbosity: Verbosity) -> TrustMode {
        TrustMode::load(dir, verbosity).unwrap_or_else(|err| {
            warn!("{}", err);
            record_trust_metrics(&TrustMode::Insecure);
            TrustMode::Insecure
        })
    }

    /// Refuse [`TrustMode::Insecure`] when `require_ca` is set, otherwise keep it with a warning.
    pub fn enforce(self, dir: &Path, require_ca: bool) -> Result<TrustMode, TrustError> {
        if !self.is_insecure() {
            return Ok(self);
        }
        if require_ca {
            return Err(TrustError::InsecureRefused { path: dir.to_path_buf() });
        }
        warn!(
            "no usable root CAs in '{}', continuing with TLS verification DISABLED (use --require-ca to refuse)",
            dir.display()
        );
        Ok(self)
    }

    pub fn is_insecure(&self) -> bool {
        matches!(self, TrustMode::Insecure)
    }

    pub fn anchors(&self) -> &[TrustAnchor] {
        match self {
            TrustMode::Verified(anchors) => anchors,
            TrustMode::Insecure => &[],
        }
    }

    /// Apply this mode to a reqwest client builder.
    pub fn configure(&self, builder: ClientBuilder) -> ClientBuilder {
        match self {
            TrustMode::Verified(anchors) => anchors.iter().fold(
                builder.tls_built_in_root_certs(false),
                |builder, anchor| match Certificate::from_der(&anchor.der) {
                    Ok(cert) => builder.add_root_certificate(cert),
                    Err(err) => {
                        warn!("skip trust anchor from {}: {}", anchor.source.display(), err);
                        builder
                    }
                },
            ),
            TrustMode::Insecure => {
                warn!("TLS peer verification is DISABLED: no usable root CAs were found");
                builder.danger_accept_invalid_certs(true)
            }
        }
    }

    pub fn build_client(&self) -> reqwest::Result<Client> {
        self.configure(Client::builder()).build()
    }
}

/// DER bodies of every certificate in a PEM file or bundle.
fn read_pem_certificates(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::certs(&mut reader)
        .map(|cert| cert.map(|der| der.to_vec()))
        .collect()
}

/// Ok when the TLS stack accepts `der` as a root certificate.
fn validate_anchor(der: &[u8]) -> reqwest::Result<()> {
    let cert = Certificate::from_der(der)?;
    Client::builder()
        .tls_built_in_root_certs(false)
        .add_root_certificate(cert)
        .build()
        .map(|_| ())
}

fn record_trust_metrics(mode: &TrustMode) {
    let metrics = get_metrics();
    metrics.trust_insecure.set(i64::from(mode.is_insecure()));
    metrics.trust_anchors.set(mode.anchors().len() as i64);
}
