//! One-time download of the default CA files into `$HOME/.certificates`.

use std::io;
use std::path::{Path, PathBuf};

use http::StatusCode;
use reqwest::Client;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::config::verbosity::Verbosity;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::CERTIFICATES_DIR;

static DOWNLOADED_MSG: &str = "downloaded";
static SKIPPED_MSG: &str = "skipped";
static ERROR_MSG: &str = "error";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("HOME is not set; cannot locate the certificate cache")]
    NoHome,
    #[error("unable to create '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CA url '{0}' has no file name")]
    InvalidUrl(String),
    #[error("unable to download '{url}': {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("download of '{url}' answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("unable to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory the bootstrap fills for a given home directory.
pub fn certificates_dir(home: &Path) -> PathBuf {
    home.join(CERTIFICATES_DIR)
}

/// Reads `HOME` once.
pub fn home_from_env() -> Result<PathBuf, BootstrapError> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .ok_or(BootstrapError::NoHome)
}

/// Make sure every CA in `ca_urls` is present under `<home>/.certificates`.
///
/// Files already on disk are left alone, so repeated runs only download what is missing.
pub async fn ensure_root_cas(
    home: &Path,
    ca_urls: &[String],
    client: &Client,
    verbosity: Verbosity,
) -> Result<PathBuf, BootstrapError> {
    let dir = certificates_dir(home);
    fs::create_dir_all(&dir)
        .await
        .map_err(|source| BootstrapError::CreateDir { path: dir.clone(), source })?;

    let metrics = get_metrics();
    for url in ca_urls {
        let path = dir.join(file_name(url)?);
        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!("CA file {} already present", path.display());
            metrics.ca_downloads.with_label_values(&[SKIPPED_MSG]).inc();
            continue;
        }

        if verbosity.dumps_request() {
            info!("download {}", url);
        }
        download(client, url, &path).await.inspect_err(|_| {
            metrics.ca_downloads.with_label_values(&[ERROR_MSG]).inc();
        })?;
        metrics.ca_downloads.with_label_values(&[DOWNLOADED_MSG]).inc();
    }
    Ok(dir)
}

async fn download(client: &Client, url: &str, path: &Path) -> Result<(), BootstrapError> {
    let download_err = |source| BootstrapError::Download { url: url.to_owned(), source };

    let response = client.get(url).send().await.map_err(download_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(BootstrapError::Status { url: url.to_owned(), status });
    }
    let data = response.bytes().await.map_err(download_err)?;
    fs::write(path, &data)
        .await
        .map_err(|source| BootstrapError::Write { path: path.to_path_buf(), source })
}

/// Last path segment of `url`, kept verbatim.
fn file_name(url: &str) -> Result<&str, BootstrapError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| BootstrapError::InvalidUrl(url.to_owned()))
}
