use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};

use crate::observability::metrics::get_metrics;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("unable to write token to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Replace the content of `path` with exactly `token`.
///
/// The token goes to `<path>.tmp` with owner-only permissions first and is
/// then renamed over `path`, so readers never observe a partial write.
pub async fn write_token(path: &Path, token: &str) -> Result<(), SinkError> {
    let metrics = get_metrics();
    let start = Instant::now();
    let result = write_atomic(path, token).await.map_err(|source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    });
    match &result {
        Ok(_) => {
            metrics.sink_writes.inc();
            info!("access token written to '{}'", path.display());
            debug!("sink file: write took {:?}", start.elapsed());
        }
        Err(err) => {
            metrics.sink_failures.inc();
            error!("{}", err);
        }
    }
    result
}

async fn write_atomic(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, token.as_bytes()).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
    }
    fs::rename(&tmp, path).await
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
