use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("unable to read token from file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolve a token given either as a path to a file or as the literal value.
///
/// An existing path is read and every newline is stripped from its content.
/// Anything that does not name an existing path is returned unchanged.
pub fn read_token(token_or_path: &str) -> Result<String, TokenError> {
    let path = Path::new(token_or_path);
    if !path.exists() {
        return Ok(token_or_path.to_owned());
    }

    debug!("reading token from file '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|source| TokenError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.chars().filter(|c| *c != '\n' && *c != '\r').collect())
}
