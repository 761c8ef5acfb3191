use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("download from {url} failed with status code {status}")]
    Status { url: String, status: u16 },

    #[error("download from {url} failed: {source}")]
    Transport { url: String, source: ureq::Error },

    #[error("failed to read {}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },
}

/// Where the PHP language file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Returns the whole document. Non-2xx responses are errors.
    pub fn fetch(&self) -> Result<String, FetchError> {
        match self {
            Source::Url(url) => fetch_url(url),
            Source::File(path) => std::fs::read_to_string(path).map_err(|source| {
                FetchError::File {
                    path: path.clone(),
                    source,
                }
            }),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_url(url: &str) -> Result<String, FetchError> {
    debug!(url, "downloading");
    let response = ureq::get(url).call().map_err(|err| match err {
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_owned(),
            status,
        },
        source => FetchError::Transport {
            url: url.to_owned(),
            source,
        },
    })?;
    response
        .into_body()
        .read_to_string()
        .map_err(|source| FetchError::Transport {
            url: url.to_owned(),
            source,
        })
}
