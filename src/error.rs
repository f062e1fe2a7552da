use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection or transfer failure while talking to the hosting API
    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("HTTP request failed with status: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("{}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The downloaded file is not a zip archive we can read
    #[error("{0}")]
    Archive(String),
}

impl Error {
    pub fn archive<S: Into<String>>(message: S) -> Self {
        Error::Archive(message.into())
    }

    pub fn filesystem(path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether this failure came from the network side of a download.
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::HttpStatus(_))
    }
}
