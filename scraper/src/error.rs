//! Error types for the scraper library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("input configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("failed to read {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("invalid proxy '{url}'")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Retries exhausted; carries the failure from the final attempt.
    #[error("failed to fetch {url} after {attempts} attempts")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: FetchFailure,
    },

    #[error("failed to write {}", .path.display())]
    ExportIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize job records")]
    ExportJson(#[from] serde_json::Error),
}

/// Why a single HTTP attempt failed.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
}

impl ScrapeError {
    /// The error and its causes, joined with ": ".
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = std::error::Error::source(err);
        }
        message
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
