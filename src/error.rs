// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a [`Browser`](crate::browser::Browser) implementation.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("timeout loading {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("selector not found: {selector}")]
    SelectorNotFound { selector: String },

    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("no form on page {url}")]
    NoForm { url: String },

    #[error("no page loaded")]
    NoPage,
}

impl BrowserError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout { .. })
    }
}

/// Top-level error for a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    /// A record's key set differs from the first record's.
    #[error("record {row} does not match the header: {reason}")]
    SchemaMismatch { row: usize, reason: String },
}

impl ScrapeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::Io { path: path.into(), source }
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;
