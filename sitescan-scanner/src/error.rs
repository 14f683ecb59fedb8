use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Result aggregator stopped before the scan finished")]
    AggregatorClosed,
}

impl ScanError {
    /// Short label used when reporting a dropped branch.
    pub fn kind(&self) -> FailureKind {
        match self {
            ScanError::Http(_) => FailureKind::Network,
            ScanError::HttpStatus { status, .. } => FailureKind::Status(*status),
            ScanError::InvalidUrl(_) => FailureKind::InvalidUrl,
            ScanError::JoinError(_) | ScanError::AggregatorClosed => FailureKind::Task,
        }
    }
}

/// Why a descendant branch produced no page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    Network,
    Status(u16),
    InvalidUrl,
    Task,
}

pub type Result<T> = std::result::Result<T, ScanError>;
