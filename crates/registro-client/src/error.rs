//! Error types for backend requests.

use thiserror::Error;

/// Errors returned by [`crate::RecordsApi`] and [`crate::ExportSink`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection, TLS, timeout.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// Writing an exported file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
