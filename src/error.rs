//! Error types for pastemark.
//!
//! The converter itself is total and returns plain strings; this taxonomy
//! covers the LLM collaborator integration and configuration surface only.

use std::io;
use thiserror::Error;

/// Result type alias for pastemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pastemark.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configured server URL is not a valid http(s) URL.
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    /// No API key configured for a provider that requires one.
    #[error("API key not configured for provider: {0}")]
    MissingApiKey(String),

    /// HTTP transport or status error from the LLM server.
    #[error("LLM API error: {0}")]
    Http(String),

    /// The LLM request exceeded the configured timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The LLM server answered with an unusable payload.
    #[error("Invalid response from LLM server: {0}")]
    InvalidResponse(String),

    /// The requested model is not available on the server.
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Settings storage backend failure.
    #[error("Settings storage error: {0}")]
    Storage(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
