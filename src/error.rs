//! Centralized error types for mail2es.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mail2es library.
///
/// `UnsupportedCharset` and `TransferDecoding` concern a single part; the
/// walker logs them and keeps going.
#[derive(Error, Debug)]
pub enum Mail2EsError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("Mail file not found: {0}")]
    FileNotFound(PathBuf),

    /// The input could not be turned into a message.
    #[error("Cannot parse message: {0}")]
    Unparsable(String),

    /// The input exceeds the configured size limit.
    #[error("Message is larger than the {limit} byte limit")]
    MessageTooLarge { limit: usize },

    /// The character encoding is not supported.
    #[error("Charset conversion is not possible from {0} to UTF-8")]
    UnsupportedCharset(String),

    /// A content-transfer decoding error.
    #[error("Content-transfer decoding error: {0}")]
    TransferDecoding(String),

    /// Serializing the document failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, Mail2EsError>`.
pub type Result<T> = std::result::Result<T, Mail2EsError>;

impl Mail2EsError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
