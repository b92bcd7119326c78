//! Error types for MARC export operations.
//!
//! This module provides the [`ExportError`] type for the export engine and
//! the [`Result`] convenience type.
//!
//! Problems with a single item of an archival record (an unresolved subject,
//! an unmapped note type, a note with no text) are not errors: the item is
//! skipped. The variants below cover programmer and configuration mistakes and
//! serialization failures.

use thiserror::Error;

/// Error type for all export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A binding table does not match the handler it binds.
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error while serializing a finished record.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Malformed configuration or label data.
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;
