//! Error types for Cutroom.

use thiserror::Error;

/// Main error type for Cutroom operations.
///
/// Seek and decode failures are local to a single frame request: the
/// timeline engine treats them as "layer absent" and keeps rendering.
/// Source-open failures are surfaced once, when a clip is registered.
#[derive(Error, Debug)]
pub enum CutroomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open source: {0}")]
    SourceOpen(String),

    #[error("Seek error: {0}")]
    Seek(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Timeline error: {0}")]
    Timeline(String),
}

/// Result type alias for Cutroom operations.
pub type Result<T> = std::result::Result<T, CutroomError>;
