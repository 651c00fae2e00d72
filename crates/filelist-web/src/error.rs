//! Error types for filelist-web

/// Result type for web adapter operations
pub type Result<T> = std::result::Result<T, WebError>;

/// Errors that can occur while serving
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The client sent something that is not a parseable HTTP request
    #[error("Malformed request: {0}")]
    BadRequest(String),
}
