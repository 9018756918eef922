use thiserror::Error;

/// Process-level failures during startup and shutdown
///
/// Request-level failures use [`shared::AppError`]; this type covers
/// what happens outside a request.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for server plumbing
pub type Result<T> = std::result::Result<T, ServerError>;
