use anchorfs_types::ContentId;
use thiserror::Error;

/// Errors reported by content store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content unit {0} not found")]
    NotFound(ContentId),

    #[error("store gateway error (status {status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid store base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("store url error: {0}")]
    Url(#[from] url::ParseError),

    #[error("store wire payload error: {0}")]
    Wire(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
