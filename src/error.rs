//! Error taxonomy for extraction requests.
//!
//! Missing jobs and not-yet-ready artifacts are not errors: the store
//! returns `Option` and the HTTP layer answers 404.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Malformed post URL or missing credential field. Raised before any
    /// network activity and before a job is created.
    #[error("{0}")]
    Validation(String),

    /// The token exchange was rejected upstream.
    #[error("Failed to get access token: {message}")]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    /// The comment listing could not be fetched or decoded.
    #[error("Failed to fetch Reddit data: {0}")]
    Fetch(String),

    #[error("Job store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl ExtractError {
    pub fn validation(message: impl Into<String>) -> Self {
        ExtractError::Validation(message.into())
    }
}
