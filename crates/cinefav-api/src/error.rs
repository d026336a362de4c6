use thiserror::Error;

/// Errors from the movie API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    Url(String),

    #[error("identity error: {0}")]
    Identity(#[from] cinefav_core::error::CinefavError),
}
