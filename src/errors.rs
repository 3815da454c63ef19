use thiserror::Error;

use crate::storage::StorageError;

/// Represents errors that can occur while preparing slide content or talking to the QuickSlide backend.
#[derive(Error, Debug)]
pub enum QuickSlideError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Error occurred while encoding or decoding JSON (layouts, form data, API payloads).
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error reported by the backend itself (4xx or 5xx status code other than 401/403).
    #[error("API returned an error: Status {status}, Message: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The backend rejected the stored token (401 or 403). The token has already been cleared.
    #[error("Session expired (status {status}), please log in again")]
    SessionExpired { status: reqwest::StatusCode },

    /// The content has no non-empty line that could serve as the slide title.
    #[error("The first line of the content must contain a title")]
    MissingTitle,

    /// Generation was requested without any uploaded row or selection.
    #[error("Nothing to generate: {0}")]
    EmptySelection(String),

    /// An error indicating invalid input was provided to a client function.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persistent wizard storage failed and no fallback could absorb it.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An error related to reading environment variables.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// An I/O error occurred, often related to reading an upload from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type alias for `Result<T, QuickSlideError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, QuickSlideError>;
