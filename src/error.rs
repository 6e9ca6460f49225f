//! Error type shared by the query, backend and feature stages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Transport failure talking to the search backend, passed through as-is.
    #[error(transparent)]
    Backend(#[from] reqwest::Error),

    #[error("search backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not have the expected shape at `path`.
    #[error("unexpected response structure at {path}: {reason}")]
    Structure { path: String, reason: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    pub(crate) fn structure(path: impl Into<String>, reason: impl ToString) -> Self {
        ExtractError::Structure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
