// Tabnook error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabnookError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid quote index: {0}")]
    InvalidQuoteIndex(usize),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for TabnookError {
    fn from(err: anyhow::Error) -> Self {
        TabnookError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TabnookError>;
