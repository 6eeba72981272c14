// AppDeck Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Permission not granted: {0}")]
    CapabilityDenied(String),

    #[error("Not supported here: {0}")]
    UnsupportedEnvironment(String),

    #[error("Not an app file: {0}")]
    ExcludedName(String),

    #[error("App not found: {0}")]
    AppNotFound(String),

    #[error("Could not open app: {0}")]
    Launch(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for DeckError {
    fn from(err: anyhow::Error) -> Self {
        DeckError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
