use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not enough cards in deck: requested {requested}, remaining {remaining}")]
    InsufficientCards { requested: usize, remaining: usize },

    #[error("Duplicate deck id: {0}")]
    DuplicateKey(String),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Deck store is shut down")]
    EngineClosed,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeckError {
    /// True for failures of the underlying store rather than of the request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DeckError::DuckDb(_) | DeckError::Io(_) | DeckError::Storage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
