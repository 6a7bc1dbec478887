use thiserror::Error;

/// Errors raised by a key-value store backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create storage directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by the game orchestrator.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("no tables selected")]
    NoTables,
    #[error("question count must be positive")]
    NoQuestions,
    #[error("time limit must be positive")]
    NoTime,
    #[error("game already finished")]
    Finished,
}
