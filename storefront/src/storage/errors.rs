use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Storage error: {0}")]
    Other(String),
}
