use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

pub(crate) struct InMemorySessionStore {
    pub(super) entry: HashMap<String, CacheData>,
}

pub(crate) struct FileSessionStore {
    pub(super) dir: PathBuf,
}

// Trait
#[async_trait]
pub(crate) trait SessionStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a session record into the store with a TTL in seconds.
    async fn put(&mut self, id: &str, value: CacheData, ttl: u64) -> Result<(), StorageError>;

    /// Get a session record from the store. Expired records read as absent.
    async fn get(&self, id: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a session record from the store.
    async fn remove(&mut self, id: &str) -> Result<(), StorageError>;
}

/// Session ids end up as file names in the file backend, so anything that is
/// not URL-safe base64 is rejected before it reaches the filesystem.
pub(super) fn validate_session_id(id: &str) -> Result<(), StorageError> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidSessionId(id.to_string()));
    }
    Ok(())
}
