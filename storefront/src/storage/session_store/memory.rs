use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{InMemorySessionStore, SessionStore, validate_session_id};

impl InMemorySessionStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self {
            entry: HashMap::new(),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put(&mut self, id: &str, value: CacheData, _ttl: u64) -> Result<(), StorageError> {
        validate_session_id(id)?;
        self.entry.insert(id.to_string(), value);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<CacheData>, StorageError> {
        validate_session_id(id)?;
        Ok(self.entry.get(id).cloned())
    }

    async fn remove(&mut self, id: &str) -> Result<(), StorageError> {
        validate_session_id(id)?;
        self.entry.remove(id);
        Ok(())
    }
}
