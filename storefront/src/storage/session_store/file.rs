use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{FileSessionStore, SessionStore, validate_session_id};

/// On-disk envelope: the serialized record plus the store-level expiry.
#[derive(Debug, Serialize, Deserialize)]
struct FileRecord {
    value: String,
    expires_at: DateTime<Utc>,
}

impl FileSessionStore {
    pub(crate) fn new<P: AsRef<Path>>(dir: P) -> Self {
        tracing::info!(
            "Creating file session store at {}",
            dir.as_ref().display()
        );
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }

    async fn put(&mut self, id: &str, value: CacheData, ttl: u64) -> Result<(), StorageError> {
        validate_session_id(id)?;
        let record = FileRecord {
            value: value.value,
            expires_at: Utc::now() + Duration::seconds(ttl as i64),
        };
        let json =
            serde_json::to_string(&record).map_err(|e| StorageError::Serde(e.to_string()))?;
        tokio::fs::write(self.path_for(id), json)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<CacheData>, StorageError> {
        validate_session_id(id)?;
        let path = self.path_for(id);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        let record: FileRecord =
            serde_json::from_str(&json).map_err(|e| StorageError::Serde(e.to_string()))?;
        if record.expires_at < Utc::now() {
            tracing::debug!("Session file {} expired, removing", path.display());
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove expired session file: {}", e);
            }
            return Ok(None);
        }
        Ok(Some(CacheData {
            value: record.value,
        }))
    }

    async fn remove(&mut self, id: &str) -> Result<(), StorageError> {
        validate_session_id(id)?;
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
