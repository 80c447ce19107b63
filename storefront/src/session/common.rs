use crate::session::{errors::SessionError, types::SessionRecord};

use crate::storage::CacheData;

impl From<SessionRecord> for CacheData {
    fn from(data: SessionRecord) -> Self {
        Self {
            value: serde_json::to_string(&data).expect("Failed to serialize SessionRecord"),
        }
    }
}

impl TryFrom<CacheData> for SessionRecord {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::Storage(e.to_string()))
    }
}
