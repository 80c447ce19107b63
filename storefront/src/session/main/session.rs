use chrono::{Duration, Utc};

use crate::session::config::SESSION_COOKIE_MAX_AGE;
use crate::session::errors::SessionError;
use crate::session::types::SessionRecord;
use crate::storage::SESSION_STORE;
use crate::utils::gen_random_string;

/// Create a fresh, anonymous session record and persist it.
///
/// Matches the original application's create-on-first-response behavior:
/// every visitor gets a session whether or not they ever log in.
pub async fn create_session() -> Result<(String, SessionRecord), SessionError> {
    let session_id = gen_random_string(32)?;
    let ttl = *SESSION_COOKIE_MAX_AGE;
    let record = SessionRecord {
        user: None,
        success_messages: Vec::new(),
        error_messages: Vec::new(),
        csrf_secret: None,
        expires_at: Utc::now() + Duration::seconds(ttl as i64),
        ttl,
    };

    SESSION_STORE
        .lock()
        .await
        .put(&session_id, record.clone().into(), ttl)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    Ok((session_id, record))
}

/// Load a session record by id. Missing and expired records both read as `None`;
/// expired records are removed from the store on the way out.
pub async fn load_session(session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
    let cached = SESSION_STORE
        .lock()
        .await
        .get(session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

    let Some(cached) = cached else {
        return Ok(None);
    };

    let record: SessionRecord = match cached.try_into() {
        Ok(record) => record,
        Err(_) => return Ok(None),
    };

    if record.is_expired() {
        tracing::debug!("Session {} expired at {}", session_id, record.expires_at);
        destroy_session(session_id).await?;
        return Ok(None);
    }

    Ok(Some(record))
}

/// Remove a session from the store entirely.
pub async fn destroy_session(session_id: &str) -> Result<(), SessionError> {
    SESSION_STORE
        .lock()
        .await
        .remove(session_id)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    Ok(())
}

/// Persist a mutated session record under its existing id.
pub async fn save_session(session_id: &str, record: &SessionRecord) -> Result<(), SessionError> {
    SESSION_STORE
        .lock()
        .await
        .put(session_id, record.clone().into(), record.ttl)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;
    Ok(())
}
