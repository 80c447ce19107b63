use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity stored in the session after login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Server-side session record, one per session cookie.
///
/// Holds the authenticated user (or none), the one-shot flash queues, and
/// the per-session CSRF secret the tokens are derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user: Option<SessionUser>,
    pub success_messages: Vec<String>,
    pub error_messages: Vec<String>,
    pub(crate) csrf_secret: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub ttl: u64,
}

impl SessionRecord {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
