use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Redirect, Response},
};
use http::{Method, StatusCode, request::Parts};
use tokio::sync::Mutex;

use storefront::{
    SessionError, SessionRecord, SessionUser, create_session, csrf_token_for, ensure_csrf_secret,
    get_session_id_from_headers, load_session, push_error_message, push_success_message,
    take_flash_messages, verify_csrf_token,
};

use super::config::SHOP_LOGIN_URL;

/// Per-request handle on the session record.
///
/// The record is loaded (or created) once by the session stage, mutated by
/// later stages and the handler through this handle, and persisted once after
/// the inner service returns. Stages of a single request run strictly in
/// sequence; the mutex exists to satisfy `Send + Sync`, not to arbitrate
/// concurrent writers.
#[derive(Clone)]
pub struct Session {
    id: String,
    is_new: bool,
    record: Arc<Mutex<SessionRecord>>,
    dirty: Arc<AtomicBool>,
}

impl Session {
    /// Load the session named by the request cookie, or create a fresh
    /// anonymous one when the cookie is absent, stale, or expired.
    pub(crate) async fn load_or_create(headers: &http::HeaderMap) -> Result<Self, SessionError> {
        if let Some(session_id) = get_session_id_from_headers(headers)? {
            if let Some(record) = load_session(session_id).await? {
                return Ok(Self {
                    id: session_id.to_string(),
                    is_new: false,
                    record: Arc::new(Mutex::new(record)),
                    dirty: Arc::new(AtomicBool::new(false)),
                });
            }
        }

        let (id, record) = create_session().await?;
        Ok(Self {
            id,
            is_new: true,
            record: Arc::new(Mutex::new(record)),
            dirty: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn is_new(&self) -> bool {
        self.is_new
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn snapshot(&self) -> SessionRecord {
        self.record.lock().await.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.record.lock().await.user.clone()
    }

    /// Record a successful login.
    pub async fn set_user(&self, user: SessionUser) {
        self.record.lock().await.user = Some(user);
        self.mark_dirty();
    }

    /// Log the user out. The session itself stays alive so the goodbye flash
    /// survives to the next request.
    pub async fn clear_user(&self) {
        self.record.lock().await.user = None;
        self.mark_dirty();
    }

    pub async fn flash_success(&self, message: impl Into<String>) {
        push_success_message(&mut *self.record.lock().await, message);
        self.mark_dirty();
    }

    pub async fn flash_error(&self, message: impl Into<String>) {
        push_error_message(&mut *self.record.lock().await, message);
        self.mark_dirty();
    }

    /// Drain the one-shot flash queues. Draining mutates the stored record,
    /// so a non-empty drain marks the session for persistence.
    pub(crate) async fn take_flash(&self) -> (Vec<String>, Vec<String>) {
        let (success, error) = take_flash_messages(&mut *self.record.lock().await);
        if !success.is_empty() || !error.is_empty() {
            self.mark_dirty();
        }
        (success, error)
    }

    /// Derive the CSRF token for this session, generating the per-session
    /// secret on first use.
    pub async fn ensure_csrf_token(&self) -> Result<String, SessionError> {
        let mut record = self.record.lock().await;
        if ensure_csrf_secret(&mut record)? {
            self.mark_dirty();
        }
        csrf_token_for(&record)
    }

    /// Verify a presented CSRF token against this session.
    pub async fn verify_csrf(&self, presented: &str) -> Result<(), SessionError> {
        verify_csrf_token(&*self.record.lock().await, presented)
    }
}

pub struct AuthRedirect {
    method: Method,
}

impl AuthRedirect {
    fn new(method: Method) -> Self {
        Self { method }
    }
}

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        if self.method == Method::GET {
            tracing::debug!("Redirecting to {}", SHOP_LOGIN_URL.as_str());
            Redirect::to(SHOP_LOGIN_URL.as_str()).into_response()
        } else {
            tracing::debug!("Unauthorized");
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

/// Authenticated user information, available as an axum extractor.
///
/// Reads the session attached by the pipeline; anonymous requests are
/// rejected with a redirect to the login page (GET) or a 401 (other methods).
/// Use `Option<AuthUser>` where anonymous access is fine.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<SessionUser> for AuthUser {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let method = parts.method.clone();

        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| {
                tracing::error!("No session attached; is the pipeline applied?");
                AuthRedirect::new(method.clone())
            })?
            .clone();

        match session.user().await {
            Some(user) => Ok(AuthUser::from(user)),
            None => Err(AuthRedirect::new(method)),
        }
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(
            <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state)
                .await
                .ok(),
        )
    }
}
