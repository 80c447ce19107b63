//! storefront - Session, flash-message and CSRF core for the storefront application
//!
//! This crate holds the framework-agnostic pieces of the request pipeline:
//! the session record and its file-backed store, the one-shot flash queues,
//! and secret-derived CSRF token generation and verification.

mod session;
mod storage;
mod utils;

pub use session::{
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SessionError, SessionRecord, SessionUser,
    create_session, csrf_token_for, destroy_session, ensure_csrf_secret,
    get_session_id_from_headers, load_session, push_error_message, push_success_message,
    save_session, take_flash_messages, verify_csrf_token,
};

pub use storage::StorageError;

pub use utils::{UtilError, gen_random_string, header_set_cookie};

/// Initialize the underlying session store
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    Ok(())
}
