mod common;
mod config;
mod errors;
mod main;
mod types;

pub use config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
pub use errors::SessionError;
pub use main::{
    create_session, csrf_token_for, destroy_session, ensure_csrf_secret,
    get_session_id_from_headers, load_session, push_error_message, push_success_message,
    save_session, take_flash_messages, verify_csrf_token,
};
pub use types::{SessionRecord, SessionUser};
