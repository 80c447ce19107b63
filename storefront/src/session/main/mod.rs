mod cookie;
mod csrf;
mod flash;
mod session;

pub use cookie::get_session_id_from_headers;
pub use csrf::{csrf_token_for, ensure_csrf_secret, verify_csrf_token};
pub use flash::{push_error_message, push_success_message, take_flash_messages};
pub use session::{create_session, destroy_session, load_session, save_session};
