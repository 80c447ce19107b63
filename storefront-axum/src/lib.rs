//! storefront-axum - The ordered request pipeline for the storefront application
//!
//! Every request passes through a fixed sequence of stages before dispatch:
//! static assets, template-locals date, session attachment, flash bridging,
//! CSRF verification (with a registration-time exemption for the payment
//! webhook), CSRF token exposure, authenticated-user exposure, and finally
//! the route handler. See [`pipeline::apply`] for the composition.

mod config;
mod locals;
mod middleware;
mod pipeline;
mod session;

pub use config::{SHOP_LOGIN_URL, SHOP_PUBLIC_DIR};
pub use locals::RequestLocals;
pub use middleware::require_login;
pub use pipeline::apply;
pub use session::{AuthRedirect, AuthUser, Session};

// Re-export the pieces of the core crate that handlers need
pub use storefront::{SessionError, SessionUser, init};
