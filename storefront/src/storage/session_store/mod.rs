mod config;
mod file;
mod memory;
mod types;

pub use config::SESSION_STORE;
pub(crate) use types::SessionStore;
