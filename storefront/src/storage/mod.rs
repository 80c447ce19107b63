mod errors;
mod session_store;
mod types;

pub async fn init() -> Result<(), errors::StorageError> {
    let _ = *session_store::SESSION_STORE;

    Ok(())
}

pub use errors::StorageError;
pub use session_store::SESSION_STORE;
pub use types::CacheData;
