use std::{env, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{FileSessionStore, InMemorySessionStore, SessionStore};

pub static SESSION_STORE_TYPE: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_STORE_TYPE").unwrap_or_else(|_| "file".to_string()));

pub static SESSION_FILE_DIR: LazyLock<String> =
    LazyLock::new(|| env::var("SESSION_FILE_DIR").unwrap_or_else(|_| "./sessions".to_string()));

pub static SESSION_STORE: LazyLock<Mutex<Box<dyn SessionStore>>> = LazyLock::new(|| {
    let store_type = SESSION_STORE_TYPE.as_str();

    tracing::info!("Initializing session store with type: {}", store_type);

    let store: Box<dyn SessionStore> = match store_type {
        "memory" => Box::new(InMemorySessionStore::new()),
        "file" => {
            let store = FileSessionStore::new(SESSION_FILE_DIR.as_str());
            if let Err(e) = std::fs::create_dir_all(SESSION_FILE_DIR.as_str()) {
                tracing::error!("Failed to create session directory: {}", e);
                panic!("Failed to create session directory: {e}");
            }
            Box::new(store)
        }
        t => panic!("Unsupported session store type: {t}. Supported types are 'file' and 'memory'"),
    };

    Mutex::new(store)
});
