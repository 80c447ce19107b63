//! Shared test initialization for the demo-shop crate.
//!
//! Tests that touch the session store or the shop database call
//! [`init_test_environment`] first. The store type and database URL are
//! process-wide statics, so tests that rely on them also run under
//! `#[serial_test::serial]`.

use std::sync::Once;

/// Point the session store at memory and the shop database at a throwaway
/// SQLite file, then make sure the tables exist.
pub(crate) async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        unsafe {
            std::env::set_var("SESSION_STORE_TYPE", "memory");
        }

        let db_path = std::env::temp_dir().join(format!(
            "demo-shop-test-{}.sqlite",
            uuid::Uuid::new_v4()
        ));
        let _ = std::fs::remove_file(&db_path);
        unsafe {
            std::env::set_var(
                "SHOP_DATABASE_URL",
                format!("sqlite://{}?mode=rwc", db_path.display()),
            );
        }
    });

    if let Err(e) = storefront_axum::init().await {
        eprintln!("Warning: Failed to initialize the session store: {e}");
    }
    if let Err(e) = crate::db::ShopStore::init().await {
        eprintln!("Warning: Failed to initialize the shop database: {e}");
    }
}
