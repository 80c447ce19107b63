//! Central configuration for the storefront-axum crate

use std::sync::LazyLock;

/// Where anonymous visitors are sent when they hit a protected route group.
/// Default: "/users/login"
pub static SHOP_LOGIN_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SHOP_LOGIN_URL").unwrap_or_else(|_| "/users/login".to_string())
});

/// Directory served as static assets when no route matches.
/// Default: "./public"
pub static SHOP_PUBLIC_DIR: LazyLock<String> =
    LazyLock::new(|| std::env::var("SHOP_PUBLIC_DIR").unwrap_or_else(|_| "./public".to_string()));
