use std::env;
use std::sync::LazyLock;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("shop.sid".to_string())
});

pub static SESSION_COOKIE_MAX_AGE: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SESSION_COOKIE_MAX_AGE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(86400) // Default to one day if not set or invalid
});

/// Signing secret for the secret-derived CSRF tokens.
pub(super) static SESSION_SECRET_KEY: LazyLock<Vec<u8>> =
    LazyLock::new(|| match env::var("SESSION_SECRET_KEY") {
        Ok(secret) => secret.into_bytes(),
        Err(_) => "default_secret_key_change_in_production"
            .to_string()
            .into_bytes(),
    });

#[cfg(test)]
mod tests {
    use std::env;

    /// Helper function to set an environment variable for the duration of the test
    /// and restore the original value afterward.
    fn with_env_var<F, R>(key: &str, value: Option<&str>, test: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();

        match value {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        let result = test();

        match original {
            Some(val) => unsafe { env::set_var(key, val) },
            None => unsafe { env::remove_var(key) },
        }

        result
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_session_cookie_name() {
        // Test default value
        with_env_var("SESSION_COOKIE_NAME", None, || {
            let default_value = std::env::var("SESSION_COOKIE_NAME")
                .ok()
                .unwrap_or("shop.sid".to_string());
            assert_eq!(default_value, "shop.sid");
        });

        // Test custom value
        with_env_var("SESSION_COOKIE_NAME", Some("CustomSessionId"), || {
            let custom_value = std::env::var("SESSION_COOKIE_NAME")
                .ok()
                .unwrap_or("shop.sid".to_string());
            assert_eq!(custom_value, "CustomSessionId");
        });
    }

    #[test]
    #[serial_test::serial]
    fn test_parse_session_cookie_max_age() {
        // Test default value
        with_env_var("SESSION_COOKIE_MAX_AGE", None, || {
            let default_value = std::env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(86400);
            assert_eq!(default_value, 86400);
        });

        // Test invalid value falls back to default
        with_env_var("SESSION_COOKIE_MAX_AGE", Some("invalid"), || {
            let invalid_value = std::env::var("SESSION_COOKIE_MAX_AGE")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(86400);
            assert_eq!(invalid_value, 86400);
        });
    }
}
