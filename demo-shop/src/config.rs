//! Central configuration for the demo-shop application

use std::sync::LazyLock;

/// Listening port. Default: 3000
pub static SHOP_PORT: LazyLock<u16> = LazyLock::new(|| {
    std::env::var("SHOP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000)
});

/// Cloudinary account the upload widget talks to.
pub static CLOUDINARY_CLOUD_NAME: LazyLock<String> =
    LazyLock::new(|| std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_else(|_| "demo".to_string()));

pub static CLOUDINARY_API_KEY: LazyLock<String> =
    LazyLock::new(|| std::env::var("CLOUDINARY_API_KEY").unwrap_or_default());

pub static CLOUDINARY_API_SECRET: LazyLock<String> =
    LazyLock::new(|| std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default());

pub static CLOUDINARY_UPLOAD_PRESET: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_else(|_| "ml_default".to_string())
});

/// Base URL of the hosted payment gateway.
pub static PAYMENT_GATEWAY_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("PAYMENT_GATEWAY_URL").unwrap_or_else(|_| "http://localhost:4242".to_string())
});

/// Shared secret the gateway signs webhook bodies with.
pub static PAYMENT_WEBHOOK_SECRET: LazyLock<Vec<u8>> =
    LazyLock::new(|| match std::env::var("PAYMENT_WEBHOOK_SECRET") {
        Ok(secret) => secret.into_bytes(),
        Err(_) => "whsec_dev_change_in_production".to_string().into_bytes(),
    });

/// Where the gateway sends the customer after payment.
pub static CHECKOUT_SUCCESS_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CHECKOUT_SUCCESS_URL")
        .unwrap_or_else(|_| "http://localhost:3000/checkout/success".to_string())
});

pub static CHECKOUT_CANCEL_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("CHECKOUT_CANCEL_URL")
        .unwrap_or_else(|_| "http://localhost:3000/checkout/cancelled".to_string())
});

#[cfg(test)]
mod tests {

    // Helpers replicating the LazyLock logic so defaults are testable without
    // touching process environment

    fn get_port(env_value: Option<&str>) -> u16 {
        env_value.and_then(|s| s.parse().ok()).unwrap_or(3000)
    }

    #[test]
    fn test_port_default() {
        assert_eq!(get_port(None), 3000);
    }

    #[test]
    fn test_port_custom() {
        assert_eq!(get_port(Some("8080")), 8080);
    }

    #[test]
    fn test_port_invalid_falls_back() {
        assert_eq!(get_port(Some("not-a-port")), 3000);
    }
}
