use std::collections::{BTreeMap, HashMap};

use axum::{Json, Router, extract::Query, routing::get};
use chrono::Utc;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::config::{
    CLOUDINARY_API_KEY, CLOUDINARY_API_SECRET, CLOUDINARY_CLOUD_NAME, CLOUDINARY_UPLOAD_PRESET,
};

// Parameters the upload widget sends but which are never part of the
// string-to-sign
const UNSIGNED_PARAMS: [&str; 4] = ["file", "cloud_name", "resource_type", "api_key"];

pub(super) fn router() -> Router<()> {
    Router::new().route("/sign", get(sign_upload))
}

/// Sign a direct-to-Cloudinary upload request. The browser uploads the image
/// itself; the server only vouches for the parameters.
async fn sign_upload(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let timestamp = Utc::now().timestamp();

    let mut to_sign: BTreeMap<String, String> = params
        .into_iter()
        .filter(|(k, _)| !UNSIGNED_PARAMS.contains(&k.as_str()))
        .collect();
    to_sign.insert("timestamp".to_string(), timestamp.to_string());
    to_sign
        .entry("upload_preset".to_string())
        .or_insert_with(|| CLOUDINARY_UPLOAD_PRESET.to_string());

    let signature = sign_params(&to_sign, &CLOUDINARY_API_SECRET);

    Json(json!({
        "signature": signature,
        "timestamp": timestamp,
        "api_key": CLOUDINARY_API_KEY.as_str(),
        "cloud_name": CLOUDINARY_CLOUD_NAME.as_str(),
        "upload_preset": to_sign.get("upload_preset"),
    }))
}

/// `key=value` pairs joined with `&` in lexicographic key order, with the
/// API secret appended, hashed with SHA-256 and hex encoded.
fn sign_params(params: &BTreeMap<String, String>, secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_signed_in_sorted_order() {
        let mut a = BTreeMap::new();
        a.insert("timestamp".to_string(), "1000".to_string());
        a.insert("upload_preset".to_string(), "ml_default".to_string());

        let mut b = BTreeMap::new();
        b.insert("upload_preset".to_string(), "ml_default".to_string());
        b.insert("timestamp".to_string(), "1000".to_string());

        // Insertion order must not matter
        assert_eq!(sign_params(&a, "secret"), sign_params(&b, "secret"));
    }

    #[test]
    fn test_secret_changes_signature() {
        let mut params = BTreeMap::new();
        params.insert("timestamp".to_string(), "1000".to_string());

        assert_ne!(sign_params(&params, "secret-a"), sign_params(&params, "secret-b"));
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let params = BTreeMap::new();
        let signature = sign_params(&params, "secret");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
