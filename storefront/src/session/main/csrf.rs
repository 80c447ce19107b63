use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::session::config::SESSION_SECRET_KEY;
use crate::session::errors::SessionError;
use crate::session::types::SessionRecord;
use crate::utils::gen_random_string;

type HmacSha256 = Hmac<Sha256>;

/// Make sure the session carries a CSRF secret, generating one on demand.
///
/// Returns true when a new secret was generated so the caller knows the
/// record needs persisting.
pub fn ensure_csrf_secret(record: &mut SessionRecord) -> Result<bool, SessionError> {
    if record.csrf_secret.is_some() {
        return Ok(false);
    }
    record.csrf_secret = Some(gen_random_string(32)?);
    Ok(true)
}

/// Derive the CSRF token for a session: HMAC-SHA256 of the per-session
/// secret keyed by the server-wide signing secret, URL-safe base64 encoded.
pub fn csrf_token_for(record: &SessionRecord) -> Result<String, SessionError> {
    let secret = record
        .csrf_secret
        .as_deref()
        .ok_or_else(|| SessionError::CsrfToken("No CSRF secret in session".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(&SESSION_SECRET_KEY)
        .map_err(|_| SessionError::Crypto("HMAC can take key of any size".to_string()))?;
    mac.update(secret.as_bytes());
    let result = mac.finalize().into_bytes();
    Ok(URL_SAFE_NO_PAD.encode(result))
}

/// Verify a presented CSRF token against the session in constant time.
///
/// A missing or mismatching token is the named `CsrfToken` failure, which the
/// pipeline recovers from with a flash message and a redirect-back.
pub fn verify_csrf_token(record: &SessionRecord, presented: &str) -> Result<(), SessionError> {
    let expected = csrf_token_for(record)?;

    if expected.as_bytes().ct_eq(presented.as_bytes()).into() {
        Ok(())
    } else {
        tracing::debug!("CSRF token mismatch");
        Err(SessionError::CsrfToken("CSRF token mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn anonymous_record() -> SessionRecord {
        SessionRecord {
            user: None,
            success_messages: Vec::new(),
            error_messages: Vec::new(),
            csrf_secret: None,
            expires_at: Utc::now() + Duration::seconds(600),
            ttl: 600,
        }
    }

    #[test]
    fn test_ensure_csrf_secret_generates_once() {
        // Given a session with no CSRF secret
        let mut record = anonymous_record();

        // When ensuring a secret twice
        let first = ensure_csrf_secret(&mut record).expect("ensure");
        let secret = record.csrf_secret.clone();
        let second = ensure_csrf_secret(&mut record).expect("ensure");

        // Then only the first call generates, the second reuses
        assert!(first);
        assert!(!second);
        assert_eq!(record.csrf_secret, secret);
    }

    #[test]
    fn test_token_roundtrip() {
        // Given a session with a CSRF secret
        let mut record = anonymous_record();
        ensure_csrf_secret(&mut record).expect("ensure");

        // When deriving and verifying the token
        let token = csrf_token_for(&record).expect("token");

        // Then verification succeeds
        verify_csrf_token(&record, &token).expect("valid token");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let mut record = anonymous_record();
        ensure_csrf_secret(&mut record).expect("ensure");
        let mut token = csrf_token_for(&record).expect("token");
        token.push('x');

        let err = verify_csrf_token(&record, &token).expect_err("tampered token");
        assert!(matches!(err, SessionError::CsrfToken(_)));
    }

    #[test]
    fn test_token_from_other_session_rejected() {
        // Given two sessions with distinct secrets
        let mut a = anonymous_record();
        let mut b = anonymous_record();
        ensure_csrf_secret(&mut a).expect("ensure");
        ensure_csrf_secret(&mut b).expect("ensure");

        // When presenting one session's token to the other
        let token_b = csrf_token_for(&b).expect("token");
        let err = verify_csrf_token(&a, &token_b).expect_err("cross-session token");

        // Then it is the named CSRF failure
        assert!(matches!(err, SessionError::CsrfToken(_)));
    }

    #[test]
    fn test_missing_secret_is_csrf_error() {
        let record = anonymous_record();
        let err = verify_csrf_token(&record, "anything").expect_err("no secret");
        assert!(matches!(err, SessionError::CsrfToken(_)));
    }

    #[test]
    fn test_token_is_stable_for_same_secret() {
        let mut record = anonymous_record();
        ensure_csrf_secret(&mut record).expect("ensure");
        let one = csrf_token_for(&record).expect("token");
        let two = csrf_token_for(&record).expect("token");
        assert_eq!(one, two);
    }
}
