use http::header::{COOKIE, HeaderMap};

use crate::session::config::SESSION_COOKIE_NAME;
use crate::session::errors::SessionError;

pub fn get_session_id_from_headers(headers: &HeaderMap) -> Result<Option<&str>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::debug!("No cookie header found");
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::HeaderError("Invalid cookie header".to_string())
    })?;

    let cookie_name = SESSION_COOKIE_NAME.as_str();

    let session_id = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    });

    if session_id.is_none() {
        tracing::debug!("No session cookie '{}' found in cookies", cookie_name);
    }

    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_no_cookie_header() {
        let headers = HeaderMap::new();
        assert!(
            get_session_id_from_headers(&headers)
                .expect("no error")
                .is_none()
        );
    }

    #[test]
    fn test_finds_session_cookie_among_others() {
        // Given a cookie header with several cookies
        let mut headers = HeaderMap::new();
        let value = format!("other=1; {}=abc123; theme=dark", SESSION_COOKIE_NAME.as_str());
        headers.insert(COOKIE, HeaderValue::from_str(&value).expect("value"));

        // When extracting the session id
        let id = get_session_id_from_headers(&headers).expect("no error");

        // Then the session cookie value is found
        assert_eq!(id, Some("abc123"));
    }

    #[test]
    fn test_absent_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("other=1; theme=dark"));
        assert!(
            get_session_id_from_headers(&headers)
                .expect("no error")
                .is_none()
        );
    }
}
