use axum::{
    body::{Body, to_bytes},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use http::{HeaderMap, Method, StatusCode, header::REFERER};

use storefront::{
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, SessionError, header_set_cookie, save_session,
};

use super::config::SHOP_LOGIN_URL;
use super::locals::RequestLocals;
use super::session::Session;

const CSRF_FORM_FIELD: &str = "_csrf";
const CSRF_HEADER: &str = "X-CSRF-Token";

/// Forms are small; anything past this is not a token lookup problem.
const CSRF_BODY_LIMIT: usize = 256 * 1024;

/// Stage: seed the template locals with the render date.
pub(crate) async fn inject_date(mut req: Request, next: Next) -> Response {
    let locals = RequestLocals {
        date: Utc::now().format("%a %b %d %Y %H:%M:%S").to_string(),
        ..Default::default()
    };
    req.extensions_mut().insert(locals);
    next.run(req).await
}

/// Stage: attach the session to the request and persist it afterwards.
///
/// The record is loaded from (or created in) the session store before the
/// inner stages run; if anything downstream mutated it, it is written back
/// once, and fresh sessions get their cookie on the response.
pub(crate) async fn attach_session(mut req: Request, next: Next) -> Response {
    let session = match Session::load_or_create(req.headers()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to attach session: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let session_id = session.id().to_string();
    let is_new = session.is_new();
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    if session.is_dirty() {
        let record = session.snapshot().await;
        if let Err(e) = save_session(&session_id, &record).await {
            tracing::error!("Failed to persist session {}: {}", session_id, e);
        }
    }

    if is_new {
        let mut headers = HeaderMap::new();
        if let Err(e) = header_set_cookie(
            &mut headers,
            SESSION_COOKIE_NAME.to_string(),
            session_id,
            Utc::now() + chrono::Duration::seconds(*SESSION_COOKIE_MAX_AGE as i64),
            *SESSION_COOKIE_MAX_AGE as i64,
        ) {
            tracing::error!("Failed to build session cookie: {}", e);
        }
        for (key, value) in headers.iter() {
            response.headers_mut().append(key, value.clone());
        }
    }

    response
}

/// Stage: drain the one-shot flash queues into the template locals.
///
/// A message flashed while handling request N is rendered on request N+1 and
/// gone by N+2; the drained record is persisted by the session stage.
pub(crate) async fn bridge_flash(mut req: Request, next: Next) -> Response {
    if let Some(session) = req.extensions().get::<Session>().cloned() {
        let (success_messages, error_messages) = session.take_flash().await;
        if let Some(locals) = req.extensions_mut().get_mut::<RequestLocals>() {
            locals.success_messages = success_messages;
            locals.error_messages = error_messages;
        }
    }
    next.run(req).await
}

/// Stage: verify the CSRF token on state-changing requests.
///
/// The token may arrive as the `_csrf` form field or the `X-CSRF-Token`
/// header. A bad or missing token flashes an error and sends the client back
/// to the referring page so the form can be resubmitted; any other failure is
/// left to the framework's default error handling. Exempt routes (the
/// payment webhook) are registered on a router branch this stage never
/// wraps, so exemption is decided at registration time, not by inspecting
/// URLs here.
pub(crate) async fn verify_csrf(req: Request, next: Next) -> Response {
    if !matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    ) {
        return next.run(req).await;
    }

    let Some(session) = req.extensions().get::<Session>().cloned() else {
        tracing::error!("CSRF stage reached without a session attached");
        return (StatusCode::INTERNAL_SERVER_ERROR, "No session").into_response();
    };

    let (req, presented) = match extract_presented_token(req).await {
        Ok(pair) => pair,
        Err(response) => return response,
    };

    match session
        .verify_csrf(presented.as_deref().unwrap_or(""))
        .await
    {
        Ok(()) => next.run(req).await,
        Err(SessionError::CsrfToken(msg)) => {
            tracing::debug!("CSRF verification failed: {}", msg);
            csrf_failure_response(req.headers(), &session).await
        }
        // Not a token problem: pass through untouched to default handling.
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Translate a CSRF token failure into its recovery: queue a flash error and
/// redirect the client back to the referring page, preserving form context.
async fn csrf_failure_response(headers: &HeaderMap, session: &Session) -> Response {
    session
        .flash_error("The form has expired. Please try again")
        .await;
    let back = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("/");
    Redirect::to(back).into_response()
}

/// Pull the CSRF token out of the request without losing the body.
///
/// Header tokens are free; form tokens require buffering the body, which is
/// then reinstalled so the handler's `Form` extractor still works.
async fn extract_presented_token(req: Request) -> Result<(Request, Option<String>), Response> {
    if let Some(token) = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        let token = token.to_string();
        return Ok((req, Some(token)));
    }

    let is_form = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if !is_form {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, CSRF_BODY_LIMIT).await.map_err(|e| {
        tracing::error!("Failed to buffer form body: {}", e);
        (StatusCode::PAYLOAD_TOO_LARGE, "Form body too large").into_response()
    })?;

    let token = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned());

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok((req, token))
}

/// Stage: expose the session's CSRF token to the template locals, creating
/// the per-session secret on demand.
pub(crate) async fn expose_csrf_token(mut req: Request, next: Next) -> Response {
    if let Some(session) = req.extensions().get::<Session>().cloned() {
        match session.ensure_csrf_token().await {
            Ok(token) => {
                if let Some(locals) = req.extensions_mut().get_mut::<RequestLocals>() {
                    locals.csrf_token = Some(token);
                }
            }
            Err(e) => {
                tracing::error!("Failed to derive CSRF token: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
            }
        }
    }
    next.run(req).await
}

/// Stage: mirror the session's user into the template locals so every view
/// can tell who is logged in, independent of route.
pub(crate) async fn expose_user(mut req: Request, next: Next) -> Response {
    if let Some(session) = req.extensions().get::<Session>().cloned() {
        let user = session.user().await;
        if let Some(locals) = req.extensions_mut().get_mut::<RequestLocals>() {
            locals.user = user;
        }
    }
    next.run(req).await
}

/// Guard for authenticated route groups.
///
/// Anonymous visitors are flashed an explanation and redirected to the login
/// page; the guarded handlers are never reached.
pub async fn require_login(req: Request, next: Next) -> Response {
    let Some(session) = req.extensions().get::<Session>().cloned() else {
        tracing::error!("Auth guard reached without a session attached");
        return Redirect::to(SHOP_LOGIN_URL.as_str()).into_response();
    };

    if session.user().await.is_some() {
        next.run(req).await
    } else {
        session
            .flash_error("You must log in to view this page")
            .await;
        Redirect::to(SHOP_LOGIN_URL.as_str()).into_response()
    }
}
