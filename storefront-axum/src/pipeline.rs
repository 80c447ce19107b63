//! Composition of the request pipeline.
//!
//! Stages execute in a fixed order for every request; each stage either calls
//! the next one or terminates the request with its own response.

use axum::{Router, middleware::from_fn};
use tower_http::LatencyUnit;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::config::SHOP_PUBLIC_DIR;
use super::middleware::{
    attach_session, bridge_flash, expose_csrf_token, expose_user, inject_date, verify_csrf,
};

/// Wire the pipeline around the application routes.
///
/// Execution order per request: request tracing, date locals, session
/// attachment, flash bridging, then for `protected` routes CSRF verification
/// and CSRF token exposure, then user exposure, then the handler. Routes on
/// the `exempt` router skip the CSRF stages entirely; that branch is the
/// registration-time allowlist (the payment webhook lives there). Unmatched
/// paths fall through to the static asset directory.
///
/// axum applies layers bottom-up, so each group below is listed
/// innermost-first.
pub fn apply(protected: Router, exempt: Router) -> Router {
    let protected = protected
        .layer(from_fn(expose_user))
        .layer(from_fn(expose_csrf_token))
        .layer(from_fn(verify_csrf));

    let exempt = exempt.layer(from_fn(expose_user));

    Router::new()
        .merge(protected)
        .merge(exempt)
        .fallback_service(ServeDir::new(SHOP_PUBLIC_DIR.as_str()))
        .layer(from_fn(bridge_flash))
        .layer(from_fn(attach_session))
        .layer(from_fn(inject_date))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}
