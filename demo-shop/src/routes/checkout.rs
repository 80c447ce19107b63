use askama::Template;
use axum::{
    Extension, Json, Router,
    body::Bytes,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use storefront_axum::{AuthUser, RequestLocals, Session};

use crate::db::ShopStore;
use crate::errors::{IntoResponseError, ShopError};
use crate::payment::{self, WebhookEvent};
use crate::types::CartLine;

const GATEWAY_SIGNATURE_HEADER: &str = "X-Gateway-Signature";

pub(super) fn router() -> Router<()> {
    Router::new()
        .route("/", get(start_checkout))
        .route("/success", get(checkout_success))
        .route("/cancelled", get(checkout_cancelled))
}

/// The webhook route is mounted on the CSRF-exempt branch of the pipeline:
/// the gateway cannot present a CSRF token, so these requests authenticate
/// with an HMAC signature over the body instead.
pub(super) fn webhook_router() -> Router<()> {
    Router::new().route("/process_payment", post(process_payment))
}

#[derive(Template)]
#[template(path = "checkout_success.j2")]
struct CheckoutSuccessTemplate {
    locals: RequestLocals,
}

#[derive(Template)]
#[template(path = "checkout_cancelled.j2")]
struct CheckoutCancelledTemplate {
    locals: RequestLocals,
}

/// Turn the cart into a pending order and hand the customer to the gateway's
/// hosted payment page.
async fn start_checkout(
    user: AuthUser,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let lines = ShopStore::cart_lines(&user.id).await.into_response_error()?;
    if lines.is_empty() {
        session.flash_error("Your cart is empty").await;
        return Ok(Redirect::to("/cart"));
    }

    let total: i64 = lines.iter().map(CartLine::line_total_cents).sum();
    let order = ShopStore::create_order(&user.id, total)
        .await
        .into_response_error()?;

    let checkout = payment::create_checkout_session(&order.id, order.total_cents)
        .await
        .into_response_error()?;

    tracing::info!(
        "Order {} ({} cents) sent to gateway session {}",
        order.id,
        order.total_cents,
        checkout.id
    );
    Ok(Redirect::to(&checkout.url))
}

/// Gateway-to-server payment notification. Never carries a session cookie.
async fn process_payment(
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, String)> {
    let signature = headers
        .get(GATEWAY_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ShopError::Signature(
            "Missing gateway signature header".to_string(),
        ))
        .into_response_error()?;

    payment::verify_webhook_signature(&body, signature).into_response_error()?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| ShopError::Signature(format!("Malformed webhook payload: {e}")))
        .into_response_error()?;

    if event.status != "succeeded" {
        tracing::info!(
            "Ignoring webhook for order {} with status {}",
            event.reference,
            event.status
        );
        return Ok(Json(json!({ "received": true })));
    }

    let order = ShopStore::get_order(&event.reference)
        .await
        .into_response_error()?
        .ok_or(ShopError::ResourceNotFound {
            resource_type: "Order".to_string(),
            resource_id: event.reference.clone(),
        })
        .into_response_error()?;

    ShopStore::mark_order_paid(&order.id).await.into_response_error()?;
    ShopStore::clear_cart(&order.user_id).await.into_response_error()?;

    tracing::info!("Order {} marked paid", order.id);
    Ok(Json(json!({ "received": true })))
}

async fn checkout_success(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let template = CheckoutSuccessTemplate { locals };
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}

async fn checkout_cancelled(
    Extension(locals): Extension<RequestLocals>,
) -> Result<Html<String>, (StatusCode, String)> {
    let template = CheckoutCancelledTemplate { locals };
    Ok(Html(template.render().map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?))
}
