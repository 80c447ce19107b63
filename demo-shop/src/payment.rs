use base64::engine::{Engine, general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::{
    CHECKOUT_CANCEL_URL, CHECKOUT_SUCCESS_URL, PAYMENT_GATEWAY_URL, PAYMENT_WEBHOOK_SECRET,
};
use crate::errors::ShopError;

type HmacSha256 = Hmac<Sha256>;

/// A hosted payment page created at the gateway. The customer is redirected
/// to `url`; the gateway reports the outcome back via webhook.
#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutSession {
    pub(crate) id: String,
    pub(crate) url: String,
}

#[derive(Debug, Serialize)]
struct CheckoutSessionRequest<'a> {
    reference: &'a str,
    amount_cents: i64,
    success_url: &'a str,
    cancel_url: &'a str,
}

/// Event delivered by the gateway to the payment webhook.
#[derive(Debug, Deserialize)]
pub(crate) struct WebhookEvent {
    pub(crate) reference: String,
    pub(crate) status: String,
}

pub(crate) async fn create_checkout_session(
    order_id: &str,
    amount_cents: i64,
) -> Result<CheckoutSession, ShopError> {
    let endpoint = format!("{}/v1/checkout_sessions", *PAYMENT_GATEWAY_URL);
    let request = CheckoutSessionRequest {
        reference: order_id,
        amount_cents,
        success_url: CHECKOUT_SUCCESS_URL.as_str(),
        cancel_url: CHECKOUT_CANCEL_URL.as_str(),
    };

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&request)
        .send()
        .await
        .map_err(|e| ShopError::Gateway(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ShopError::Gateway(format!(
            "Checkout session request failed with status {}",
            response.status()
        )));
    }

    let session: CheckoutSession = response
        .json()
        .await
        .map_err(|e| ShopError::Gateway(e.to_string()))?;

    tracing::debug!("Created checkout session {} for order {}", session.id, order_id);
    Ok(session)
}

/// Verify the gateway's HMAC-SHA256 signature over the raw webhook body.
///
/// The comparison is constant-time. Webhook requests carry no session and no
/// CSRF token, so this signature is the only authentication they get.
pub(crate) fn verify_webhook_signature(body: &[u8], signature: &str) -> Result<(), ShopError> {
    let presented = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| ShopError::Signature("Malformed webhook signature".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(&PAYMENT_WEBHOOK_SECRET)
        .map_err(|e| ShopError::Signature(e.to_string()))?;
    mac.update(body);
    let expected = mac.finalize().into_bytes();

    if expected.ct_eq(presented.as_slice()).into() {
        Ok(())
    } else {
        Err(ShopError::Signature(
            "Webhook signature verification failed".to_string(),
        ))
    }
}
