use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::Value;

use super::error::PaymentError;
use super::order::OrderRequest;
use super::signature::{SignedOrderAssertion, Verdict, VerifyRequest, VerifyResponse};
use crate::gateway::error::{ApiJson, ApiResult, ErrorBody};
use crate::gateway::state::AppState;

/// Create a payment order
///
/// POST /order
#[utoipa::path(
    post,
    path = "/order",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Gateway order object, relayed verbatim", content_type = "application/json"),
        (status = 400, description = "Missing or invalid amount", body = ErrorBody),
        (status = 500, description = "Payment gateway error", body = ErrorBody)
    ),
    tag = "Payments"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<OrderRequest>,
) -> ApiResult<Json<Value>> {
    let order = req.into_new_order(&state.payment, chrono::Utc::now().timestamp_millis())?;
    tracing::info!(
        "[payment] Create order: amount={} {} receipt={}",
        order.amount,
        order.currency,
        order.receipt
    );

    let created = state
        .payments
        .create_order(&order)
        .await
        .map_err(PaymentError::Upstream)?;

    Ok(Json(created))
}

/// Verify a payment signature
///
/// POST /verify
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Signature authentic", body = VerifyResponse),
        (status = 400, description = "Missing fields or signature mismatch ({success: false})")
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> ApiResult<Json<VerifyResponse>> {
    let assertion = SignedOrderAssertion::from_request(req)?;

    match state.verifier.verify(&assertion) {
        Verdict::Authentic => {
            tracing::info!("[payment] Signature verified for order {}", assertion.order_id);
            Ok(Json(VerifyResponse { success: true }))
        }
        Verdict::Inauthentic => {
            tracing::warn!(
                "[payment] Signature mismatch for order {}",
                assertion.order_id
            );
            Err(PaymentError::SignatureMismatch.into())
        }
    }
}
