//! JSON API handlers.
//!
//! Response shapes follow the browser client: `{orderId}`, `{verified}`
//! and `{verdict, justification}`, with `{error}` on failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use verdict_core::{DecisionType, PaymentConfirmation, Verdict, VerdictRequest};
use verdict_runtime::payment::CREDENTIALS_NOT_CONFIGURED;
use verdict_runtime::OrderRequest;

use crate::error::ApiError;
use crate::state::AppState;

const VERIFICATION_FAILED: &str = "Verification failed";
const MISSING_FIELDS: &str = "Missing required fields";

/// Body of `POST /api/create-order`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderBody {
    /// Minor units; the configured price when absent
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(rename = "type", default)]
    pub decision_type: Option<String>,
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
}

/// Create a gateway order for one verdict.
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        tracing::warn!(error = %e, "Unreadable create-order body");
        ApiError::internal(e.body_text())
    })?;

    let Some(gateway) = state.gateway.as_ref() else {
        let message = if state.settings.enabled {
            CREDENTIALS_NOT_CONFIGURED
        } else {
            "Payments are disabled"
        };
        tracing::error!("Order requested but no payment gateway is available");
        return Err(ApiError::internal(message));
    };

    let decision_type = DecisionType::parse_lenient(body.decision_type.as_deref().unwrap_or(""));
    let amount = body.amount.unwrap_or(state.settings.price_minor);
    let request = OrderRequest::for_decision(amount, decision_type, &body.input, &state.settings);

    let order = gateway.create_order(request).await.map_err(|e| {
        tracing::error!(gateway = gateway.name(), error = %e, "Order creation failed");
        ApiError::from(e)
    })?;

    Ok(Json(CreateOrderResponse { order_id: order.id }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// Check the signature the checkout returned.
///
/// 200 `{verified: true}` on a match, 400 `{verified: false}` otherwise.
pub async fn verify_payment(
    State(state): State<AppState>,
    body: Result<Json<PaymentConfirmation>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(confirmation) = body.map_err(|e| {
        tracing::warn!(error = %e, "Unreadable verify-payment body");
        ApiError::internal(VERIFICATION_FAILED)
    })?;

    let Some(verifier) = state.verifier.as_ref() else {
        tracing::error!("Verification requested but no key secret is configured");
        return Err(ApiError::internal(VERIFICATION_FAILED));
    };

    let verified = verifier.verify(&confirmation);
    tracing::info!(
        order_id = %confirmation.razorpay_order_id,
        payment_id = %confirmation.razorpay_payment_id,
        verified,
        "Payment signature checked"
    );

    let status = if verified {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(VerifyResponse { verified })).into_response())
}

/// Body of `POST /api/generate-verdict`.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(rename = "type", default)]
    pub decision_type: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
}

/// Generate a verdict.
///
/// An unreadable body still gets a verdict: the fallback for an empty
/// yes-no question. Missing or blank input is a 400. Input past the
/// length limit is cut, not rejected.
pub async fn generate_verdict(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable generate-verdict body, using fallback");
            let request = VerdictRequest::lenient(DecisionType::YesNo, "");
            return Ok(Json(state.generator.fallback(&request)));
        }
    };

    let input = body.input.unwrap_or_default();
    if input.trim().is_empty() {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    }

    let decision_type = DecisionType::parse_lenient(body.decision_type.as_deref().unwrap_or(""));
    let request = VerdictRequest::clamped(decision_type, &input)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let generated = state.generator.generate(&request).await;
    tracing::info!(
        decision_type = %decision_type,
        source = ?generated.source,
        verdict = %generated.verdict.verdict,
        "Verdict delivered"
    );

    Ok(Json(generated.verdict))
}
