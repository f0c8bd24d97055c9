//! Internal callback endpoints
//!
//! Guarded by the shared X-Internal-Api-Key header, not vendor identity:
//! these are called by trusted collaborators (the payment processor), not
//! by browsers.

use axum::{
    extract::State,
    http::{header::HeaderMap, StatusCode},
    Json,
};
use tracing::info;

use crate::models::common::ErrorResponse;
use crate::models::referral::{PaymentCompletedRequest, PaymentCompletedResponse};
use crate::services::referral::{self, ReferralError};
use crate::AppState;

pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

fn check_api_key(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    let supplied = headers
        .get(INTERNAL_API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if supplied == Some(state.config.internal_api_key.as_str()) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid or missing internal API key".to_string(),
            }),
        ))
    }
}

/// Payment-completion callback. A completed payment qualifies the paying
/// vendor's referral (if any) and accrues the reward as pending credit.
/// Retries are safe: a referral that already left LINKED is a no-op.
pub async fn payment_completed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentCompletedRequest>,
) -> Result<Json<PaymentCompletedResponse>, (StatusCode, Json<ErrorResponse>)> {
    check_api_key(&state, &headers)?;

    let reward_accrued = referral::qualify_and_reward(
        &state.db,
        state.config.referral_reward,
        payload.vendor_id,
        payload.payment_id,
    )
    .await
    .map_err(|e| match e {
        ReferralError::Db(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: other.to_string(),
            }),
        ),
    })?;

    if reward_accrued {
        info!(
            vendor_id = %payload.vendor_id,
            payment_id = %payload.payment_id,
            "Referral reward accrued"
        );
    }

    Ok(Json(PaymentCompletedResponse { reward_accrued }))
}
