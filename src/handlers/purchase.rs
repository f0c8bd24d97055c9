//! Purchase endpoint
//!
//! POST /api/leads/{lead_id}/purchase. The handler only maps outcomes to
//! HTTP shapes; the authoritative quota/payment decision happens inside
//! the purchase transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::handlers::auth::AuthVendor;
use crate::models::common::ErrorResponse;
use crate::models::event::{VendorEvent, VendorEventKind};
use crate::models::purchase::{PurchaseLeadRequest, PurchaseLeadResponse, PurchaseRecord};
use crate::services::purchase::{self, PurchaseError};
use crate::AppState;

pub async fn purchase_lead(
    State(state): State<AppState>,
    auth: AuthVendor,
    Path(lead_id): Path<i32>,
    Json(payload): Json<PurchaseLeadRequest>,
) -> Result<Json<PurchaseLeadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let outcome = purchase::purchase_lead(
        &state.db,
        &state.subscriptions,
        auth.vendor_id,
        lead_id,
        payload.mode,
        payload.amount,
    )
    .await;

    match outcome {
        Ok(outcome) => {
            info!(
                vendor_id = %auth.vendor_id,
                lead_id,
                mode = %payload.mode,
                amount = %outcome.purchase.amount,
                "Lead purchased"
            );
            state.events.broadcast(VendorEvent {
                kind: VendorEventKind::LeadPurchased,
                vendor_id: auth.vendor_id,
                lead_id,
                quota: Some(outcome.quota.clone().into()),
                timestamp: Utc::now().timestamp_millis(),
            });
            Ok(Json(PurchaseLeadResponse {
                purchase: Some(PurchaseRecord::from(outcome.purchase)),
                quota: Some(outcome.quota.into()),
                subscription: outcome.subscription,
                message: None,
            }))
        }
        // Steady-state gates come back as guidance, not error banners
        Err(PurchaseError::QuotaExhausted(message)) => Ok(Json(PurchaseLeadResponse {
            purchase: None,
            quota: None,
            subscription: None,
            message: Some(message),
        })),
        Err(e @ PurchaseError::NoActiveSubscription) => Ok(Json(PurchaseLeadResponse {
            purchase: None,
            quota: None,
            subscription: None,
            message: Some(e.to_string()),
        })),
        Err(e @ PurchaseError::AlreadyPurchased) | Err(e @ PurchaseError::LeadUnavailable) => {
            Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
        Err(e @ PurchaseError::LeadNotFound) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e @ PurchaseError::AmountRequired) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(PurchaseError::Db(e)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        )),
    }
}
