//! Contact logging endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::handlers::auth::AuthVendor;
use crate::models::common::ErrorResponse;
use crate::models::contact::{ContactResponse, LogContactRequest, UpdateContactStatusRequest};
use crate::models::event::{VendorEvent, VendorEventKind};
use crate::services::contacts::{self, ContactError};
use crate::AppState;

fn error_response(e: ContactError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        ContactError::LeadNotFound | ContactError::ContactNotFound => StatusCode::NOT_FOUND,
        ContactError::NotPurchased | ContactError::NotOwner => StatusCode::FORBIDDEN,
        ContactError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub async fn log_contact(
    State(state): State<AppState>,
    auth: AuthVendor,
    Path(lead_id): Path<i32>,
    Json(payload): Json<LogContactRequest>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (contact, quota) = contacts::log_contact(
        &state.db,
        &state.subscriptions,
        auth.vendor_id,
        lead_id,
        payload,
    )
    .await
    .map_err(error_response)?;

    // UI refresh hint; durability comes from the row, not the event
    state.events.broadcast(VendorEvent {
        kind: VendorEventKind::ContactLogged,
        vendor_id: auth.vendor_id,
        lead_id,
        quota: Some(quota.into()),
        timestamp: Utc::now().timestamp_millis(),
    });

    Ok(Json(ContactResponse::from(contact)))
}

pub async fn update_contact_status(
    State(state): State<AppState>,
    auth: AuthVendor,
    Path(contact_id): Path<i32>,
    Json(payload): Json<UpdateContactStatusRequest>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ErrorResponse>)> {
    contacts::update_status(&state.db, auth.vendor_id, contact_id, payload.status)
        .await
        .map(|contact| Json(ContactResponse::from(contact)))
        .map_err(error_response)
}
