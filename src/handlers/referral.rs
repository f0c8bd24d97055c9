//! Referral program endpoints
//!
//! The link endpoint is the one place the original deliberately split
//! client error from server error; the typed `ReferralError` keeps that
//! split without inspecting message text.

use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::handlers::auth::AuthVendor;
use crate::models::common::ErrorResponse;
use crate::models::referral::{
    CashoutListResponse, CashoutResponse, CreateCashoutRequest, LinkReferralRequest,
    ProgramSettings, ReferralDashboardResponse, ReferralEntry,
};
use crate::services::referral::{self, ReferralError};
use crate::AppState;

fn error_response(e: ReferralError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        ReferralError::InvalidCode | ReferralError::InvalidAmount => StatusCode::BAD_REQUEST,
        ReferralError::AlreadyLinked | ReferralError::InsufficientBalance => {
            StatusCode::CONFLICT
        }
        ReferralError::NotFound => StatusCode::NOT_FOUND,
        ReferralError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn program_settings(state: &AppState) -> ProgramSettings {
    ProgramSettings {
        reward_amount: state.config.referral_reward,
        maturity_days: state.config.referral_maturity_days,
    }
}

pub async fn get_referral_dashboard(
    State(state): State<AppState>,
    auth: AuthVendor,
) -> Result<Json<ReferralDashboardResponse>, (StatusCode, Json<ErrorResponse>)> {
    referral::dashboard(&state.db, program_settings(&state), auth.vendor_id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn link_referral(
    State(state): State<AppState>,
    auth: AuthVendor,
    Json(payload): Json<LinkReferralRequest>,
) -> Result<Json<ReferralEntry>, (StatusCode, Json<ErrorResponse>)> {
    let link = referral::link_referral(&state.db, auth.vendor_id, &payload.code)
        .await
        .map_err(error_response)?;

    info!(
        referred_vendor_id = %auth.vendor_id,
        referrer_vendor_id = %link.referrer_vendor_id,
        "Referral linked"
    );
    Ok(Json(ReferralEntry::from(link)))
}

pub async fn list_cashouts(
    State(state): State<AppState>,
    auth: AuthVendor,
) -> Result<Json<CashoutListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let data = referral::list_cashouts(&state.db, auth.vendor_id)
        .await
        .map_err(|e| error_response(ReferralError::Db(e)))?
        .into_iter()
        .map(CashoutResponse::from)
        .collect();
    Ok(Json(CashoutListResponse { data }))
}

pub async fn create_cashout(
    State(state): State<AppState>,
    auth: AuthVendor,
    Json(payload): Json<CreateCashoutRequest>,
) -> Result<Json<CashoutResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = referral::create_cashout(
        &state.db,
        auth.vendor_id,
        payload.amount,
        payload.bank_detail_id,
        payload.note,
    )
    .await
    .map_err(error_response)?;

    info!(
        vendor_id = %auth.vendor_id,
        cashout_id = request.id,
        amount = %request.amount,
        "Cashout requested"
    );
    Ok(Json(CashoutResponse::from(request)))
}
