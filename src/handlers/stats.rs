//! Read-only purchase/contact aggregates for the vendor dashboard

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::entities::{lead_contacts, lead_purchases, prelude::*};
use crate::handlers::auth::AuthVendor;
use crate::models::common::ErrorResponse;
use crate::models::contact::ContactStatus;
use crate::models::stats::LeadStatsResponse;
use crate::services::quota;
use crate::AppState;

pub async fn get_lead_stats(
    State(state): State<AppState>,
    auth: AuthVendor,
) -> Result<Json<LeadStatsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let now = Utc::now().naive_utc();
    let day_start = quota::boundaries(now).day_start;
    let week_cutoff = now - Duration::days(7);
    let year_cutoff = now - Duration::days(365);

    // One year of rows per vendor is small; aggregate in memory
    let purchases = LeadPurchases::find()
        .filter(lead_purchases::Column::VendorId.eq(auth.vendor_id))
        .filter(lead_purchases::Column::PurchaseDate.gte(year_cutoff))
        .all(&state.db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })?;

    let today = purchases
        .iter()
        .filter(|p| p.purchase_date >= day_start)
        .count() as u64;
    let last_7_days = purchases
        .iter()
        .filter(|p| p.purchase_date >= week_cutoff)
        .count() as u64;
    let last_365_days = purchases.len() as u64;
    let total_spend: Decimal = purchases.iter().map(|p| p.amount).sum();

    let contacts = LeadContacts::find()
        .filter(lead_contacts::Column::VendorId.eq(auth.vendor_id))
        .filter(lead_contacts::Column::ContactDate.gte(year_cutoff))
        .all(&state.db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })?;

    let contacts_logged = contacts.len() as u64;
    let converted = contacts
        .iter()
        .filter(|c| c.status == ContactStatus::Converted.to_string())
        .count() as u64;
    let conversion_rate = if last_365_days > 0 {
        converted as f64 / last_365_days as f64
    } else {
        0.0
    };

    Ok(Json(LeadStatsResponse {
        today,
        last_7_days,
        last_365_days,
        total_spend,
        contacts_logged,
        conversion_rate,
    }))
}
