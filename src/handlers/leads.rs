//! Lead listing endpoints: the eligibility-gated marketplace view and the
//! vendor's purchased (unlocked) leads.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use std::collections::HashMap;

use crate::entities::{lead_purchases, leads, prelude::*};
use crate::handlers::auth::AuthVendor;
use crate::models::common::{normalize_pagination, ErrorResponse, Pagination};
use crate::models::lead::{AvailableLeadsQuery, AvailableLeadsResponse, LeadDetail};
use crate::models::purchase::{
    PurchaseRecord, PurchasedLead, PurchasedLeadsQuery, PurchasedLeadsResponse,
};
use crate::services::eligibility;
use crate::AppState;

pub async fn get_available_leads(
    State(state): State<AppState>,
    auth: AuthVendor,
    Query(query): Query<AvailableLeadsQuery>,
) -> Result<Json<AvailableLeadsResponse>, (StatusCode, Json<ErrorResponse>)> {
    eligibility::available_leads(&state.db, &state.subscriptions, auth.vendor_id, &query)
        .await
        .map(Json)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Database error: {}", e),
                }),
            )
        })
}

/// Purchases joined with full lead detail. Buyer contact fields are only
/// served here, behind the purchase relation.
pub async fn get_purchased_leads(
    State(state): State<AppState>,
    auth: AuthVendor,
    Query(query): Query<PurchasedLeadsQuery>,
) -> Result<Json<PurchasedLeadsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (page, limit) = normalize_pagination(query.page, query.limit);

    let finder = LeadPurchases::find()
        .filter(lead_purchases::Column::VendorId.eq(auth.vendor_id));

    let total = finder.clone().count(&state.db).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Database error: {}", e),
            }),
        )
    })?;

    let purchases = finder
        .order_by_desc(lead_purchases::Column::PurchaseDate)
        .offset((page - 1) * limit)
        .limit(limit)
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

    let lead_ids: Vec<i32> = purchases.iter().map(|p| p.lead_id).collect();
    let lead_rows = Leads::find()
        .filter(leads::Column::Id.is_in(lead_ids))
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
    let by_id: HashMap<i32, leads::Model> =
        lead_rows.into_iter().map(|l| (l.id, l)).collect();

    let data: Vec<PurchasedLead> = purchases
        .into_iter()
        .filter_map(|purchase| {
            by_id.get(&purchase.lead_id).map(|lead| PurchasedLead {
                purchase: PurchaseRecord::from(purchase),
                lead: LeadDetail::from(lead.clone()),
            })
        })
        .collect();

    Ok(Json(PurchasedLeadsResponse {
        data,
        pagination: Pagination { page, limit, total },
    }))
}
