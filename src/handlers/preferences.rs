//! Vendor preference endpoints
//!
//! The preference row is created lazily on first save; reading before any
//! save returns defaults.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::entities::vendor_preferences::{self, Entity as VendorPreferences};
use crate::handlers::auth::AuthVendor;
use crate::models::common::ErrorResponse;
use crate::models::preference::{PreferencesResponse, UpdatePreferencesRequest};
use crate::AppState;

fn db_error(e: sea_orm::DbErr) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Database error: {}", e),
        }),
    )
}

pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthVendor,
) -> Result<Json<PreferencesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let existing = VendorPreferences::find()
        .filter(vendor_preferences::Column::VendorId.eq(auth.vendor_id))
        .one(&state.db)
        .await
        .map_err(db_error)?;

    let response = existing.map(PreferencesResponse::from).unwrap_or(
        PreferencesResponse {
            categories: vec![],
            states: vec![],
            cities: vec![],
            budget_min: None,
            budget_max: None,
            auto_lead_filter: false,
        },
    );
    Ok(Json(response))
}

fn to_json(values: Vec<String>) -> serde_json::Value {
    serde_json::Value::Array(values.into_iter().map(serde_json::Value::String).collect())
}

pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthVendor,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferencesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let now = Utc::now().naive_utc();
    let existing = VendorPreferences::find()
        .filter(vendor_preferences::Column::VendorId.eq(auth.vendor_id))
        .one(&state.db)
        .await
        .map_err(db_error)?;

    let updated = match existing {
        Some(model) => {
            let mut active: vendor_preferences::ActiveModel = model.into();
            if let Some(categories) = payload.categories {
                active.categories = Set(Some(to_json(categories)));
            }
            if let Some(states) = payload.states {
                active.states = Set(Some(to_json(states)));
            }
            if let Some(cities) = payload.cities {
                active.cities = Set(Some(to_json(cities)));
            }
            if let Some(budget_min) = payload.budget_min {
                active.budget_min = Set(Some(budget_min));
            }
            if let Some(budget_max) = payload.budget_max {
                active.budget_max = Set(Some(budget_max));
            }
            if let Some(auto) = payload.auto_lead_filter {
                active.auto_lead_filter = Set(auto);
            }
            active.updated_at = Set(now);
            active.update(&state.db).await.map_err(db_error)?
        }
        None => {
            let fresh = vendor_preferences::ActiveModel {
                vendor_id: Set(auth.vendor_id),
                categories: Set(payload.categories.map(to_json)),
                states: Set(payload.states.map(to_json)),
                cities: Set(payload.cities.map(to_json)),
                budget_min: Set(payload.budget_min),
                budget_max: Set(payload.budget_max),
                auto_lead_filter: Set(payload.auto_lead_filter.unwrap_or(false)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            fresh.insert(&state.db).await.map_err(db_error)?
        }
    };

    Ok(Json(PreferencesResponse::from(updated)))
}
