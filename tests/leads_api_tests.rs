mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use tower::ServiceExt;

use leadmarket_backend::entities::{lead_purchases, vendor_quotas, prelude::*};
use leadmarket_backend::handlers;
use leadmarket_backend::AppState;

use crate::common::{
    seed_active_subscription, seed_lead, seed_plan, seed_quota, seed_vendor, setup_test_db,
    test_state,
};

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/leads", get(handlers::leads::get_available_leads))
        .route(
            "/api/leads/{lead_id}/purchase",
            post(handlers::purchase::purchase_lead),
        )
        .route(
            "/api/leads/{lead_id}/contacts",
            post(handlers::contacts::log_contact),
        )
        .with_state(state)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get_leads(token: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/leads")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn unauthenticated_request_is_rejected_before_core_logic() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, _token, _vendor_id) = test_state(db).await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/leads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, _token, _vendor_id) = test_state(db).await;
    let app = build_router(state);

    let response = app.oneshot(get_leads("not-a-real-token")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn vendor_without_subscription_gets_guidance_message() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    seed_vendor(&db, vendor_id).await;
    let app = build_router(state);

    let response = app.oneshot(get_leads(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    assert_eq!(
        json["message"],
        "No active subscription plan. Please subscribe to view leads."
    );
}

#[tokio::test]
async fn daily_limit_reached_withholds_leads() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    seed_quota(&db, vendor_id, (5, 2, 10), (5, 20, 100)).await;
    seed_lead(&db, "Visible only under quota").await;

    let app = build_router(state);
    let response = app.oneshot(get_leads(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    assert_eq!(json["message"], "Daily lead limit reached");
    // Weekly and yearly counters are untouched by the daily gate
    assert_eq!(json["quota"]["weekly_used"], 2);
    assert_eq!(json["quota"]["yearly_used"], 10);
}

#[tokio::test]
async fn subscribed_vendor_sees_recent_available_leads() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    seed_quota(&db, vendor_id, (0, 0, 0), (5, 20, 100)).await;
    let lead = seed_lead(&db, "Fresh marketplace lead").await;

    let app = build_router(state);
    let response = app.oneshot(get_leads(&token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert!(json["message"].is_null());
    let data = json["data"].as_array().unwrap();
    assert!(data.iter().any(|l| l["id"] == lead.id));
    // Buyer contact fields are masked on the listing
    assert!(data[0].get("buyer_email").is_none());
    assert!(data[0].get("buyer_phone").is_none());
}

#[tokio::test]
async fn duplicate_purchase_conflicts_and_spends_quota_once() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    seed_quota(&db, vendor_id, (0, 0, 0), (5, 20, 100)).await;
    let lead = seed_lead(&db, "Purchasable lead").await;

    let app = build_router(state);
    let uri = format!("/api/leads/{}/purchase", lead.id);

    let first = app
        .clone()
        .oneshot(post_json(&uri, &token, r#"{"mode":"AUTO"}"#))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = json_body(first).await;
    assert_eq!(json["purchase"]["lead_id"], lead.id);
    assert_eq!(json["quota"]["daily_used"], 1);

    let second = app
        .oneshot(post_json(&uri, &token, r#"{"mode":"AUTO"}"#))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    // Exactly one purchase row, and the counter moved exactly once
    let purchases = LeadPurchases::find()
        .filter(lead_purchases::Column::VendorId.eq(vendor_id))
        .filter(lead_purchases::Column::LeadId.eq(lead.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(purchases.len(), 1);

    let quota = VendorQuotas::find()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quota.daily_used, 1);
}

#[tokio::test]
async fn use_weekly_purchase_skips_the_daily_counter() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    // Daily already exhausted
    seed_quota(&db, vendor_id, (5, 2, 10), (5, 20, 100)).await;
    let lead = seed_lead(&db, "Weekly allowance lead").await;

    let app = build_router(state);
    let uri = format!("/api/leads/{}/purchase", lead.id);
    let response = app
        .oneshot(post_json(&uri, &token, r#"{"mode":"USE_WEEKLY"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["quota"]["daily_used"], 5);
    assert_eq!(json["quota"]["weekly_used"], 3);
    assert_eq!(json["quota"]["yearly_used"], 11);
}

#[tokio::test]
async fn exhausted_auto_purchase_returns_message_not_error() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    seed_quota(&db, vendor_id, (5, 2, 10), (5, 20, 100)).await;
    let lead = seed_lead(&db, "Out of quota lead").await;

    let app = build_router(state);
    let uri = format!("/api/leads/{}/purchase", lead.id);
    let response = app
        .oneshot(post_json(&uri, &token, r#"{"mode":"AUTO"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert!(json.get("purchase").is_none());
    assert_eq!(json["message"], "Daily lead limit reached");
}

#[tokio::test]
async fn contact_logging_increments_counters_even_at_the_limit() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let plan = seed_plan(&db, 5, 20, 100).await;
    seed_active_subscription(&db, vendor_id, plan.id).await;
    seed_quota(&db, vendor_id, (5, 2, 10), (5, 20, 100)).await;
    let lead = seed_lead(&db, "Purchased, now following up").await;

    // Purchased ten minutes ago
    lead_purchases::ActiveModel {
        vendor_id: Set(vendor_id),
        lead_id: Set(lead.id),
        purchase_date: Set(Utc::now().naive_utc() - chrono::Duration::minutes(10)),
        amount: Set(rust_decimal::Decimal::ZERO),
        mode: Set("AUTO".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = build_router(state);
    let uri = format!("/api/leads/{}/contacts", lead.id);
    let response = app
        .oneshot(post_json(
            &uri,
            &token,
            r#"{"contact_type":"WHATSAPP","notes":"Intro call scheduled"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["contact_type"], "WHATSAPP");
    assert_eq!(json["status"], "PENDING");

    // All three counters move by exactly 1, past the daily limit
    let quota = VendorQuotas::find()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(quota.daily_used, 6);
    assert_eq!(quota.weekly_used, 3);
    assert_eq!(quota.yearly_used, 11);
}

#[tokio::test]
async fn contact_logging_without_purchase_is_forbidden() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;

    seed_vendor(&db, vendor_id).await;
    let lead = seed_lead(&db, "Never purchased").await;

    let app = build_router(state);
    let uri = format!("/api/leads/{}/contacts", lead.id);
    let response = app
        .oneshot(post_json(&uri, &token, r#"{"contact_type":"CALL"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Lead not purchased");

    // Fails closed: no contact row was written
    let contacts = LeadContacts::find()
        .filter(
            leadmarket_backend::entities::lead_contacts::Column::VendorId.eq(vendor_id),
        )
        .all(&db)
        .await
        .unwrap();
    assert!(contacts.is_empty());
}
