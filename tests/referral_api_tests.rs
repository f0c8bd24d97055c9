mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use leadmarket_backend::entities::{prelude::*, referral_wallets, referrals};
use leadmarket_backend::handlers;
use leadmarket_backend::AppState;

use crate::common::{seed_vendor, setup_test_db, test_state, INTERNAL_API_KEY};

fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/referrals/me",
            get(handlers::referral::get_referral_dashboard),
        )
        .route("/api/referrals/link", post(handlers::referral::link_referral))
        .route(
            "/api/referrals/cashouts",
            get(handlers::referral::list_cashouts),
        )
        .route(
            "/api/referrals/cashout",
            post(handlers::referral::create_cashout),
        )
        .route(
            "/api/internal/payments/completed",
            post(handlers::internal::payment_completed),
        )
        .with_state(state)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
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

async fn seed_wallet(
    db: &sea_orm::DatabaseConnection,
    vendor_id: Uuid,
    available: Decimal,
) -> referral_wallets::Model {
    let now = Utc::now().naive_utc();
    referral_wallets::ActiveModel {
        vendor_id: Set(vendor_id),
        available_balance: Set(available),
        pending_balance: Set(Decimal::ZERO),
        reserved_balance: Set(Decimal::ZERO),
        lifetime_earned: Set(available),
        lifetime_paid_out: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed wallet")
}

#[tokio::test]
async fn malformed_referral_code_is_rejected_before_any_write() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    seed_vendor(&db, vendor_id).await;

    let app = build_router(state);
    // Empty after normalization
    let response = app
        .clone()
        .oneshot(post_json("/api/referrals/link", &token, r#"{"code":"   "}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/api/referrals/link",
            &token,
            r#"{"code":"no spaces!"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let links = Referrals::find()
        .filter(referrals::Column::ReferredVendorId.eq(vendor_id))
        .all(&db)
        .await
        .unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn linking_own_code_is_an_invalid_code() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    let vendor = seed_vendor(&db, vendor_id).await;

    let app = build_router(state);
    let body = format!(r#"{{"code":"{}"}}"#, vendor.referral_code);
    let response = app
        .oneshot(post_json("/api/referrals/link", &token, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Invalid referral code");
}

#[tokio::test]
async fn second_link_for_the_same_vendor_conflicts() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    seed_vendor(&db, vendor_id).await;
    let referrer_a = seed_vendor(&db, Uuid::new_v4()).await;
    let referrer_b = seed_vendor(&db, Uuid::new_v4()).await;

    let app = build_router(state);
    let first = app
        .clone()
        .oneshot(post_json(
            "/api/referrals/link",
            &token,
            &format!(r#"{{"code":"{}"}}"#, referrer_a.referral_code),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = json_body(first).await;
    assert_eq!(json["status"], "LINKED");

    let second = app
        .oneshot(post_json(
            "/api/referrals/link",
            &token,
            &format!(r#"{{"code":"{}"}}"#, referrer_b.referral_code),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn payment_completion_accrues_reward_once() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, referred_id) = test_state(db.clone()).await;
    seed_vendor(&db, referred_id).await;
    let referrer = seed_vendor(&db, Uuid::new_v4()).await;

    let app = build_router(state);
    let link = app
        .clone()
        .oneshot(post_json(
            "/api/referrals/link",
            &token,
            &format!(r#"{{"code":"{}"}}"#, referrer.referral_code),
        ))
        .await
        .unwrap();
    assert_eq!(link.status(), StatusCode::OK);

    let payload = format!(
        r#"{{"vendor_id":"{}","payment_id":"{}"}}"#,
        referred_id,
        Uuid::new_v4()
    );
    let webhook = |body: String| {
        Request::builder()
            .method("POST")
            .uri("/api/internal/payments/completed")
            .header("x-internal-api-key", INTERNAL_API_KEY)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    };

    let first = app.clone().oneshot(webhook(payload.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(json_body(first).await["reward_accrued"], true);

    // Retry is a no-op: the referral already left LINKED
    let second = app.oneshot(webhook(payload)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await["reward_accrued"], false);

    // The reward accrued exactly once, into pending
    let wallet = ReferralWallets::find()
        .filter(referral_wallets::Column::VendorId.eq(referrer.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(wallet.pending_balance, Decimal::new(50000, 2));
    assert_eq!(wallet.lifetime_earned, Decimal::new(50000, 2));
    assert_eq!(wallet.available_balance, Decimal::ZERO);

    let referral = Referrals::find()
        .filter(referrals::Column::ReferredVendorId.eq(referred_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(referral.status, "REWARDED");
}

#[tokio::test]
async fn payment_webhook_requires_the_internal_key() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, _token, _vendor_id) = test_state(db).await;
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/internal/payments/completed")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(
                    r#"{{"vendor_id":"{}","payment_id":"{}"}}"#,
                    Uuid::new_v4(),
                    Uuid::new_v4()
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cashout_exceeding_available_balance_conflicts() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    seed_vendor(&db, vendor_id).await;
    seed_wallet(&db, vendor_id, Decimal::new(10000, 2)).await; // 100.00

    let app = build_router(state);
    let response = app
        .oneshot(post_json(
            "/api/referrals/cashout",
            &token,
            r#"{"amount":"150.00","bank_detail_id":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = json_body(response).await;
    assert_eq!(json["error"], "Amount exceeds available balance");
}

#[tokio::test]
async fn two_cashouts_cannot_jointly_overdraw() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    seed_vendor(&db, vendor_id).await;
    seed_wallet(&db, vendor_id, Decimal::new(10000, 2)).await; // 100.00

    let app = build_router(state);
    let request = r#"{"amount":"60.00","bank_detail_id":1}"#;

    let first = app
        .clone()
        .oneshot(post_json("/api/referrals/cashout", &token, request))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let json = json_body(first).await;
    assert_eq!(json["status"], "PENDING");

    // 60 + 60 > 100: the hold placed by the first request blocks the second
    let second = app
        .oneshot(post_json("/api/referrals/cashout", &token, request))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let wallet = ReferralWallets::find()
        .filter(referral_wallets::Column::VendorId.eq(vendor_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(wallet.available_balance, Decimal::new(4000, 2));
    assert_eq!(wallet.reserved_balance, Decimal::new(6000, 2));
}

#[tokio::test]
async fn dashboard_returns_wallet_settings_and_ledger() {
    let db = setup_test_db().await.expect("Failed to connect to test DB");
    let (state, token, vendor_id) = test_state(db.clone()).await;
    let vendor = seed_vendor(&db, vendor_id).await;

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/referrals/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["profile"]["referral_code"], vendor.referral_code);
    // Wallet is created lazily on first read
    assert_eq!(json["wallet"]["available_balance"], "0");
    assert_eq!(json["settings"]["maturity_days"], 7);
    assert!(json["recent_referrals"].as_array().unwrap().is_empty());
    assert!(json["ledger"].as_array().unwrap().is_empty());
}
