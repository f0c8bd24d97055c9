use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use leadmarket_backend::entities::{leads, plans, subscriptions, vendor_quotas, vendors};
use leadmarket_backend::handlers::events_ws::EventBroadcaster;
use leadmarket_backend::services::config::AppConfig;
use leadmarket_backend::services::identity::{IdentityService, StaticTokenVerifier};
use leadmarket_backend::services::quota::boundaries;
use leadmarket_backend::services::subscription::SubscriptionService;
use leadmarket_backend::AppState;

pub const INTERNAL_API_KEY: &str = "test-internal-key";

/// Set up test database connection and run migrations.
/// Uses TEST_DATABASE_URL environment variable or falls back to DATABASE_URL.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    dotenvy::dotenv().ok();
    let database_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .unwrap_or_else(|_| {
            "postgresql://leadmarket_user@localhost:5432/leadmarket_test".to_string()
        });

    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// App state wired with a static token table instead of a live identity
/// provider. Returns the state plus a (token, vendor_id) pair.
pub async fn test_state(db: DatabaseConnection) -> (AppState, String, Uuid) {
    let vendor_id = Uuid::new_v4();
    let token = format!("test-token-{}", Uuid::new_v4());

    let mut tokens = HashMap::new();
    tokens.insert(token.clone(), vendor_id);

    let config = AppConfig {
        database_url: String::new(),
        bind_addr: String::new(),
        identity_base_url: String::new(),
        internal_api_key: INTERNAL_API_KEY.to_string(),
        referral_reward: Decimal::new(50000, 2), // 500.00
        referral_maturity_days: 7,
        token_cache_ttl_secs: 60,
    };

    let state = AppState {
        db,
        config,
        identity: IdentityService::new(Arc::new(StaticTokenVerifier::new(tokens)), 60),
        subscriptions: SubscriptionService::new(1),
        events: EventBroadcaster::new(),
    };

    (state, token, vendor_id)
}

fn short_code() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_uppercase()
}

pub async fn seed_vendor(db: &DatabaseConnection, vendor_id: Uuid) -> vendors::Model {
    let now = Utc::now().naive_utc();
    vendors::ActiveModel {
        id: Set(vendor_id),
        company_name: Set("Test Vendor Co".to_string()),
        contact_name: Set(None),
        email: Set(format!("vendor-{}@example.com", vendor_id)),
        phone: Set(None),
        referral_code: Set(short_code()),
        status: Set("ACTIVE".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed vendor")
}

pub async fn seed_plan(
    db: &DatabaseConnection,
    daily: i32,
    weekly: i32,
    yearly: i32,
) -> plans::Model {
    let now = Utc::now().naive_utc();
    plans::ActiveModel {
        name: Set(format!("Plan {}", short_code())),
        daily_limit: Set(daily),
        weekly_limit: Set(weekly),
        yearly_limit: Set(yearly),
        price: Set(Decimal::new(99900, 2)),
        extra_lead_price: Set(Decimal::new(4900, 2)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed plan")
}

pub async fn seed_active_subscription(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    plan_id: i32,
) -> subscriptions::Model {
    let now = Utc::now().naive_utc();
    subscriptions::ActiveModel {
        vendor_id: Set(vendor_id),
        plan_id: Set(plan_id),
        status: Set("ACTIVE".to_string()),
        start_date: Set(now - chrono::Duration::days(10)),
        end_date: Set(Some(now + chrono::Duration::days(20))),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed subscription")
}

/// Quota row with watermarks at the current boundaries so no reset fires
/// during the test.
pub async fn seed_quota(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    used: (i32, i32, i32),
    limits: (i32, i32, i32),
) -> vendor_quotas::Model {
    let now = Utc::now().naive_utc();
    let b = boundaries(now);
    vendor_quotas::ActiveModel {
        vendor_id: Set(vendor_id),
        daily_used: Set(used.0),
        weekly_used: Set(used.1),
        yearly_used: Set(used.2),
        daily_limit: Set(limits.0),
        weekly_limit: Set(limits.1),
        yearly_limit: Set(limits.2),
        daily_reset_at: Set(Some(b.day_start)),
        weekly_reset_at: Set(Some(b.week_start)),
        yearly_reset_at: Set(Some(b.year_start)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed quota")
}

pub async fn seed_lead(db: &DatabaseConnection, title: &str) -> leads::Model {
    let now = Utc::now().naive_utc();
    leads::ActiveModel {
        title: Set(title.to_string()),
        product_name: Set("Industrial Widgets".to_string()),
        budget: Set(Some(Decimal::new(2500000, 2))),
        quantity: Set(100),
        location: Set(Some("Pune, Maharashtra".to_string())),
        status: Set("AVAILABLE".to_string()),
        buyer_name: Set("Test Buyer".to_string()),
        buyer_email: Set(Some("buyer@example.com".to_string())),
        buyer_phone: Set(Some("+911234567890".to_string())),
        vendor_id: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to seed lead")
}
