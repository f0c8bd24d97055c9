use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadmarket_backend::handlers;
use leadmarket_backend::handlers::events_ws::EventBroadcaster;
use leadmarket_backend::services::config::AppConfig;
use leadmarket_backend::services::identity::IdentityService;
use leadmarket_backend::services::subscription::SubscriptionService;
use leadmarket_backend::AppState;

/// Plan rows change rarely; five minutes of staleness is fine
const PLAN_CACHE_TTL_SECS: u64 = 300;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leadmarket_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Validate configuration before touching anything else
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let identity = IdentityService::http(
        config.identity_base_url.clone(),
        config.token_cache_ttl_secs,
    );
    let state = AppState {
        db,
        identity,
        subscriptions: SubscriptionService::new(PLAN_CACHE_TTL_SECS),
        events: EventBroadcaster::new(),
        config: config.clone(),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/leads", get(handlers::leads::get_available_leads))
        .route(
            "/api/leads/purchased",
            get(handlers::leads::get_purchased_leads),
        )
        .route("/api/leads/stats", get(handlers::stats::get_lead_stats))
        .route(
            "/api/leads/{lead_id}/purchase",
            post(handlers::purchase::purchase_lead),
        )
        .route(
            "/api/leads/{lead_id}/contacts",
            post(handlers::contacts::log_contact),
        )
        .route(
            "/api/contacts/{contact_id}/status",
            post(handlers::contacts::update_contact_status),
        )
        .route(
            "/api/preferences",
            get(handlers::preferences::get_preferences)
                .put(handlers::preferences::update_preferences),
        )
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
        .route("/api/events/ws", get(handlers::events_ws::vendor_events_ws))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

async fn health() -> &'static str {
    "OK"
}
