//! Maturation trigger for referral rewards.
//!
//! Pending credit entries older than the maturity window move from
//! pending_balance to available_balance. This is the external trigger the
//! request path deliberately does not run; schedule it daily.

use std::env;

use sea_orm::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadmarket_backend::services::referral;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leadmarket_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let maturity_days: i64 = env::var("REFERRAL_MATURITY_DAYS")
        .unwrap_or_else(|_| "7".to_string())
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("Invalid REFERRAL_MATURITY_DAYS. Must be a number of days.");
            std::process::exit(1);
        });

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Releasing credits older than {} days", maturity_days);
    let released = referral::release_matured(&db, maturity_days).await?;
    tracing::info!("Released {} matured reward entries", released);

    Ok(())
}
