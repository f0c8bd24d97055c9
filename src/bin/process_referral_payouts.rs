//! Privileged payout runner for pending cashout requests.
//!
//! Pays (or rejects) cashouts that finance has reviewed. Each settlement
//! runs in its own transaction: the reserved hold is released, the wallet
//! lifetime counters move, and a ledger entry is appended.

use std::env;

use sea_orm::{ColumnTrait, Database, EntityTrait, QueryFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadmarket_backend::entities::cashout_requests::{self, Entity as CashoutRequests};
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

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin process_referral_payouts -- <cashout_id> [--reject]");
        eprintln!("       cargo run --bin process_referral_payouts -- --all");
        std::process::exit(1);
    }

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    if args[1] == "--all" {
        let pending = CashoutRequests::find()
            .filter(cashout_requests::Column::Status.eq(referral::CASHOUT_PENDING))
            .all(&db)
            .await?;
        tracing::info!("Found {} pending cashout requests", pending.len());

        let mut paid = 0usize;
        for request in pending {
            match referral::process_payout(&db, request.id, true).await {
                Ok(settled) => {
                    tracing::info!(
                        cashout_id = settled.id,
                        vendor_id = %settled.vendor_id,
                        amount = %settled.amount,
                        "Cashout paid"
                    );
                    paid += 1;
                }
                Err(e) => {
                    tracing::error!(cashout_id = request.id, "Payout failed: {}", e);
                }
            }
        }
        tracing::info!("Paid {} cashout requests", paid);
        return Ok(());
    }

    let cashout_id: i32 = args[1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid cashout_id. Must be a number.");
        std::process::exit(1);
    });
    let approve = !args.iter().any(|a| a == "--reject");

    let settled = referral::process_payout(&db, cashout_id, approve).await?;
    tracing::info!(
        cashout_id = settled.id,
        vendor_id = %settled.vendor_id,
        amount = %settled.amount,
        status = %settled.status,
        "Cashout settled"
    );

    Ok(())
}
