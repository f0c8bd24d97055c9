//! Privileged vendor-ID migration.
//!
//! Rewrites a vendor's id across every owning table in one transaction.
//! Used when a vendor's identity-provider subject changes (account merge,
//! provider migration). The old id must exist and the new one must not.

use std::env;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Database, EntityTrait, QueryFilter, TransactionTrait};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use leadmarket_backend::entities::{
    cashout_requests, lead_contacts, lead_purchases, leads, prelude::*, referral_wallets,
    referrals, subscriptions, vendor_preferences, vendor_quotas, vendors,
    wallet_ledger_entries,
};

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
    if args.len() < 3 {
        eprintln!("Usage: cargo run --bin migrate_vendor_ids -- <old_vendor_id> <new_vendor_id>");
        std::process::exit(1);
    }

    let old_id: Uuid = args[1].parse().unwrap_or_else(|_| {
        eprintln!("Invalid old_vendor_id. Must be a UUID.");
        std::process::exit(1);
    });
    let new_id: Uuid = args[2].parse().unwrap_or_else(|_| {
        eprintln!("Invalid new_vendor_id. Must be a UUID.");
        std::process::exit(1);
    });

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    if Vendors::find_by_id(old_id).one(&db).await?.is_none() {
        eprintln!("No vendor with id {}", old_id);
        std::process::exit(1);
    }
    if Vendors::find_by_id(new_id).one(&db).await?.is_some() {
        eprintln!("Vendor id {} already exists", new_id);
        std::process::exit(1);
    }

    tracing::info!(%old_id, %new_id, "Migrating vendor id");
    let txn = db.begin().await?;

    Vendors::update_many()
        .filter(vendors::Column::Id.eq(old_id))
        .col_expr(vendors::Column::Id, Expr::value(new_id))
        .exec(&txn)
        .await?;
    VendorPreferences::update_many()
        .filter(vendor_preferences::Column::VendorId.eq(old_id))
        .col_expr(vendor_preferences::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    VendorQuotas::update_many()
        .filter(vendor_quotas::Column::VendorId.eq(old_id))
        .col_expr(vendor_quotas::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    Subscriptions::update_many()
        .filter(subscriptions::Column::VendorId.eq(old_id))
        .col_expr(subscriptions::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    Leads::update_many()
        .filter(leads::Column::VendorId.eq(old_id))
        .col_expr(leads::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    LeadPurchases::update_many()
        .filter(lead_purchases::Column::VendorId.eq(old_id))
        .col_expr(lead_purchases::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    LeadContacts::update_many()
        .filter(lead_contacts::Column::VendorId.eq(old_id))
        .col_expr(lead_contacts::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    Referrals::update_many()
        .filter(referrals::Column::ReferrerVendorId.eq(old_id))
        .col_expr(referrals::Column::ReferrerVendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    Referrals::update_many()
        .filter(referrals::Column::ReferredVendorId.eq(old_id))
        .col_expr(referrals::Column::ReferredVendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    ReferralWallets::update_many()
        .filter(referral_wallets::Column::VendorId.eq(old_id))
        .col_expr(referral_wallets::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    WalletLedgerEntries::update_many()
        .filter(wallet_ledger_entries::Column::VendorId.eq(old_id))
        .col_expr(wallet_ledger_entries::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;
    CashoutRequests::update_many()
        .filter(cashout_requests::Column::VendorId.eq(old_id))
        .col_expr(cashout_requests::Column::VendorId, Expr::value(new_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    tracing::info!(%old_id, %new_id, "Vendor id migrated");

    Ok(())
}
