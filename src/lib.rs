// src/lib.rs

use handlers::events_ws::EventBroadcaster;
use sea_orm::DatabaseConnection;
use services::config::AppConfig;
use services::identity::IdentityService;
use services::subscription::SubscriptionService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub identity: IdentityService,
    pub subscriptions: SubscriptionService,
    pub events: EventBroadcaster,
}

pub mod entities {
    pub mod prelude;
    pub mod cashout_requests;
    pub mod lead_contacts;
    pub mod lead_purchases;
    pub mod leads;
    pub mod plans;
    pub mod referral_wallets;
    pub mod referrals;
    pub mod subscriptions;
    pub mod vendor_preferences;
    pub mod vendor_quotas;
    pub mod vendors;
    pub mod wallet_ledger_entries;
}

pub mod services {
    pub mod config;
    pub mod contacts;
    pub mod eligibility;
    pub mod identity;
    pub mod purchase;
    pub mod quota;
    pub mod referral;
    pub mod subscription;
}

pub mod models;
pub mod handlers;
