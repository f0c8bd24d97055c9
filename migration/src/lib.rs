pub use sea_orm_migration::prelude::*;

mod m20250310_000001_create_vendors;
mod m20250310_000002_create_plans;
mod m20250310_000003_create_subscriptions;
mod m20250312_000001_create_leads;
mod m20250312_000002_create_lead_purchases;
mod m20250314_000001_create_vendor_quotas;
mod m20250318_000001_create_lead_contacts;
mod m20250402_000001_create_vendor_preferences;
mod m20250415_000001_create_referrals;
mod m20250415_000002_create_referral_wallets;
mod m20250415_000003_create_wallet_ledger_entries;
mod m20250418_000001_create_cashout_requests;
mod m20250506_000001_add_plan_extra_lead_price;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_vendors::Migration),
            Box::new(m20250310_000002_create_plans::Migration),
            Box::new(m20250310_000003_create_subscriptions::Migration),
            Box::new(m20250312_000001_create_leads::Migration),
            Box::new(m20250312_000002_create_lead_purchases::Migration),
            Box::new(m20250314_000001_create_vendor_quotas::Migration),
            Box::new(m20250318_000001_create_lead_contacts::Migration),
            Box::new(m20250402_000001_create_vendor_preferences::Migration),
            Box::new(m20250415_000001_create_referrals::Migration),
            Box::new(m20250415_000002_create_referral_wallets::Migration),
            Box::new(m20250415_000003_create_wallet_ledger_entries::Migration),
            Box::new(m20250418_000001_create_cashout_requests::Migration),
            Box::new(m20250506_000001_add_plan_extra_lead_price::Migration),
        ]
    }
}
