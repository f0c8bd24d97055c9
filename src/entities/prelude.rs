pub use super::cashout_requests::Entity as CashoutRequests;
pub use super::lead_contacts::Entity as LeadContacts;
pub use super::lead_purchases::Entity as LeadPurchases;
pub use super::leads::Entity as Leads;
pub use super::plans::Entity as Plans;
pub use super::referral_wallets::Entity as ReferralWallets;
pub use super::referrals::Entity as Referrals;
pub use super::subscriptions::Entity as Subscriptions;
pub use super::vendor_preferences::Entity as VendorPreferences;
pub use super::vendor_quotas::Entity as VendorQuotas;
pub use super::vendors::Entity as Vendors;
pub use super::wallet_ledger_entries::Entity as WalletLedgerEntries;
