use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rolling-window purchase/contact aggregates for the vendor dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadStatsResponse {
    /// Purchases since local midnight
    pub today: u64,
    /// Purchases in the trailing 7 days
    pub last_7_days: u64,
    /// Purchases in the trailing 365 days
    pub last_365_days: u64,
    pub total_spend: Decimal,
    pub contacts_logged: u64,
    /// CONVERTED contacts / purchases, as a fraction in [0, 1]
    pub conversion_rate: f64,
}
