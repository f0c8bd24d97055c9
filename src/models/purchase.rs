use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::lead_purchases;
use crate::models::common::Pagination;
use crate::models::lead::LeadDetail;
use crate::models::quota::QuotaSnapshot;
use crate::models::subscription::SubscriptionSnapshot;

/// How a purchase is funded.
///
/// AUTO lets the server decide: consume quota when every limit admits one
/// more unit, otherwise fall back to a paid purchase when an amount was
/// supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseMode {
    Auto,
    UseWeekly,
    BuyExtra,
    Paid,
}

impl std::fmt::Display for PurchaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseMode::Auto => write!(f, "AUTO"),
            PurchaseMode::UseWeekly => write!(f, "USE_WEEKLY"),
            PurchaseMode::BuyExtra => write!(f, "BUY_EXTRA"),
            PurchaseMode::Paid => write!(f, "PAID"),
        }
    }
}

impl std::str::FromStr for PurchaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" => Ok(PurchaseMode::Auto),
            "USE_WEEKLY" => Ok(PurchaseMode::UseWeekly),
            "BUY_EXTRA" => Ok(PurchaseMode::BuyExtra),
            "PAID" => Ok(PurchaseMode::Paid),
            _ => Err(format!("Unknown purchase mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseLeadRequest {
    pub mode: PurchaseMode,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: i32,
    pub lead_id: i32,
    pub purchase_date: NaiveDateTime,
    pub amount: Decimal,
    pub mode: String,
}

impl From<lead_purchases::Model> for PurchaseRecord {
    fn from(model: lead_purchases::Model) -> Self {
        Self {
            id: model.id,
            lead_id: model.lead_id,
            purchase_date: model.purchase_date,
            amount: model.amount,
            mode: model.mode,
        }
    }
}

/// Server-validated purchase result with the post-purchase quota and
/// subscription snapshot the UI should adopt. Quota exhaustion and a
/// missing subscription are steady-state outcomes: they come back as an
/// empty response with `message` set, not as an error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLeadResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase: Option<PurchaseRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One row of GET /api/leads/purchased: the purchase plus the unlocked lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedLead {
    pub purchase: PurchaseRecord,
    pub lead: LeadDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedLeadsResponse {
    pub data: Vec<PurchasedLead>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchasedLeadsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
