use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::leads;
use crate::models::common::Pagination;
use crate::models::quota::QuotaSnapshot;
use crate::models::subscription::SubscriptionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    Available,
    Sold,
    Closed,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::Available => write!(f, "AVAILABLE"),
            LeadStatus::Sold => write!(f, "SOLD"),
            LeadStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVAILABLE" => Ok(LeadStatus::Available),
            "SOLD" => Ok(LeadStatus::Sold),
            "CLOSED" => Ok(LeadStatus::Closed),
            _ => Err(format!("Unknown lead status: {}", s)),
        }
    }
}

/// Query filters for GET /api/leads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableLeadsQuery {
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Lead projection with buyer contact fields masked.
/// The full row is only exposed through the purchased-leads endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: i32,
    pub title: String,
    pub product_name: String,
    pub budget: Option<Decimal>,
    pub quantity: i32,
    pub location: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<leads::Model> for LeadSummary {
    fn from(model: leads::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            product_name: model.product_name,
            budget: model.budget,
            quantity: model.quantity,
            location: model.location,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

/// Full lead detail including buyer contact fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDetail {
    pub id: i32,
    pub title: String,
    pub product_name: String,
    pub budget: Option<Decimal>,
    pub quantity: i32,
    pub location: Option<String>,
    pub status: String,
    pub buyer_name: String,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<leads::Model> for LeadDetail {
    fn from(model: leads::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            product_name: model.product_name,
            budget: model.budget,
            quantity: model.quantity,
            location: model.location,
            status: model.status,
            buyer_name: model.buyer_name,
            buyer_email: model.buyer_email,
            buyer_phone: model.buyer_phone,
            created_at: model.created_at,
        }
    }
}

/// Response for GET /api/leads. `message` carries the quota/subscription
/// gate explanation when the lead set is withheld; it is guidance, not an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableLeadsResponse {
    pub data: Vec<LeadSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSnapshot>,
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
