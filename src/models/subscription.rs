use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::{plans, subscriptions};

/// Stored subscription status. Not an activity predicate: an ACTIVE row
/// whose end_date has passed is reported inactive by the resolver without
/// being transitioned here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "ACTIVE"),
            SubscriptionStatus::Expired => write!(f, "EXPIRED"),
            SubscriptionStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(SubscriptionStatus::Active),
            "EXPIRED" => Ok(SubscriptionStatus::Expired),
            "CANCELLED" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(format!("Unknown subscription status: {}", s)),
        }
    }
}

/// Subscription joined with its plan, as returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSnapshot {
    pub id: i32,
    pub plan_id: i32,
    pub plan_name: String,
    pub status: String,
    pub is_active: bool,
    pub start_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    pub days_left: i64,
    pub daily_limit: i32,
    pub weekly_limit: i32,
    pub yearly_limit: i32,
}

impl SubscriptionSnapshot {
    pub fn new(
        subscription: &subscriptions::Model,
        plan: &plans::Model,
        is_active: bool,
        days_left: i64,
    ) -> Self {
        Self {
            id: subscription.id,
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            status: subscription.status.clone(),
            is_active,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            days_left,
            daily_limit: plan.daily_limit,
            weekly_limit: plan.weekly_limit,
            yearly_limit: plan.yearly_limit,
        }
    }
}
