use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::vendor_quotas;

/// Quota counters as returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    pub daily_used: i32,
    pub weekly_used: i32,
    pub yearly_used: i32,
    pub daily_limit: i32,
    pub weekly_limit: i32,
    pub yearly_limit: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_reset_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_reset_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_reset_at: Option<NaiveDateTime>,
}

impl From<vendor_quotas::Model> for QuotaSnapshot {
    fn from(model: vendor_quotas::Model) -> Self {
        Self {
            daily_used: model.daily_used,
            weekly_used: model.weekly_used,
            yearly_used: model.yearly_used,
            daily_limit: model.daily_limit,
            weekly_limit: model.weekly_limit,
            yearly_limit: model.yearly_limit,
            daily_reset_at: model.daily_reset_at,
            weekly_reset_at: model.weekly_reset_at,
            yearly_reset_at: model.yearly_reset_at,
        }
    }
}
