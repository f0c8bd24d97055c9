//! SeaORM Entity for vendor quota counters
//!
//! Used counters are monotonic between resets and zeroed exactly once per
//! boundary crossing by the reset engine. Watermarks are nullable; the
//! engine falls back to updated_at/created_at when absent. Limit columns
//! are a snapshot of the active plan, refreshed on read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_quotas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub daily_used: i32,
    pub weekly_used: i32,
    pub yearly_used: i32,
    pub daily_limit: i32,
    pub weekly_limit: i32,
    pub yearly_limit: i32,
    pub daily_reset_at: Option<DateTime>,
    pub weekly_reset_at: Option<DateTime>,
    pub yearly_reset_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
