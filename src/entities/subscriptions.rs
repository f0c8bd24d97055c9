//! SeaORM Entity for vendor subscriptions
//!
//! At most one ACTIVE row per vendor is authoritative. `status` is not
//! kept in sync with date expiry; callers must use the computed activity
//! predicate in `services::subscription`, never `status` alone.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub plan_id: i32,
    /// ACTIVE | EXPIRED | CANCELLED
    pub status: String,
    pub start_date: DateTime,
    pub end_date: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
