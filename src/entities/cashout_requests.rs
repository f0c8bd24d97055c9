//! SeaORM Entity for cashout requests
//!
//! The balance check happens atomically at creation time and is never
//! retroactively revalidated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cashout_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub amount: Decimal,
    pub bank_detail_id: i32,
    pub note: Option<String>,
    /// PENDING | PAID | REJECTED
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
