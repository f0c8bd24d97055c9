//! SeaORM Entity for the append-only wallet ledger

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wallet_ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub vendor_id: Uuid,
    /// CREDIT | CASHOUT_HOLD | CASHOUT_PAID | CASHOUT_RETURNED
    pub entry_type: String,
    pub amount: Decimal,
    /// PENDING | RELEASED | SETTLED
    pub status: String,
    pub referral_id: Option<i32>,
    pub payment_id: Option<Uuid>,
    pub cashout_id: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
