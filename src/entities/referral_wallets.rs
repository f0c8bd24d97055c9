//! SeaORM Entity for referral wallets
//!
//! Balances are only ever mutated through conditional SQL expressions in
//! the referral service; the wallet ledger is the reconciliation source of
//! truth. Invariants: available + pending + reserved <= lifetime_earned,
//! lifetime_paid_out <= lifetime_earned.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "referral_wallets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub available_balance: Decimal,
    pub pending_balance: Decimal,
    /// Held by open cashout requests
    pub reserved_balance: Decimal,
    pub lifetime_earned: Decimal,
    pub lifetime_paid_out: Decimal,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
