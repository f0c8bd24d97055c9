//! SeaORM Entity for lead purchases
//!
//! Immutable once created. The unique (vendor_id, lead_id) index is what
//! serializes concurrent purchase attempts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lead_purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub lead_id: i32,
    pub purchase_date: DateTime,
    pub amount: Decimal,
    /// AUTO | USE_WEEKLY | BUY_EXTRA | PAID
    pub mode: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
