//! SeaORM Entity for subscription plans
//!
//! Plan catalog joined by the subscription resolver. A limit of 0 means
//! the period is unlimited.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub daily_limit: i32,
    pub weekly_limit: i32,
    pub yearly_limit: i32,
    /// Subscription price
    pub price: Decimal,
    /// Price of one BUY_EXTRA top-up lead beyond quota
    pub extra_lead_price: Decimal,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
