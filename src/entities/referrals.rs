//! SeaORM Entity for referral edges
//!
//! Status machine: LINKED -> QUALIFIED -> REWARDED, terminal REJECTED.
//! A vendor can be referred at most once (unique referred_vendor_id).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "referrals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub referrer_vendor_id: Uuid,
    pub referred_vendor_id: Uuid,
    /// The referral code that was submitted at link time
    pub code: String,
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
