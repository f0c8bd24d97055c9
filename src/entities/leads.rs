//! SeaORM Entity for buyer-submitted leads
//!
//! Buyer contact fields are only exposed to a vendor holding a purchase
//! record for the lead, or to the owning vendor of a direct proposal.
//! The listing endpoint serves a masked projection.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub product_name: String,
    pub budget: Option<Decimal>,
    pub quantity: i32,
    /// Free-text location; no foreign key to a location table
    pub location: Option<String>,
    /// AVAILABLE | SOLD | CLOSED
    pub status: String,
    pub buyer_name: String,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    /// Owning vendor for direct proposals; None for marketplace leads
    pub vendor_id: Option<Uuid>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
