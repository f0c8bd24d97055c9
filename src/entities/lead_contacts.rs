//! SeaORM Entity for logged contact attempts

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lead_contacts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    pub lead_id: i32,
    /// CALL | WHATSAPP | EMAIL
    pub contact_type: String,
    /// PENDING | CONTACTED | CONVERTED
    pub status: String,
    /// Caller-supplied outreach timestamp
    pub contact_date: DateTime,
    pub notes: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
