//! SeaORM Entity for vendor lead preferences
//!
//! One-to-one with vendors, created lazily on first save. Category and
//! location preferences are free-text JSON arrays matched against lead
//! text fields by the eligibility filter.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_preferences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vendor_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub categories: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub states: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub cities: Option<Json>,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub auto_lead_filter: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
