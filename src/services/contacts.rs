//! Contact logger
//!
//! Records outreach attempts against a purchased (or owned) lead. Every
//! logged contact increments all three usage counters unconditionally:
//! quota exhaustion gates lead visibility, never post-purchase follow-up.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::lead_contacts::{self, Entity as LeadContacts};
use crate::entities::lead_purchases::{self, Entity as LeadPurchases};
use crate::entities::leads::Entity as Leads;
use crate::entities::vendor_quotas::{self, Entity as VendorQuotas};
use crate::models::contact::{ContactStatus, LogContactRequest};
use crate::services::{quota, subscription};

#[derive(Debug)]
pub enum ContactError {
    LeadNotFound,
    /// No purchase record and not the owning vendor
    NotPurchased,
    ContactNotFound,
    NotOwner,
    Db(DbErr),
}

impl std::fmt::Display for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::LeadNotFound => write!(f, "Lead not found"),
            ContactError::NotPurchased => write!(f, "Lead not purchased"),
            ContactError::ContactNotFound => write!(f, "Contact not found"),
            ContactError::NotOwner => write!(f, "Contact belongs to another vendor"),
            ContactError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ContactError {}

impl From<DbErr> for ContactError {
    fn from(e: DbErr) -> Self {
        ContactError::Db(e)
    }
}

/// Log an outreach attempt. Returns the contact row and the post-increment
/// quota snapshot so the caller can push a UI event without a refetch.
pub async fn log_contact(
    db: &DatabaseConnection,
    subs: &subscription::SubscriptionService,
    vendor_id: Uuid,
    lead_id: i32,
    request: LogContactRequest,
) -> Result<(lead_contacts::Model, vendor_quotas::Model), ContactError> {
    let lead = Leads::find_by_id(lead_id)
        .one(db)
        .await?
        .ok_or(ContactError::LeadNotFound)?;

    // Direct proposals belong to the vendor; everything else needs a
    // purchase record
    let owns_lead = lead.vendor_id == Some(vendor_id);
    if !owns_lead {
        let purchased = LeadPurchases::find()
            .filter(lead_purchases::Column::VendorId.eq(vendor_id))
            .filter(lead_purchases::Column::LeadId.eq(lead_id))
            .one(db)
            .await?
            .is_some();
        if !purchased {
            return Err(ContactError::NotPurchased);
        }
    }

    let now = Utc::now().naive_utc();
    let plan = subs
        .resolve_active(db, vendor_id)
        .await?
        .map(|(_, plan)| plan);
    quota::ensure_fresh(db, vendor_id, plan.as_ref()).await?;

    // Unconditional: no limit guard, logging is never blocked by exhaustion
    VendorQuotas::update_many()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .col_expr(
            vendor_quotas::Column::DailyUsed,
            Expr::col(vendor_quotas::Column::DailyUsed).add(1),
        )
        .col_expr(
            vendor_quotas::Column::WeeklyUsed,
            Expr::col(vendor_quotas::Column::WeeklyUsed).add(1),
        )
        .col_expr(
            vendor_quotas::Column::YearlyUsed,
            Expr::col(vendor_quotas::Column::YearlyUsed).add(1),
        )
        .col_expr(vendor_quotas::Column::UpdatedAt, Expr::value(now))
        .exec(db)
        .await?;

    let contact = lead_contacts::ActiveModel {
        vendor_id: Set(vendor_id),
        lead_id: Set(lead_id),
        contact_type: Set(request.contact_type.to_string()),
        status: Set(ContactStatus::Pending.to_string()),
        contact_date: Set(request.contact_date.unwrap_or(now)),
        notes: Set(request.notes),
        created_at: Set(now),
        ..Default::default()
    };
    let contact = contact.insert(db).await?;

    let quota_after = VendorQuotas::find()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("vendor quota row".to_string()))?;

    Ok((contact, quota_after))
}

/// Follow-up progression on an existing contact (own contacts only)
pub async fn update_status(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    contact_id: i32,
    status: ContactStatus,
) -> Result<lead_contacts::Model, ContactError> {
    let contact = LeadContacts::find_by_id(contact_id)
        .one(db)
        .await?
        .ok_or(ContactError::ContactNotFound)?;
    if contact.vendor_id != vendor_id {
        return Err(ContactError::NotOwner);
    }

    let mut active: lead_contacts::ActiveModel = contact.into();
    active.status = Set(status.to_string());
    Ok(active.update(db).await?)
}
