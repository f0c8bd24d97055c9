//! Presentation-layer events pushed over the vendor WebSocket stream.
//!
//! These are UI refresh hints, not durable notifications: delivery is
//! best-effort and a dropped event only costs the client a refetch.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::quota::QuotaSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VendorEventKind {
    #[serde(rename = "contact.logged")]
    ContactLogged,
    #[serde(rename = "lead.purchased")]
    LeadPurchased,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorEvent {
    #[serde(rename = "type")]
    pub kind: VendorEventKind,
    pub vendor_id: Uuid,
    pub lead_id: i32,
    /// Counter state after the triggering operation, so dependent widgets
    /// can update without a refetch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaSnapshot>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}
