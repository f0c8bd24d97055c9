use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::lead_contacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Call,
    Whatsapp,
    Email,
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactType::Call => write!(f, "CALL"),
            ContactType::Whatsapp => write!(f, "WHATSAPP"),
            ContactType::Email => write!(f, "EMAIL"),
        }
    }
}

impl std::str::FromStr for ContactType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CALL" => Ok(ContactType::Call),
            "WHATSAPP" => Ok(ContactType::Whatsapp),
            "EMAIL" => Ok(ContactType::Email),
            _ => Err(format!("Unknown contact type: {}", s)),
        }
    }
}

/// Follow-up progression: PENDING -> CONTACTED -> CONVERTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    Pending,
    Contacted,
    Converted,
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactStatus::Pending => write!(f, "PENDING"),
            ContactStatus::Contacted => write!(f, "CONTACTED"),
            ContactStatus::Converted => write!(f, "CONVERTED"),
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(ContactStatus::Pending),
            "CONTACTED" => Ok(ContactStatus::Contacted),
            "CONVERTED" => Ok(ContactStatus::Converted),
            _ => Err(format!("Unknown contact status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogContactRequest {
    pub contact_type: ContactType,
    pub notes: Option<String>,
    /// Client-local outreach timestamp; defaults to now when absent
    pub contact_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i32,
    pub lead_id: i32,
    pub contact_type: String,
    pub status: String,
    pub contact_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<lead_contacts::Model> for ContactResponse {
    fn from(model: lead_contacts::Model) -> Self {
        Self {
            id: model.id,
            lead_id: model.lead_id,
            contact_type: model.contact_type,
            status: model.status,
            contact_date: model.contact_date,
            notes: model.notes,
        }
    }
}
