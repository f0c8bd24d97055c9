use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{cashout_requests, referral_wallets, referrals, wallet_ledger_entries};

/// Referral lifecycle: LINKED -> QUALIFIED -> REWARDED, terminal REJECTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferralStatus {
    Linked,
    Qualified,
    Rewarded,
    Rejected,
}

impl std::fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferralStatus::Linked => write!(f, "LINKED"),
            ReferralStatus::Qualified => write!(f, "QUALIFIED"),
            ReferralStatus::Rewarded => write!(f, "REWARDED"),
            ReferralStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for ReferralStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LINKED" => Ok(ReferralStatus::Linked),
            "QUALIFIED" => Ok(ReferralStatus::Qualified),
            "REWARDED" => Ok(ReferralStatus::Rewarded),
            "REJECTED" => Ok(ReferralStatus::Rejected),
            _ => Err(format!("Unknown referral status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkReferralRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralEntry {
    pub id: i32,
    pub referred_vendor_id: Uuid,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<referrals::Model> for ReferralEntry {
    fn from(model: referrals::Model) -> Self {
        Self {
            id: model.id,
            referred_vendor_id: model.referred_vendor_id,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub available_balance: Decimal,
    pub pending_balance: Decimal,
    pub reserved_balance: Decimal,
    pub lifetime_earned: Decimal,
    pub lifetime_paid_out: Decimal,
}

impl From<referral_wallets::Model> for WalletSnapshot {
    fn from(model: referral_wallets::Model) -> Self {
        Self {
            available_balance: model.available_balance,
            pending_balance: model.pending_balance,
            reserved_balance: model.reserved_balance,
            lifetime_earned: model.lifetime_earned,
            lifetime_paid_out: model.lifetime_paid_out,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryResponse {
    pub id: i64,
    pub entry_type: String,
    pub amount: Decimal,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashout_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl From<wallet_ledger_entries::Model> for LedgerEntryResponse {
    fn from(model: wallet_ledger_entries::Model) -> Self {
        Self {
            id: model.id,
            entry_type: model.entry_type,
            amount: model.amount,
            status: model.status,
            referral_id: model.referral_id,
            payment_id: model.payment_id,
            cashout_id: model.cashout_id,
            created_at: model.created_at,
        }
    }
}

/// Referral program parameters surfaced on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramSettings {
    pub reward_amount: Decimal,
    pub maturity_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralProfile {
    pub vendor_id: Uuid,
    pub referral_code: String,
    pub company_name: String,
}

/// Response for GET /api/referrals/me
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralDashboardResponse {
    pub profile: ReferralProfile,
    pub wallet: WalletSnapshot,
    pub settings: ProgramSettings,
    pub recent_referrals: Vec<ReferralEntry>,
    pub ledger: Vec<LedgerEntryResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCashoutRequest {
    pub amount: Decimal,
    pub bank_detail_id: i32,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashoutResponse {
    pub id: i32,
    pub amount: Decimal,
    pub bank_detail_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl From<cashout_requests::Model> for CashoutResponse {
    fn from(model: cashout_requests::Model) -> Self {
        Self {
            id: model.id,
            amount: model.amount,
            bank_detail_id: model.bank_detail_id,
            note: model.note,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashoutListResponse {
    pub data: Vec<CashoutResponse>,
}

/// Payment-completion callback payload (internal boundary)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCompletedRequest {
    pub vendor_id: Uuid,
    pub payment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCompletedResponse {
    /// True when a referral reward was accrued for this payment
    pub reward_accrued: bool,
}
