//! Referral ledger
//!
//! Referral lifecycle (LINKED -> QUALIFIED -> REWARDED, terminal REJECTED)
//! plus the wallet it pays into. Wallet balances are only mutated through
//! conditional SQL updates inside transactions; the append-only ledger is
//! the reconciliation source of truth.
//!
//! Errors carry an explicit kind. Handlers map `InvalidCode` to 400 and
//! storage failures to 500; nothing anywhere inspects message text.

use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::cashout_requests::{self, Entity as CashoutRequests};
use crate::entities::referral_wallets::{self, Entity as ReferralWallets};
use crate::entities::referrals::{self, Entity as Referrals};
use crate::entities::vendors::{self, Entity as Vendors};
use crate::entities::wallet_ledger_entries::{self, Entity as WalletLedgerEntries};
use crate::models::referral::{
    LedgerEntryResponse, ProgramSettings, ReferralDashboardResponse, ReferralEntry,
    ReferralProfile, ReferralStatus,
};

pub const ENTRY_CREDIT: &str = "CREDIT";
pub const ENTRY_CASHOUT_HOLD: &str = "CASHOUT_HOLD";
pub const ENTRY_CASHOUT_PAID: &str = "CASHOUT_PAID";
pub const ENTRY_CASHOUT_RETURNED: &str = "CASHOUT_RETURNED";

pub const LEDGER_PENDING: &str = "PENDING";
pub const LEDGER_RELEASED: &str = "RELEASED";
pub const LEDGER_SETTLED: &str = "SETTLED";

pub const CASHOUT_PENDING: &str = "PENDING";
pub const CASHOUT_PAID: &str = "PAID";
pub const CASHOUT_REJECTED: &str = "REJECTED";

lazy_static! {
    static ref REFERRAL_CODE_RE: Regex =
        Regex::new(r"^[A-Z0-9]{6,12}$").expect("referral code pattern compiles");
}

#[derive(Debug)]
pub enum ReferralError {
    /// Malformed code, unknown code, or self-referral: the 400-class kind
    InvalidCode,
    /// The vendor already has a referral edge
    AlreadyLinked,
    InvalidAmount,
    InsufficientBalance,
    NotFound,
    Db(DbErr),
}

impl std::fmt::Display for ReferralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferralError::InvalidCode => write!(f, "Invalid referral code"),
            ReferralError::AlreadyLinked => write!(f, "Referral already linked"),
            ReferralError::InvalidAmount => write!(f, "Amount must be positive"),
            ReferralError::InsufficientBalance => {
                write!(f, "Amount exceeds available balance")
            }
            ReferralError::NotFound => write!(f, "Not found"),
            ReferralError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReferralError {}

impl From<DbErr> for ReferralError {
    fn from(e: DbErr) -> Self {
        ReferralError::Db(e)
    }
}

/// Trim, uppercase, validate. None means the code is rejected before any
/// database access.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    if REFERRAL_CODE_RE.is_match(&code) {
        Some(code)
    } else {
        None
    }
}

pub async fn get_or_create_wallet<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
) -> Result<referral_wallets::Model, DbErr> {
    if let Some(wallet) = ReferralWallets::find()
        .filter(referral_wallets::Column::VendorId.eq(vendor_id))
        .one(db)
        .await?
    {
        return Ok(wallet);
    }

    let now = Utc::now().naive_utc();
    let fresh = referral_wallets::ActiveModel {
        vendor_id: Set(vendor_id),
        available_balance: Set(Decimal::ZERO),
        pending_balance: Set(Decimal::ZERO),
        reserved_balance: Set(Decimal::ZERO),
        lifetime_earned: Set(Decimal::ZERO),
        lifetime_paid_out: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match fresh.insert(db).await {
        Ok(wallet) => Ok(wallet),
        // Lost a create race; the winner's row is authoritative
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            ReferralWallets::find()
                .filter(referral_wallets::Column::VendorId.eq(vendor_id))
                .one(db)
                .await?
                .ok_or(e)
        }
        Err(e) => Err(e),
    }
}

/// Link the submitted code to the calling vendor.
/// Code format is validated before any database access; unknown codes and
/// self-referrals are the same InvalidCode kind to the caller.
pub async fn link_referral(
    db: &DatabaseConnection,
    referred_vendor_id: Uuid,
    raw_code: &str,
) -> Result<referrals::Model, ReferralError> {
    let code = normalize_code(raw_code).ok_or(ReferralError::InvalidCode)?;

    let referrer = Vendors::find()
        .filter(vendors::Column::ReferralCode.eq(&code))
        .one(db)
        .await?
        .ok_or(ReferralError::InvalidCode)?;
    if referrer.id == referred_vendor_id {
        return Err(ReferralError::InvalidCode);
    }

    let now = Utc::now().naive_utc();
    let link = referrals::ActiveModel {
        referrer_vendor_id: Set(referrer.id),
        referred_vendor_id: Set(referred_vendor_id),
        code: Set(code),
        status: Set(ReferralStatus::Linked.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match link.insert(db).await {
        Ok(model) => Ok(model),
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(ReferralError::AlreadyLinked)
        }
        Err(e) => Err(e.into()),
    }
}

/// Driven by the payment-completion callback: move the referred vendor's
/// LINKED referral to REWARDED and accrue the reward as pending credit.
/// A referral in any other state is a no-op, so webhook retries are safe.
pub async fn qualify_and_reward(
    db: &DatabaseConnection,
    reward: Decimal,
    referred_vendor_id: Uuid,
    payment_id: Uuid,
) -> Result<bool, ReferralError> {
    let txn = db.begin().await?;

    let Some(referral) = Referrals::find()
        .filter(referrals::Column::ReferredVendorId.eq(referred_vendor_id))
        .one(&txn)
        .await?
    else {
        return Ok(false);
    };
    if referral.status != ReferralStatus::Linked.to_string() {
        return Ok(false);
    }

    let now = Utc::now().naive_utc();
    let referrer_id = referral.referrer_vendor_id;
    let referral_id = referral.id;

    let mut qualified: referrals::ActiveModel = referral.into();
    qualified.status = Set(ReferralStatus::Qualified.to_string());
    qualified.updated_at = Set(now);
    let qualified = qualified.update(&txn).await?;

    get_or_create_wallet(&txn, referrer_id).await?;
    ReferralWallets::update_many()
        .filter(referral_wallets::Column::VendorId.eq(referrer_id))
        .col_expr(
            referral_wallets::Column::PendingBalance,
            Expr::col(referral_wallets::Column::PendingBalance).add(reward),
        )
        .col_expr(
            referral_wallets::Column::LifetimeEarned,
            Expr::col(referral_wallets::Column::LifetimeEarned).add(reward),
        )
        .col_expr(referral_wallets::Column::UpdatedAt, Expr::value(now))
        .exec(&txn)
        .await?;

    let credit = wallet_ledger_entries::ActiveModel {
        vendor_id: Set(referrer_id),
        entry_type: Set(ENTRY_CREDIT.to_string()),
        amount: Set(reward),
        status: Set(LEDGER_PENDING.to_string()),
        referral_id: Set(Some(referral_id)),
        payment_id: Set(Some(payment_id)),
        cashout_id: Set(None),
        created_at: Set(now),
        ..Default::default()
    };
    credit.insert(&txn).await?;

    let mut rewarded: referrals::ActiveModel = qualified.into();
    rewarded.status = Set(ReferralStatus::Rewarded.to_string());
    rewarded.updated_at = Set(now);
    rewarded.update(&txn).await?;

    txn.commit().await?;
    Ok(true)
}

/// Check-and-hold in one transaction: the requested amount moves from
/// available into reserved with a database-level balance guard, then the
/// cashout row and its ledger entry are written. Two concurrent requests
/// can never jointly overdraw.
pub async fn create_cashout(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    amount: Decimal,
    bank_detail_id: i32,
    note: Option<String>,
) -> Result<cashout_requests::Model, ReferralError> {
    if amount <= Decimal::ZERO {
        return Err(ReferralError::InvalidAmount);
    }

    let txn = db.begin().await?;
    get_or_create_wallet(&txn, vendor_id).await?;

    let held = hold_funds(&txn, vendor_id, amount).await?;
    if !held {
        return Err(ReferralError::InsufficientBalance);
    }

    let now = Utc::now().naive_utc();
    let request = cashout_requests::ActiveModel {
        vendor_id: Set(vendor_id),
        amount: Set(amount),
        bank_detail_id: Set(bank_detail_id),
        note: Set(note),
        status: Set(CASHOUT_PENDING.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let request = request.insert(&txn).await?;

    let hold = wallet_ledger_entries::ActiveModel {
        vendor_id: Set(vendor_id),
        entry_type: Set(ENTRY_CASHOUT_HOLD.to_string()),
        amount: Set(amount),
        status: Set(LEDGER_PENDING.to_string()),
        referral_id: Set(None),
        payment_id: Set(None),
        cashout_id: Set(Some(request.id)),
        created_at: Set(now),
        ..Default::default()
    };
    hold.insert(&txn).await?;

    txn.commit().await?;
    Ok(request)
}

async fn hold_funds(
    txn: &DatabaseTransaction,
    vendor_id: Uuid,
    amount: Decimal,
) -> Result<bool, DbErr> {
    let result = ReferralWallets::update_many()
        .filter(referral_wallets::Column::VendorId.eq(vendor_id))
        .filter(referral_wallets::Column::AvailableBalance.gte(amount))
        .col_expr(
            referral_wallets::Column::AvailableBalance,
            Expr::col(referral_wallets::Column::AvailableBalance).sub(amount),
        )
        .col_expr(
            referral_wallets::Column::ReservedBalance,
            Expr::col(referral_wallets::Column::ReservedBalance).add(amount),
        )
        .col_expr(
            referral_wallets::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .exec(txn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Move matured pending credits to available. Invoked by the maturation
/// binary, never from a request handler. Returns how many entries were
/// released.
pub async fn release_matured(
    db: &DatabaseConnection,
    maturity_days: i64,
) -> Result<u64, DbErr> {
    let cutoff = Utc::now().naive_utc() - Duration::days(maturity_days);

    let matured = WalletLedgerEntries::find()
        .filter(wallet_ledger_entries::Column::EntryType.eq(ENTRY_CREDIT))
        .filter(wallet_ledger_entries::Column::Status.eq(LEDGER_PENDING))
        .filter(wallet_ledger_entries::Column::CreatedAt.lte(cutoff))
        .all(db)
        .await?;

    let mut released = 0u64;
    for entry in matured {
        let txn = db.begin().await?;
        let now = Utc::now().naive_utc();

        let moved = ReferralWallets::update_many()
            .filter(referral_wallets::Column::VendorId.eq(entry.vendor_id))
            .filter(referral_wallets::Column::PendingBalance.gte(entry.amount))
            .col_expr(
                referral_wallets::Column::PendingBalance,
                Expr::col(referral_wallets::Column::PendingBalance).sub(entry.amount),
            )
            .col_expr(
                referral_wallets::Column::AvailableBalance,
                Expr::col(referral_wallets::Column::AvailableBalance).add(entry.amount),
            )
            .col_expr(referral_wallets::Column::UpdatedAt, Expr::value(now))
            .exec(&txn)
            .await?;

        if moved.rows_affected == 0 {
            tracing::warn!(
                entry_id = entry.id,
                vendor_id = %entry.vendor_id,
                "Ledger entry has no matching pending balance; skipping"
            );
            continue;
        }

        let mut active: wallet_ledger_entries::ActiveModel = entry.into();
        active.status = Set(LEDGER_RELEASED.to_string());
        active.update(&txn).await?;

        txn.commit().await?;
        released += 1;
    }

    Ok(released)
}

/// Settle a pending cashout: pay it out, or reject it and return the held
/// amount to the available balance.
pub async fn process_payout(
    db: &DatabaseConnection,
    cashout_id: i32,
    approve: bool,
) -> Result<cashout_requests::Model, ReferralError> {
    let txn = db.begin().await?;

    let cashout = CashoutRequests::find_by_id(cashout_id)
        .one(&txn)
        .await?
        .ok_or(ReferralError::NotFound)?;
    if cashout.status != CASHOUT_PENDING {
        return Err(ReferralError::NotFound);
    }

    let now = Utc::now().naive_utc();
    let vendor_id = cashout.vendor_id;
    let amount = cashout.amount;

    let mut update = ReferralWallets::update_many()
        .filter(referral_wallets::Column::VendorId.eq(vendor_id))
        .filter(referral_wallets::Column::ReservedBalance.gte(amount))
        .col_expr(
            referral_wallets::Column::ReservedBalance,
            Expr::col(referral_wallets::Column::ReservedBalance).sub(amount),
        )
        .col_expr(referral_wallets::Column::UpdatedAt, Expr::value(now));
    if approve {
        update = update.col_expr(
            referral_wallets::Column::LifetimePaidOut,
            Expr::col(referral_wallets::Column::LifetimePaidOut).add(amount),
        );
    } else {
        update = update.col_expr(
            referral_wallets::Column::AvailableBalance,
            Expr::col(referral_wallets::Column::AvailableBalance).add(amount),
        );
    }
    let result = update.exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(ReferralError::InsufficientBalance);
    }

    let (new_status, entry_type) = if approve {
        (CASHOUT_PAID, ENTRY_CASHOUT_PAID)
    } else {
        (CASHOUT_REJECTED, ENTRY_CASHOUT_RETURNED)
    };

    let mut active: cashout_requests::ActiveModel = cashout.into();
    active.status = Set(new_status.to_string());
    active.updated_at = Set(now);
    let cashout = active.update(&txn).await?;

    let entry = wallet_ledger_entries::ActiveModel {
        vendor_id: Set(vendor_id),
        entry_type: Set(entry_type.to_string()),
        amount: Set(amount),
        status: Set(LEDGER_SETTLED.to_string()),
        referral_id: Set(None),
        payment_id: Set(None),
        cashout_id: Set(Some(cashout.id)),
        created_at: Set(now),
        ..Default::default()
    };
    entry.insert(&txn).await?;

    txn.commit().await?;
    Ok(cashout)
}

pub async fn list_cashouts(
    db: &DatabaseConnection,
    vendor_id: Uuid,
) -> Result<Vec<cashout_requests::Model>, DbErr> {
    CashoutRequests::find()
        .filter(cashout_requests::Column::VendorId.eq(vendor_id))
        .order_by_desc(cashout_requests::Column::CreatedAt)
        .all(db)
        .await
}

/// Everything the referral dashboard shows in one call
pub async fn dashboard(
    db: &DatabaseConnection,
    settings: ProgramSettings,
    vendor_id: Uuid,
) -> Result<ReferralDashboardResponse, ReferralError> {
    let vendor = Vendors::find_by_id(vendor_id)
        .one(db)
        .await?
        .ok_or(ReferralError::NotFound)?;

    let wallet = get_or_create_wallet(db, vendor_id).await?;

    let recent_referrals = Referrals::find()
        .filter(referrals::Column::ReferrerVendorId.eq(vendor_id))
        .order_by_desc(referrals::Column::CreatedAt)
        .limit(10)
        .all(db)
        .await?
        .into_iter()
        .map(ReferralEntry::from)
        .collect();

    let ledger = WalletLedgerEntries::find()
        .filter(wallet_ledger_entries::Column::VendorId.eq(vendor_id))
        .order_by_desc(wallet_ledger_entries::Column::CreatedAt)
        .limit(20)
        .all(db)
        .await?
        .into_iter()
        .map(LedgerEntryResponse::from)
        .collect();

    Ok(ReferralDashboardResponse {
        profile: ReferralProfile {
            vendor_id: vendor.id,
            referral_code: vendor.referral_code,
            company_name: vendor.company_name,
        },
        wallet: wallet.into(),
        settings,
        recent_referrals,
        ledger,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_mixed_case_with_whitespace() {
        assert_eq!(normalize_code("  ab12cd  "), Some("AB12CD".to_string()));
        assert_eq!(normalize_code("VENDOR2025"), Some("VENDOR2025".to_string()));
    }

    #[test]
    fn normalize_rejects_empty_and_short_codes() {
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code("AB12"), None);
    }

    #[test]
    fn normalize_rejects_invalid_characters_and_length() {
        assert_eq!(normalize_code("AB-12-CD"), None);
        assert_eq!(normalize_code("AB12CD345678X"), None); // 13 chars
        assert_eq!(normalize_code("code with spaces"), None);
    }
}
