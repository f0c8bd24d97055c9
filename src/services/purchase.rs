//! Purchase transaction
//!
//! Converts one unit of quota (or a payment) into an unlocked lead. This
//! is the trusted boundary that client-side checks defer to: quota
//! consumption and the purchase insert run in one database transaction,
//! the counter decrement is a conditional UPDATE, and the unique
//! (vendor_id, lead_id) index serializes concurrent attempts. Client-side
//! quota checks are advisory only.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::lead_purchases::{self, Entity as LeadPurchases};
use crate::entities::leads::Entity as Leads;
use crate::entities::vendor_quotas::{self, Entity as VendorQuotas};
use crate::models::lead::LeadStatus;
use crate::models::purchase::PurchaseMode;
use crate::models::subscription::SubscriptionSnapshot;
use crate::services::eligibility::first_exceeded_limit;
use crate::services::{quota, subscription};

#[derive(Debug)]
pub enum PurchaseError {
    LeadNotFound,
    LeadUnavailable,
    /// Steady-state gate, surfaced as a message, not an error banner
    NoActiveSubscription,
    /// Steady-state gate with the period-specific message
    QuotaExhausted(String),
    AlreadyPurchased,
    AmountRequired,
    Db(DbErr),
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseError::LeadNotFound => write!(f, "Lead not found"),
            PurchaseError::LeadUnavailable => write!(f, "Lead is no longer available"),
            PurchaseError::NoActiveSubscription => {
                write!(f, "No active subscription plan")
            }
            PurchaseError::QuotaExhausted(msg) => write!(f, "{}", msg),
            PurchaseError::AlreadyPurchased => write!(f, "Lead already purchased"),
            PurchaseError::AmountRequired => {
                write!(f, "A positive amount is required for this purchase mode")
            }
            PurchaseError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for PurchaseError {}

impl From<DbErr> for PurchaseError {
    fn from(e: DbErr) -> Self {
        PurchaseError::Db(e)
    }
}

pub struct PurchaseOutcome {
    pub purchase: lead_purchases::Model,
    pub quota: vendor_quotas::Model,
    pub subscription: Option<SubscriptionSnapshot>,
}

/// Which counters a funding mode consumes
fn consumed_periods(mode: PurchaseMode) -> (bool, bool, bool) {
    match mode {
        PurchaseMode::Auto => (true, true, true),
        PurchaseMode::UseWeekly => (false, true, true),
        PurchaseMode::BuyExtra | PurchaseMode::Paid => (false, false, false),
    }
}

pub async fn purchase_lead(
    db: &DatabaseConnection,
    subs: &subscription::SubscriptionService,
    vendor_id: Uuid,
    lead_id: i32,
    mode: PurchaseMode,
    amount: Option<Decimal>,
) -> Result<PurchaseOutcome, PurchaseError> {
    let txn = db.begin().await?;

    let lead = Leads::find_by_id(lead_id)
        .one(&txn)
        .await?
        .ok_or(PurchaseError::LeadNotFound)?;
    if lead.status != LeadStatus::Available.to_string() {
        return Err(PurchaseError::LeadUnavailable);
    }

    let now = Utc::now().naive_utc();
    let resolved = subs.resolve_active(&txn, vendor_id).await?;
    let plan = resolved.as_ref().map(|(_, p)| p);
    let active = resolved
        .as_ref()
        .map(|(s, _)| subscription::is_active(s, now))
        .unwrap_or(false);

    // Every mode except PAID rides on a subscription
    if mode != PurchaseMode::Paid && !active {
        return Err(PurchaseError::NoActiveSubscription);
    }

    let fresh = quota::ensure_fresh(&txn, vendor_id, plan).await?;

    // Resolve the funding path. AUTO prefers quota and falls back to a
    // paid purchase when an amount was supplied.
    let (effective_mode, charge) = match mode {
        PurchaseMode::Auto => {
            let plan = plan.ok_or(PurchaseError::NoActiveSubscription)?;
            match first_exceeded_limit(&fresh, plan) {
                None => (PurchaseMode::Auto, Decimal::ZERO),
                Some(msg) => match amount {
                    Some(a) if a > Decimal::ZERO => (PurchaseMode::Paid, a),
                    _ => return Err(PurchaseError::QuotaExhausted(msg.to_string())),
                },
            }
        }
        PurchaseMode::UseWeekly => (PurchaseMode::UseWeekly, Decimal::ZERO),
        PurchaseMode::BuyExtra => {
            let plan = plan.ok_or(PurchaseError::NoActiveSubscription)?;
            (PurchaseMode::BuyExtra, plan.extra_lead_price)
        }
        PurchaseMode::Paid => match amount {
            Some(a) if a > Decimal::ZERO => (PurchaseMode::Paid, a),
            _ => return Err(PurchaseError::AmountRequired),
        },
    };

    let (use_daily, use_weekly, use_yearly) = consumed_periods(effective_mode);
    if use_daily || use_weekly || use_yearly {
        let consumed = consume_quota(&txn, vendor_id, use_daily, use_weekly, use_yearly).await?;
        if !consumed {
            // The conditional update lost a race with a concurrent
            // purchase; re-read to report the period that is exhausted now
            let current = VendorQuotas::find()
                .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
                .one(&txn)
                .await?;
            let msg = match (current.as_ref(), plan) {
                (Some(q), Some(p)) => {
                    first_exceeded_limit(q, p).unwrap_or("Lead quota exhausted")
                }
                _ => "Lead quota exhausted",
            };
            return Err(PurchaseError::QuotaExhausted(msg.to_string()));
        }
    }

    let purchase = lead_purchases::ActiveModel {
        vendor_id: Set(vendor_id),
        lead_id: Set(lead_id),
        purchase_date: Set(now),
        amount: Set(charge),
        mode: Set(mode.to_string()),
        ..Default::default()
    };
    let purchase = match purchase.insert(&txn).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(PurchaseError::AlreadyPurchased);
        }
        Err(e) => return Err(e.into()),
    };

    let quota_after = VendorQuotas::find()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .one(&txn)
        .await?
        .unwrap_or(fresh);

    txn.commit().await?;

    let sub_snapshot = resolved
        .as_ref()
        .map(|(s, p)| subscription::snapshot(s, p, now));

    Ok(PurchaseOutcome {
        purchase,
        quota: quota_after,
        subscription: sub_snapshot,
    })
}

/// Atomic counter consumption: `used = used + 1` guarded by
/// `limit = 0 OR used < limit` per consumed period, in one statement.
/// Returns false when the guard rejected the update.
async fn consume_quota(
    txn: &DatabaseTransaction,
    vendor_id: Uuid,
    daily: bool,
    weekly: bool,
    yearly: bool,
) -> Result<bool, DbErr> {
    let mut update = VendorQuotas::update_many()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .col_expr(
            vendor_quotas::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        );

    if daily {
        update = update
            .col_expr(
                vendor_quotas::Column::DailyUsed,
                Expr::col(vendor_quotas::Column::DailyUsed).add(1),
            )
            .filter(
                Condition::any()
                    .add(vendor_quotas::Column::DailyLimit.eq(0))
                    .add(
                        Expr::col(vendor_quotas::Column::DailyUsed)
                            .lt(Expr::col(vendor_quotas::Column::DailyLimit)),
                    ),
            );
    }
    if weekly {
        update = update
            .col_expr(
                vendor_quotas::Column::WeeklyUsed,
                Expr::col(vendor_quotas::Column::WeeklyUsed).add(1),
            )
            .filter(
                Condition::any()
                    .add(vendor_quotas::Column::WeeklyLimit.eq(0))
                    .add(
                        Expr::col(vendor_quotas::Column::WeeklyUsed)
                            .lt(Expr::col(vendor_quotas::Column::WeeklyLimit)),
                    ),
            );
    }
    if yearly {
        update = update
            .col_expr(
                vendor_quotas::Column::YearlyUsed,
                Expr::col(vendor_quotas::Column::YearlyUsed).add(1),
            )
            .filter(
                Condition::any()
                    .add(vendor_quotas::Column::YearlyLimit.eq(0))
                    .add(
                        Expr::col(vendor_quotas::Column::YearlyUsed)
                            .lt(Expr::col(vendor_quotas::Column::YearlyLimit)),
                    ),
            );
    }

    let result = update.exec(txn).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_consumes_all_three_periods() {
        assert_eq!(consumed_periods(PurchaseMode::Auto), (true, true, true));
    }

    #[test]
    fn use_weekly_skips_the_daily_counter() {
        assert_eq!(
            consumed_periods(PurchaseMode::UseWeekly),
            (false, true, true)
        );
    }

    #[test]
    fn paid_modes_consume_nothing() {
        assert_eq!(
            consumed_periods(PurchaseMode::BuyExtra),
            (false, false, false)
        );
        assert_eq!(consumed_periods(PurchaseMode::Paid), (false, false, false));
    }

    #[test]
    fn purchase_mode_round_trips_through_strings() {
        for mode in [
            PurchaseMode::Auto,
            PurchaseMode::UseWeekly,
            PurchaseMode::BuyExtra,
            PurchaseMode::Paid,
        ] {
            assert_eq!(mode.to_string().parse::<PurchaseMode>(), Ok(mode));
        }
    }
}
