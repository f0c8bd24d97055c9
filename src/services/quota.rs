//! Quota reset engine
//!
//! Counters are reset lazily, on read: every code path that needs quota
//! state calls `ensure_fresh` first. Daily counters reset at UTC midnight,
//! weekly counters at Monday 00:00 (ISO week), yearly counters at
//! January 1st 00:00. The three checks are independent; any subset can
//! fire in a single call.
//!
//! Persisting a fired reset is best-effort cache coherency: a failed write
//! is logged and the caller still gets the corrected in-memory snapshot.
//! Serving a one-cycle-stale counter is acceptable; blocking a read path
//! on it is not.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::vendor_quotas::{self, Entity as VendorQuotas};
use crate::entities::plans;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaBoundaries {
    /// Most recent UTC midnight
    pub day_start: NaiveDateTime,
    /// Most recent Monday 00:00
    pub week_start: NaiveDateTime,
    /// Most recent January 1st 00:00
    pub year_start: NaiveDateTime,
}

pub fn boundaries(now: NaiveDateTime) -> QuotaBoundaries {
    let day_start = now.date().and_time(NaiveTime::MIN);
    let week_start = day_start - Duration::days(now.weekday().num_days_from_monday() as i64);
    let year_start = NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .expect("Jan 1 is a valid date")
        .and_time(NaiveTime::MIN);
    QuotaBoundaries {
        day_start,
        week_start,
        year_start,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    pub daily: bool,
    pub weekly: bool,
    pub yearly: bool,
}

impl ResetOutcome {
    pub fn any(&self) -> bool {
        self.daily || self.weekly || self.yearly
    }
}

/// Decide which counters to zero. A watermark strictly before its boundary
/// means the boundary has been crossed since the last reset; a watermark
/// on/after it means this period already reset once (idempotence).
pub fn compute_reset(
    now: NaiveDateTime,
    daily_watermark: NaiveDateTime,
    weekly_watermark: NaiveDateTime,
    yearly_watermark: NaiveDateTime,
) -> ResetOutcome {
    let b = boundaries(now);
    ResetOutcome {
        daily: daily_watermark < b.day_start,
        weekly: weekly_watermark < b.week_start,
        yearly: yearly_watermark < b.year_start,
    }
}

/// Load (or lazily create) the vendor's quota row and apply any pending
/// resets. The returned model always reflects the post-reset state, even
/// when persistence failed.
pub async fn ensure_fresh<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    plan: Option<&plans::Model>,
) -> Result<vendor_quotas::Model, DbErr> {
    let now = Utc::now().naive_utc();
    let b = boundaries(now);

    let existing = VendorQuotas::find()
        .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
        .one(db)
        .await?;

    let Some(mut quota) = existing else {
        return create_row(db, vendor_id, plan, now, b).await;
    };

    let outcome = compute_reset(
        now,
        quota.daily_reset_at.unwrap_or(quota.updated_at),
        quota.weekly_reset_at.unwrap_or(quota.created_at),
        quota.yearly_reset_at.unwrap_or(quota.created_at),
    );

    let limits_drifted = match plan {
        Some(p) => {
            quota.daily_limit != p.daily_limit
                || quota.weekly_limit != p.weekly_limit
                || quota.yearly_limit != p.yearly_limit
        }
        None => false,
    };

    if !outcome.any() && !limits_drifted {
        return Ok(quota);
    }

    let mut active = vendor_quotas::ActiveModel {
        id: Set(quota.id),
        ..Default::default()
    };

    if outcome.daily {
        quota.daily_used = 0;
        quota.daily_reset_at = Some(b.day_start);
        active.daily_used = Set(0);
        active.daily_reset_at = Set(Some(b.day_start));
    }
    if outcome.weekly {
        quota.weekly_used = 0;
        quota.weekly_reset_at = Some(b.week_start);
        active.weekly_used = Set(0);
        active.weekly_reset_at = Set(Some(b.week_start));
    }
    if outcome.yearly {
        quota.yearly_used = 0;
        quota.yearly_reset_at = Some(b.year_start);
        active.yearly_used = Set(0);
        active.yearly_reset_at = Set(Some(b.year_start));
    }
    if let Some(p) = plan {
        if limits_drifted {
            quota.daily_limit = p.daily_limit;
            quota.weekly_limit = p.weekly_limit;
            quota.yearly_limit = p.yearly_limit;
            active.daily_limit = Set(p.daily_limit);
            active.weekly_limit = Set(p.weekly_limit);
            active.yearly_limit = Set(p.yearly_limit);
        }
    }
    quota.updated_at = now;
    active.updated_at = Set(now);

    // Best-effort: a stale persisted counter only means the next reader
    // recomputes the same reset
    if let Err(e) = active.update(db).await {
        tracing::warn!(
            vendor_id = %vendor_id,
            "Failed to persist quota reset: {}",
            e
        );
    }

    Ok(quota)
}

async fn create_row<C: ConnectionTrait>(
    db: &C,
    vendor_id: Uuid,
    plan: Option<&plans::Model>,
    now: NaiveDateTime,
    b: QuotaBoundaries,
) -> Result<vendor_quotas::Model, DbErr> {
    let fresh = vendor_quotas::ActiveModel {
        vendor_id: Set(vendor_id),
        daily_used: Set(0),
        weekly_used: Set(0),
        yearly_used: Set(0),
        daily_limit: Set(plan.map(|p| p.daily_limit).unwrap_or(0)),
        weekly_limit: Set(plan.map(|p| p.weekly_limit).unwrap_or(0)),
        yearly_limit: Set(plan.map(|p| p.yearly_limit).unwrap_or(0)),
        daily_reset_at: Set(Some(b.day_start)),
        weekly_reset_at: Set(Some(b.week_start)),
        yearly_reset_at: Set(Some(b.year_start)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match fresh.insert(db).await {
        Ok(model) => Ok(model),
        // Another request created the row first; use theirs
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            VendorQuotas::find()
                .filter(vendor_quotas::Column::VendorId.eq(vendor_id))
                .one(db)
                .await?
                .ok_or(e)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn boundaries_anchor_monday_and_jan_first() {
        // 2025-06-05 is a Thursday; 2025-06-02 the preceding Monday
        let b = boundaries(dt("2025-06-05 14:30:00"));
        assert_eq!(b.day_start, dt("2025-06-05 00:00:00"));
        assert_eq!(b.week_start, dt("2025-06-02 00:00:00"));
        assert_eq!(b.year_start, dt("2025-01-01 00:00:00"));
    }

    #[test]
    fn boundaries_on_a_monday_are_the_same_day() {
        let b = boundaries(dt("2025-06-02 00:00:01"));
        assert_eq!(b.week_start, dt("2025-06-02 00:00:00"));
    }

    #[test]
    fn daily_reset_fires_after_midnight() {
        let now = dt("2025-06-05 08:00:00");
        let outcome = compute_reset(
            now,
            dt("2025-06-04 22:00:00"), // yesterday
            dt("2025-06-02 00:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(outcome.daily);
        assert!(!outcome.weekly);
        assert!(!outcome.yearly);
    }

    #[test]
    fn daily_reset_is_idempotent_within_a_day() {
        let now = dt("2025-06-05 23:59:59");
        let outcome = compute_reset(
            now,
            dt("2025-06-05 00:00:00"), // already advanced to today
            dt("2025-06-02 00:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(!outcome.any());
    }

    #[test]
    fn weekly_reset_fires_on_monday_crossing() {
        // Watermark on Sunday, now on Monday
        let outcome = compute_reset(
            dt("2025-06-02 06:00:00"),
            dt("2025-06-02 00:00:00"),
            dt("2025-06-01 20:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(!outcome.daily);
        assert!(outcome.weekly);
    }

    #[test]
    fn weekly_reset_does_not_fire_mid_week() {
        // Watermark on Tuesday, now Friday of the same week
        let outcome = compute_reset(
            dt("2025-06-06 10:00:00"),
            dt("2025-06-06 00:00:00"),
            dt("2025-06-03 09:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(!outcome.weekly);
    }

    #[test]
    fn day_and_week_can_fire_in_the_same_call() {
        // Watermarks from the previous week
        let outcome = compute_reset(
            dt("2025-06-03 10:00:00"),
            dt("2025-05-28 12:00:00"),
            dt("2025-05-26 00:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(outcome.daily);
        assert!(outcome.weekly);
        assert!(!outcome.yearly);
    }

    #[test]
    fn yearly_reset_fires_across_january_first() {
        let outcome = compute_reset(
            dt("2026-01-02 10:00:00"),
            dt("2026-01-02 00:00:00"),
            dt("2025-12-28 00:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(outcome.yearly);
        // The watermark week also rolled over (week of Jan 2 starts Dec 29)
        assert!(outcome.weekly);
    }

    #[test]
    fn yearly_reset_idempotent_within_a_year() {
        let outcome = compute_reset(
            dt("2025-07-01 10:00:00"),
            dt("2025-07-01 00:00:00"),
            dt("2025-06-30 00:00:00"),
            dt("2025-01-01 00:00:00"),
        );
        assert!(!outcome.yearly);
    }
}
