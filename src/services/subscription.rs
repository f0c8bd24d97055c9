//! Subscription resolver
//!
//! Resolves a vendor's authoritative subscription and its plan limits.
//! The store is not assumed to enforce ACTIVE uniqueness; the first ACTIVE
//! row wins, filtered client-side. Date expiry is computed, never written
//! back: an ACTIVE row with a past end_date is reported inactive while its
//! stored status stays ACTIVE. Every caller must go through `is_active`.

use chrono::NaiveDateTime;
use moka::future::Cache;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::time::Duration;
use uuid::Uuid;

use crate::entities::plans::{self, Entity as Plans};
use crate::entities::subscriptions::{self, Entity as Subscriptions};
use crate::models::subscription::{SubscriptionSnapshot, SubscriptionStatus};

const SECONDS_PER_DAY: i64 = 86_400;

/// Ceiling of the remaining whole days, floored at 0
pub fn days_left(end_date: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let seconds = (end_date - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// The only activity predicate. `status` alone is never authoritative.
pub fn is_active(subscription: &subscriptions::Model, now: NaiveDateTime) -> bool {
    if subscription.status != SubscriptionStatus::Active.to_string() {
        return false;
    }
    match subscription.end_date {
        None => true,
        Some(end) => days_left(end, now) > 0,
    }
}

pub fn snapshot(
    subscription: &subscriptions::Model,
    plan: &plans::Model,
    now: NaiveDateTime,
) -> SubscriptionSnapshot {
    let remaining = subscription.end_date.map(|end| days_left(end, now)).unwrap_or(0);
    SubscriptionSnapshot::new(subscription, plan, is_active(subscription, now), remaining)
}

/// Plan rows change rarely; cache them so every eligibility check does not
/// refetch the catalog.
#[derive(Clone)]
pub struct SubscriptionService {
    plan_cache: Cache<i32, plans::Model>,
}

impl SubscriptionService {
    pub fn new(plan_cache_ttl_secs: u64) -> Self {
        Self {
            plan_cache: Cache::builder()
                .max_capacity(256)
                .time_to_live(Duration::from_secs(plan_cache_ttl_secs))
                .build(),
        }
    }

    pub async fn plan<C: ConnectionTrait>(
        &self,
        db: &C,
        plan_id: i32,
    ) -> Result<Option<plans::Model>, DbErr> {
        if let Some(plan) = self.plan_cache.get(&plan_id).await {
            return Ok(Some(plan));
        }
        let plan = Plans::find_by_id(plan_id).one(db).await?;
        if let Some(ref p) = plan {
            self.plan_cache.insert(plan_id, p.clone()).await;
        }
        Ok(plan)
    }

    /// First ACTIVE subscription joined with its plan, or None.
    /// The join is two queries on purpose: the plan row is fetched (and
    /// cached) separately by plan_id.
    pub async fn resolve_active<C: ConnectionTrait>(
        &self,
        db: &C,
        vendor_id: Uuid,
    ) -> Result<Option<(subscriptions::Model, plans::Model)>, DbErr> {
        let rows = Subscriptions::find()
            .filter(subscriptions::Column::VendorId.eq(vendor_id))
            .all(db)
            .await?;

        let Some(subscription) = rows
            .into_iter()
            .find(|s| s.status == SubscriptionStatus::Active.to_string())
        else {
            return Ok(None);
        };

        match self.plan(db, subscription.plan_id).await? {
            Some(plan) => Ok(Some((subscription, plan))),
            None => {
                tracing::warn!(
                    vendor_id = %vendor_id,
                    plan_id = subscription.plan_id,
                    "Active subscription references a missing plan"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn subscription(status: &str, end_date: Option<NaiveDateTime>) -> subscriptions::Model {
        subscriptions::Model {
            id: 1,
            vendor_id: Uuid::new_v4(),
            plan_id: 1,
            status: status.to_string(),
            start_date: dt("2025-01-01 00:00:00"),
            end_date,
            created_at: dt("2025-01-01 00:00:00"),
            updated_at: dt("2025-01-01 00:00:00"),
        }
    }

    #[test]
    fn days_left_rounds_up_partial_days() {
        let now = dt("2025-06-01 12:00:00");
        assert_eq!(days_left(dt("2025-06-01 18:00:00"), now), 1);
        assert_eq!(days_left(dt("2025-06-03 12:00:00"), now), 2);
        assert_eq!(days_left(dt("2025-06-01 12:00:00"), now), 0);
        assert_eq!(days_left(dt("2025-05-01 00:00:00"), now), 0);
    }

    #[test]
    fn active_without_end_date_is_active() {
        let now = dt("2025-06-01 00:00:00");
        assert!(is_active(&subscription("ACTIVE", None), now));
    }

    #[test]
    fn date_expired_active_row_is_inactive() {
        // Stored status says ACTIVE; the computed predicate must win
        let now = dt("2025-06-01 00:00:00");
        let sub = subscription("ACTIVE", Some(dt("2025-05-31 23:59:59")));
        assert!(!is_active(&sub, now));
    }

    #[test]
    fn cancelled_is_inactive_regardless_of_dates() {
        let now = dt("2025-06-01 00:00:00");
        let sub = subscription("CANCELLED", Some(dt("2025-12-31 00:00:00")));
        assert!(!is_active(&sub, now));
    }
}
