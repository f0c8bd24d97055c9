//! Lead eligibility filter
//!
//! Decides which leads a vendor may see. The gates run in a fixed order
//! (quota refresh, subscription, daily/weekly/yearly limits) and a failed
//! gate short-circuits with an empty result and a human-readable message.
//! Limit exhaustion is an expected steady state, never an error.

use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::leads::{self, Entity as Leads};
use crate::entities::plans;
use crate::entities::vendor_preferences::{self, Entity as VendorPreferences};
use crate::entities::vendor_quotas;
use crate::models::common::{normalize_pagination, Pagination};
use crate::models::lead::{AvailableLeadsQuery, AvailableLeadsResponse, LeadStatus, LeadSummary};
use crate::models::preference::PreferencesResponse;
use crate::services::{quota, subscription};

pub const MSG_NO_SUBSCRIPTION: &str =
    "No active subscription plan. Please subscribe to view leads.";
pub const MSG_DAILY_LIMIT: &str = "Daily lead limit reached";
pub const MSG_WEEKLY_LIMIT: &str = "Weekly lead limit reached";
pub const MSG_YEARLY_LIMIT: &str = "Yearly lead limit reached";

/// How far back the marketplace window reaches
pub const LEAD_WINDOW_DAYS: i64 = 30;

/// First violated limit in the order daily, weekly, yearly.
/// A limit of 0 means unlimited and never trips.
pub fn first_exceeded_limit(
    quota: &vendor_quotas::Model,
    plan: &plans::Model,
) -> Option<&'static str> {
    let checks = [
        (plan.daily_limit, quota.daily_used, MSG_DAILY_LIMIT),
        (plan.weekly_limit, quota.weekly_used, MSG_WEEKLY_LIMIT),
        (plan.yearly_limit, quota.yearly_used, MSG_YEARLY_LIMIT),
    ];
    checks
        .into_iter()
        .find(|(limit, used, _)| *limit > 0 && used >= limit)
        .map(|(_, _, msg)| msg)
}

/// Free-text preference match. The lead table carries no category or
/// location foreign keys, so preferences match against the text fields.
pub fn matches_preferences(lead: &leads::Model, prefs: &PreferencesResponse) -> bool {
    let haystack = format!("{} {}", lead.title, lead.product_name).to_lowercase();
    if !prefs.categories.is_empty()
        && !prefs
            .categories
            .iter()
            .any(|c| haystack.contains(&c.to_lowercase()))
    {
        return false;
    }

    let places: Vec<&String> = prefs.states.iter().chain(prefs.cities.iter()).collect();
    if !places.is_empty() {
        let location = lead
            .location
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if !places.iter().any(|p| location.contains(&p.to_lowercase())) {
            return false;
        }
    }

    true
}

fn empty_response(
    quota: vendor_quotas::Model,
    subscription: Option<crate::models::subscription::SubscriptionSnapshot>,
    page: u64,
    limit: u64,
    message: &str,
) -> AvailableLeadsResponse {
    AvailableLeadsResponse {
        data: vec![],
        quota: Some(quota.into()),
        subscription,
        pagination: Pagination {
            page,
            limit,
            total: 0,
        },
        message: Some(message.to_string()),
    }
}

pub async fn available_leads<C: ConnectionTrait>(
    db: &C,
    subs: &subscription::SubscriptionService,
    vendor_id: Uuid,
    query: &AvailableLeadsQuery,
) -> Result<AvailableLeadsResponse, DbErr> {
    let now = Utc::now().naive_utc();
    let (page, limit) = normalize_pagination(query.page, query.limit);

    // 1. Subscription first so the quota refresh can sync limit snapshots
    let resolved = subs.resolve_active(db, vendor_id).await?;
    let plan = resolved.as_ref().map(|(_, p)| p);

    // 2. Lazy quota reset on every read
    let quota = quota::ensure_fresh(db, vendor_id, plan).await?;

    let Some((ref sub, ref plan)) = resolved else {
        return Ok(empty_response(quota, None, page, limit, MSG_NO_SUBSCRIPTION));
    };
    let sub_snapshot = subscription::snapshot(sub, plan, now);
    if !subscription::is_active(sub, now) {
        return Ok(empty_response(
            quota,
            Some(sub_snapshot),
            page,
            limit,
            MSG_NO_SUBSCRIPTION,
        ));
    }

    // 3. Limit gates, first violated wins
    if let Some(message) = first_exceeded_limit(&quota, plan) {
        return Ok(empty_response(
            quota,
            Some(sub_snapshot),
            page,
            limit,
            message,
        ));
    }

    // 4. The marketplace window query
    let prefs = VendorPreferences::find()
        .filter(vendor_preferences::Column::VendorId.eq(vendor_id))
        .one(db)
        .await?
        .map(PreferencesResponse::from);

    let window_start = now - Duration::days(LEAD_WINDOW_DAYS);
    let mut finder = Leads::find()
        .filter(leads::Column::Status.eq(LeadStatus::Available.to_string()))
        .filter(leads::Column::CreatedAt.gte(window_start));

    let auto_filter = prefs.as_ref().map(|p| p.auto_lead_filter).unwrap_or(false);

    // Explicit budget filters win over the preference band
    let (budget_min, budget_max) = match (query.budget_min, query.budget_max, &prefs) {
        (None, None, Some(p)) if auto_filter => (p.budget_min, p.budget_max),
        _ => (query.budget_min, query.budget_max),
    };
    if let Some(min) = budget_min {
        finder = finder.filter(leads::Column::Budget.gte(min));
    }
    if let Some(max) = budget_max {
        finder = finder.filter(leads::Column::Budget.lte(max));
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        finder = finder.filter(
            Condition::any()
                .add(leads::Column::Title.contains(search))
                .add(leads::Column::ProductName.contains(search)),
        );
    }

    let total = finder.clone().count(db).await?;
    let rows = finder
        .order_by_desc(leads::Column::CreatedAt)
        .offset((page - 1) * limit)
        .limit(limit)
        .all(db)
        .await?;

    // Preference matching runs after pagination; totals reflect the
    // unfiltered window query
    let data: Vec<LeadSummary> = rows
        .into_iter()
        .filter(|lead| match (&prefs, auto_filter) {
            (Some(p), true) => matches_preferences(lead, p),
            _ => true,
        })
        .map(LeadSummary::from)
        .collect();

    Ok(AvailableLeadsResponse {
        data,
        quota: Some(quota.into()),
        subscription: Some(sub_snapshot),
        pagination: Pagination { page, limit, total },
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn quota_row(daily: i32, weekly: i32, yearly: i32) -> vendor_quotas::Model {
        vendor_quotas::Model {
            id: 1,
            vendor_id: Uuid::new_v4(),
            daily_used: daily,
            weekly_used: weekly,
            yearly_used: yearly,
            daily_limit: 0,
            weekly_limit: 0,
            yearly_limit: 0,
            daily_reset_at: None,
            weekly_reset_at: None,
            yearly_reset_at: None,
            created_at: dt("2025-01-01 00:00:00"),
            updated_at: dt("2025-01-01 00:00:00"),
        }
    }

    fn plan_row(daily: i32, weekly: i32, yearly: i32) -> plans::Model {
        plans::Model {
            id: 1,
            name: "Growth".to_string(),
            daily_limit: daily,
            weekly_limit: weekly,
            yearly_limit: yearly,
            price: dec!(999.00),
            extra_lead_price: dec!(49.00),
            created_at: dt("2025-01-01 00:00:00"),
        }
    }

    #[test]
    fn daily_limit_wins_over_weekly() {
        let quota = quota_row(5, 2, 10);
        let plan = plan_row(5, 20, 100);
        assert_eq!(first_exceeded_limit(&quota, &plan), Some(MSG_DAILY_LIMIT));
    }

    #[test]
    fn weekly_checked_after_daily() {
        let quota = quota_row(1, 20, 10);
        let plan = plan_row(5, 20, 100);
        assert_eq!(first_exceeded_limit(&quota, &plan), Some(MSG_WEEKLY_LIMIT));
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let quota = quota_row(999, 999, 999);
        let plan = plan_row(0, 0, 0);
        assert_eq!(first_exceeded_limit(&quota, &plan), None);
    }

    #[test]
    fn under_every_limit_passes() {
        let quota = quota_row(4, 2, 10);
        let plan = plan_row(5, 20, 100);
        assert_eq!(first_exceeded_limit(&quota, &plan), None);
    }

    fn lead_row(title: &str, product: &str, location: Option<&str>) -> leads::Model {
        leads::Model {
            id: 1,
            title: title.to_string(),
            product_name: product.to_string(),
            budget: None,
            quantity: 1,
            location: location.map(str::to_string),
            status: "AVAILABLE".to_string(),
            buyer_name: "Buyer".to_string(),
            buyer_email: None,
            buyer_phone: None,
            vendor_id: None,
            created_at: dt("2025-06-01 00:00:00"),
        }
    }

    fn prefs(categories: &[&str], states: &[&str]) -> PreferencesResponse {
        PreferencesResponse {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            states: states.iter().map(|s| s.to_string()).collect(),
            cities: vec![],
            budget_min: None,
            budget_max: None,
            auto_lead_filter: true,
        }
    }

    #[test]
    fn category_matches_against_title_and_product() {
        let lead = lead_row("Bulk order", "Industrial Pumps", None);
        assert!(matches_preferences(&lead, &prefs(&["pumps"], &[])));
        assert!(!matches_preferences(&lead, &prefs(&["textiles"], &[])));
    }

    #[test]
    fn location_matches_against_free_text() {
        let lead = lead_row("Bulk order", "Pumps", Some("Pune, Maharashtra"));
        assert!(matches_preferences(&lead, &prefs(&[], &["maharashtra"])));
        assert!(!matches_preferences(&lead, &prefs(&[], &["gujarat"])));
    }

    #[test]
    fn empty_preference_lists_match_everything() {
        let lead = lead_row("Anything", "At all", None);
        assert!(matches_preferences(&lead, &prefs(&[], &[])));
    }
}
