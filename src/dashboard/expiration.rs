//! Expiration classification and renewal
//!
//! Drives the "upcoming expirations" widget, the renew action and the
//! short-term (installment) policy listing.

use crate::client::Client;
use crate::policy::Policy;
use chrono::{Duration, Months, NaiveDate};
use serde::Serialize;

/// Horizon for the dashboard alert list.
///
/// Wider than the 30-day KPI window used by [`STATS_EXPIRATION_WINDOW_DAYS`]:
/// the alert list warns earlier than the hard count.
///
/// [`STATS_EXPIRATION_WINDOW_DAYS`]: crate::dashboard::STATS_EXPIRATION_WINDOW_DAYS
pub const ALERT_HORIZON_DAYS: i64 = 60;

/// A policy within this many days of expiry (or already past it) may be renewed
pub const RENEWAL_WINDOW_DAYS: i64 = 60;

/// Maximum coverage span for a policy to count as installment/short-term
pub const INSTALLMENT_MAX_SPAN_DAYS: i64 = 45;

/// Display placeholder when a policy's client reference no longer resolves
pub const UNKNOWN_CLIENT: &str = "Unknown client";

/// Signed days from `today` until the policy's expiration (negative if past)
pub fn days_until_expiration(policy: &Policy, today: NaiveDate) -> i64 {
    (policy.expiration_date - today).num_days()
}

/// Policies expiring within the horizon, in input order
///
/// The lower bound is strict: a policy expiring exactly today is NOT listed
/// here, even though the 30-day stats count includes it. Both call sites
/// (30-day and 60-day) inherited this asymmetry and widgets depend on it.
pub fn classify_expiring_policies(
    policies: &[Policy],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<&Policy> {
    let horizon_end = today + Duration::days(horizon_days);
    policies
        .iter()
        .filter(|p| p.expiration_date > today && p.expiration_date < horizon_end)
        .collect()
}

/// Whether the renew action is offered for this policy
///
/// True within 60 days of expiry and for any already-expired policy, no
/// matter how long ago it lapsed. The unbounded past-expiry side is observed
/// production behavior and is kept as-is.
pub fn is_renewable(policy: &Policy, today: NaiveDate) -> bool {
    days_until_expiration(policy, today) <= RENEWAL_WINDOW_DAYS
}

/// Produce the renewed policy: expiration pushed out one calendar year
///
/// Status, premium and start date are untouched. Persisting the returned
/// record is the caller's explicit next step. Uses plain 12-month calendar
/// addition, so a Feb 29 expiration clamps to Feb 28 of the following year.
pub fn renew_policy(policy: &Policy) -> Policy {
    let renewed_expiration = policy
        .expiration_date
        .checked_add_months(Months::new(12))
        // checked_add_months only fails at chrono's maximum year
        .unwrap_or(policy.expiration_date);

    Policy {
        expiration_date: renewed_expiration,
        ..policy.clone()
    }
}

/// Active policies whose coverage span is 45 days or less, in input order
///
/// These are the one-month installment covers sold against an annual premium;
/// the filter is purely span-based with no reference date beyond the
/// active-status check.
pub fn classify_installment_policies(policies: &[Policy]) -> Vec<&Policy> {
    policies
        .iter()
        .filter(|p| p.is_active() && p.coverage_span_days() <= INSTALLMENT_MAX_SPAN_DAYS)
        .collect()
}

/// One row of the upcoming-expirations widget
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationAlert {
    pub policy_id: u32,
    pub policy_number: String,
    pub client_name: String,
    pub expiration_date: NaiveDate,
    pub days_remaining: i64,
}

/// Join expiring policies with client names for display
///
/// A dangling `client_id` is not an error: the row simply shows the
/// "Unknown client" placeholder.
pub fn expiration_alerts(
    policies: &[Policy],
    clients: &[Client],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<ExpirationAlert> {
    classify_expiring_policies(policies, today, horizon_days)
        .into_iter()
        .map(|policy| {
            let client_name = clients
                .iter()
                .find(|c| c.id == policy.client_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

            ExpirationAlert {
                policy_id: policy.id,
                policy_number: policy.policy_number.clone(),
                client_name,
                expiration_date: policy.expiration_date,
                days_remaining: days_until_expiration(policy, today),
            }
        })
        .collect()
}
