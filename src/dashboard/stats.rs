//! Dashboard summary statistics
//!
//! Pure aggregation over an in-memory snapshot of the book: no I/O, no shared
//! state, and the reference date is always injected by the caller.

use crate::client::Client;
use crate::policy::Policy;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Forward-looking window for the "expiring soon" KPI count.
///
/// Deliberately distinct from the 60-day alert horizon in the expiration
/// module: the KPI is a hard count, the alert list is a softer early warning.
pub const STATS_EXPIRATION_WINDOW_DAYS: i64 = 30;

/// Summary figures shown on the dashboard
///
/// Recomputed on demand from current records; never cached or persisted.
/// `total_premium_volume` serializes as a decimal string so money never
/// crosses the boundary as a binary float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Count of policies with status `active`
    pub total_active_policies: u32,

    /// Exact decimal sum of premiums over active policies
    pub total_premium_volume: Decimal,

    /// Active policies expiring within the next 30 days
    pub upcoming_expirations: u32,

    /// Count of clients with status `active`
    pub active_clients: u32,
}

impl DashboardStats {
    pub fn zero() -> Self {
        Self {
            total_active_policies: 0,
            total_premium_volume: Decimal::ZERO,
            upcoming_expirations: 0,
            active_clients: 0,
        }
    }
}

/// Aggregation failure
#[derive(Debug, Error)]
pub enum StatsError {
    /// A policy carries premium text that does not parse as a decimal.
    /// The whole aggregation call fails rather than letting a bad record
    /// silently drop out of the sum.
    #[error("policy {policy_id}: unparseable premium {premium:?}")]
    InvalidPremium { policy_id: u32, premium: String },
}

/// Compute the dashboard summary from a snapshot of the book
///
/// The expiration count window is inclusive of `today` and exclusive of
/// `today + 30 days`. Empty inputs yield all-zero stats, not an error.
pub fn compute_dashboard_stats(
    policies: &[Policy],
    clients: &[Client],
    today: NaiveDate,
) -> Result<DashboardStats, StatsError> {
    let window_end = today + Duration::days(STATS_EXPIRATION_WINDOW_DAYS);

    let mut total_active_policies = 0u32;
    let mut total_premium_volume = Decimal::ZERO;
    let mut upcoming_expirations = 0u32;

    for policy in policies.iter().filter(|p| p.is_active()) {
        total_active_policies += 1;

        let premium = Decimal::from_str(policy.premium.trim()).map_err(|e| {
            log::warn!("policy {}: premium {:?} failed to parse: {}", policy.id, policy.premium, e);
            StatsError::InvalidPremium {
                policy_id: policy.id,
                premium: policy.premium.clone(),
            }
        })?;
        total_premium_volume += premium;

        if policy.expiration_date >= today && policy.expiration_date < window_end {
            upcoming_expirations += 1;
        }
    }

    let active_clients = clients.iter().filter(|c| c.is_active()).count() as u32;

    Ok(DashboardStats {
        total_active_policies,
        total_premium_volume,
        upcoming_expirations,
        active_clients,
    })
}
