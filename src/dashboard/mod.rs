//! Aggregation and expiration engine
//!
//! Pure, synchronous computations over record snapshots. All reference dates
//! are injected; nothing here reads the system clock or touches storage.

mod expiration;
mod stats;

pub use expiration::{
    classify_expiring_policies, classify_installment_policies, days_until_expiration,
    expiration_alerts, is_renewable, renew_policy, ExpirationAlert, ALERT_HORIZON_DAYS,
    INSTALLMENT_MAX_SPAN_DAYS, RENEWAL_WINDOW_DAYS, UNKNOWN_CLIENT,
};
pub use stats::{
    compute_dashboard_stats, DashboardStats, StatsError, STATS_EXPIRATION_WINDOW_DAYS,
};
