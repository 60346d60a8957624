//! Agency System - back-office engine for an independent insurance agency
//!
//! This library provides:
//! - Client and policy records with open string-backed status labels
//! - A record store boundary with typed CRUD and filtered queries
//! - Dashboard aggregation (active counts, exact premium volume, expirations)
//! - Expiration classification, renewal eligibility and one-year renewal
//! - CSV loading for book-of-business exports

pub mod client;
pub mod dashboard;
pub mod policy;
pub mod store;

// Re-export commonly used types
pub use client::{Client, ClientStatus};
pub use dashboard::{compute_dashboard_stats, DashboardStats, StatsError};
pub use policy::{Policy, PolicyStatus, PolicyType};
pub use store::{InMemoryStore, RecordStore, StoreError};
