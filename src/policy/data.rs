//! Policy data structures matching the agency book-of-business format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a policy
///
/// The UI offers `active`, `pending`, `expired` and `cancelled`, but the data
/// layer accepts any label: unknown values round-trip untouched instead of
/// breaking legacy records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyStatus {
    Active,
    Pending,
    Expired,
    Cancelled,
    /// Any label outside the known set, preserved verbatim
    Other(String),
}

impl PolicyStatus {
    /// Parse a status label; never fails, unknown labels become `Other`
    pub fn parse(label: &str) -> Self {
        match label {
            "active" => PolicyStatus::Active,
            "pending" => PolicyStatus::Pending,
            "expired" => PolicyStatus::Expired,
            "cancelled" => PolicyStatus::Cancelled,
            other => PolicyStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PolicyStatus::Active => "active",
            PolicyStatus::Pending => "pending",
            PolicyStatus::Expired => "expired",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Other(label) => label,
        }
    }
}

impl From<String> for PolicyStatus {
    fn from(label: String) -> Self {
        PolicyStatus::parse(&label)
    }
}

impl From<PolicyStatus> for String {
    fn from(status: PolicyStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Default for PolicyStatus {
    fn default() -> Self {
        PolicyStatus::Active
    }
}

/// Line of coverage
///
/// Same open enumeration treatment as [`PolicyStatus`]: five suggested lines,
/// any other carrier-specific label is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PolicyType {
    Auto,
    Home,
    Life,
    Health,
    Business,
    Other(String),
}

impl PolicyType {
    pub fn parse(label: &str) -> Self {
        match label {
            "Auto" => PolicyType::Auto,
            "Home" => PolicyType::Home,
            "Life" => PolicyType::Life,
            "Health" => PolicyType::Health,
            "Business" => PolicyType::Business,
            other => PolicyType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PolicyType::Auto => "Auto",
            PolicyType::Home => "Home",
            PolicyType::Life => "Life",
            PolicyType::Health => "Health",
            PolicyType::Business => "Business",
            PolicyType::Other(label) => label,
        }
    }
}

impl From<String> for PolicyType {
    fn from(label: String) -> Self {
        PolicyType::parse(&label)
    }
}

impl From<PolicyType> for String {
    fn from(kind: PolicyType) -> Self {
        kind.as_str().to_string()
    }
}

/// A single policy record in the book of business
///
/// `client_id` is a soft reference: it is expected to point at an existing
/// client but nothing enforces that the target still exists. `premium` is
/// carried as exact decimal text and only parsed when arithmetic is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Store-assigned identifier, immutable once assigned
    pub id: u32,

    /// Owning client (soft reference, may dangle)
    pub client_id: u32,

    /// Human-assigned policy number; not guaranteed unique
    pub policy_number: String,

    /// Line of coverage
    #[serde(rename = "type")]
    pub policy_type: PolicyType,

    /// Underwriting carrier, free text
    pub carrier: String,

    /// First day of coverage
    pub start_date: NaiveDate,

    /// Last day of coverage; expected after `start_date` but not validated
    pub expiration_date: NaiveDate,

    /// Premium amount as decimal text, e.g. `"1200.00"`
    pub premium: String,

    /// Lifecycle status
    pub status: PolicyStatus,
}

impl Policy {
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Coverage span in whole days (expiration minus start)
    pub fn coverage_span_days(&self) -> i64 {
        (self.expiration_date - self.start_date).num_days()
    }
}
