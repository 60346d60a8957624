//! Record store boundary
//!
//! Typed CRUD over clients and policies plus the filtered queries the
//! dashboard engine needs. The trait is the seam: the in-memory backend here
//! is the concrete store, and a relational or document backend slots in
//! behind the same interface.

mod memory;

pub use memory::InMemoryStore;

use crate::client::{Client, ClientStatus};
use crate::policy::{Policy, PolicyStatus, PolicyType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A rejected field on create/update; the record is never partially written
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Store operation failure
///
/// Not-found is distinct from validation so callers can render "not found"
/// rather than "bad input". Backend faults (connection loss etc.) surface as
/// `Backend` and carry no retry logic of their own.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("client {0} not found")]
    ClientNotFound(u32),

    #[error("policy {0} not found")]
    PolicyNotFound(u32),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("store backend error: {0}")]
    Backend(String),
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(())
    }
}

fn require_decimal(field: &'static str, value: &str) -> Result<(), ValidationError> {
    Decimal::from_str(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new(field, format!("{:?} is not a decimal amount", value)))
}

/// Input for creating a client; the store assigns the id
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub kra_pin: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<NaiveDate>,
}

impl NewClient {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("email", &self.email)?;
        require_non_empty("phone", &self.phone)
    }
}

/// Partial client update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub kra_pin: Option<String>,
    #[serde(default)]
    pub id_number: Option<String>,
    #[serde(default)]
    pub status: Option<ClientStatus>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<NaiveDate>,
}

impl ClientUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(email) = &self.email {
            require_non_empty("email", email)?;
        }
        if let Some(phone) = &self.phone {
            require_non_empty("phone", phone)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, client: &mut Client) {
        if let Some(name) = &self.name {
            client.name = name.clone();
        }
        if let Some(email) = &self.email {
            client.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            client.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            client.address = Some(address.clone());
        }
        if let Some(kra_pin) = &self.kra_pin {
            client.kra_pin = Some(kra_pin.clone());
        }
        if let Some(id_number) = &self.id_number {
            client.id_number = Some(id_number.clone());
        }
        if let Some(status) = &self.status {
            client.status = status.clone();
        }
        if let Some(avatar) = &self.avatar {
            client.avatar = Some(avatar.clone());
        }
        if let Some(date) = self.last_contact_date {
            client.last_contact_date = Some(date);
        }
    }
}

/// Input for creating a policy; the store assigns the id
///
/// `client_id` must resolve at creation time; it may dangle later if the
/// client is deleted. `expiration_date > start_date` is expected but not
/// enforced, matching observed behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPolicy {
    pub client_id: u32,
    pub policy_number: String,
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    pub carrier: String,
    pub start_date: NaiveDate,
    pub expiration_date: NaiveDate,
    pub premium: String,
    #[serde(default)]
    pub status: PolicyStatus,
}

impl NewPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("policyNumber", &self.policy_number)?;
        require_non_empty("carrier", &self.carrier)?;
        require_decimal("premium", &self.premium)
    }
}

/// Partial policy update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    #[serde(default)]
    pub client_id: Option<u32>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default, rename = "type")]
    pub policy_type: Option<PolicyType>,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub premium: Option<String>,
    #[serde(default)]
    pub status: Option<PolicyStatus>,
}

impl PolicyUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(number) = &self.policy_number {
            require_non_empty("policyNumber", number)?;
        }
        if let Some(carrier) = &self.carrier {
            require_non_empty("carrier", carrier)?;
        }
        if let Some(premium) = &self.premium {
            require_decimal("premium", premium)?;
        }
        Ok(())
    }

    pub fn apply_to(&self, policy: &mut Policy) {
        if let Some(client_id) = self.client_id {
            policy.client_id = client_id;
        }
        if let Some(number) = &self.policy_number {
            policy.policy_number = number.clone();
        }
        if let Some(kind) = &self.policy_type {
            policy.policy_type = kind.clone();
        }
        if let Some(carrier) = &self.carrier {
            policy.carrier = carrier.clone();
        }
        if let Some(date) = self.start_date {
            policy.start_date = date;
        }
        if let Some(date) = self.expiration_date {
            policy.expiration_date = date;
        }
        if let Some(premium) = &self.premium {
            policy.premium = premium.trim().to_string();
        }
        if let Some(status) = &self.status {
            policy.status = status.clone();
        }
    }
}

/// Storage seam for client and policy records
///
/// Listings return newest-first. Single-record lookups distinguish "absent"
/// (`Ok(None)`) from backend failure.
pub trait RecordStore {
    fn clients(&self) -> Result<Vec<Client>, StoreError>;
    fn client(&self, id: u32) -> Result<Option<Client>, StoreError>;
    fn create_client(&mut self, input: NewClient) -> Result<Client, StoreError>;
    fn update_client(&mut self, id: u32, updates: ClientUpdate) -> Result<Client, StoreError>;
    fn delete_client(&mut self, id: u32) -> Result<(), StoreError>;

    fn policies(&self) -> Result<Vec<Policy>, StoreError>;
    fn policy(&self, id: u32) -> Result<Option<Policy>, StoreError>;
    fn policies_by_client(&self, client_id: u32) -> Result<Vec<Policy>, StoreError>;
    fn policies_by_status(&self, status: &PolicyStatus) -> Result<Vec<Policy>, StoreError>;
    /// Policies with `from <= expiration_date < to`
    fn policies_expiring_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Policy>, StoreError>;
    fn create_policy(&mut self, input: NewPolicy) -> Result<Policy, StoreError>;
    fn update_policy(&mut self, id: u32, updates: PolicyUpdate) -> Result<Policy, StoreError>;
}
