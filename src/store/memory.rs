//! In-memory record store
//!
//! The concrete backend used by the demo binary, the API handler and tests.
//! Ids are store-assigned and sequential; listings come back newest-first.

use super::{
    ClientUpdate, NewClient, NewPolicy, PolicyUpdate, RecordStore, StoreError,
};
use crate::client::{Client, ClientStatus};
use crate::policy::{Policy, PolicyStatus, PolicyType};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone)]
pub struct InMemoryStore {
    clients: Vec<Client>,
    policies: Vec<Policy>,
    next_client_id: u32,
    next_policy_id: u32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
            policies: Vec::new(),
            next_client_id: 1,
            next_policy_id: 1,
        }
    }

    /// Store pre-populated with the standard demo book: three clients and
    /// four policies with expirations staggered around `today`.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut store = Self::new();
        log::info!("seeding in-memory store");

        let john = store
            .create_client(NewClient {
                name: "John Smith".to_string(),
                email: "john.smith@example.com".to_string(),
                phone: "555-0101".to_string(),
                address: Some("123 Maple Ave, Springfield, IL".to_string()),
                kra_pin: None,
                id_number: None,
                status: ClientStatus::Active,
                avatar: None,
                last_contact_date: Some(today),
            })
            .expect("seed client is valid");

        let sarah = store
            .create_client(NewClient {
                name: "Sarah Johnson".to_string(),
                email: "sarah.j@example.com".to_string(),
                phone: "555-0102".to_string(),
                address: Some("456 Oak Dr, Springfield, IL".to_string()),
                kra_pin: None,
                id_number: None,
                status: ClientStatus::Active,
                avatar: None,
                last_contact_date: Some(today),
            })
            .expect("seed client is valid");

        let michael = store
            .create_client(NewClient {
                name: "Michael Brown".to_string(),
                email: "m.brown@example.com".to_string(),
                phone: "555-0103".to_string(),
                address: Some("789 Pine Ln, Springfield, IL".to_string()),
                kra_pin: None,
                id_number: None,
                status: ClientStatus::Inactive,
                avatar: None,
                last_contact_date: NaiveDate::from_ymd_opt(2023, 12, 1),
            })
            .expect("seed client is valid");

        let seeds = [
            // Expiring soon
            NewPolicy {
                client_id: john.id,
                policy_number: "AUTO-1001".to_string(),
                policy_type: PolicyType::Auto,
                carrier: "SafeDrive Insurance".to_string(),
                start_date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                expiration_date: today + Duration::days(7),
                premium: "1200.00".to_string(),
                status: PolicyStatus::Active,
            },
            NewPolicy {
                client_id: john.id,
                policy_number: "HOME-2001".to_string(),
                policy_type: PolicyType::Home,
                carrier: "SecureHome Corp".to_string(),
                start_date: NaiveDate::from_ymd_opt(2023, 5, 20).unwrap(),
                expiration_date: today + Duration::days(365),
                premium: "850.50".to_string(),
                status: PolicyStatus::Active,
            },
            NewPolicy {
                client_id: sarah.id,
                policy_number: "LIFE-3001".to_string(),
                policy_type: PolicyType::Life,
                carrier: "FamilyFirst Life".to_string(),
                start_date: NaiveDate::from_ymd_opt(2020, 3, 10).unwrap(),
                expiration_date: NaiveDate::from_ymd_opt(2030, 3, 10).unwrap(),
                premium: "500.00".to_string(),
                status: PolicyStatus::Active,
            },
            NewPolicy {
                client_id: michael.id,
                policy_number: "AUTO-1002".to_string(),
                policy_type: PolicyType::Auto,
                carrier: "SafeDrive Insurance".to_string(),
                start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                expiration_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                premium: "1100.00".to_string(),
                status: PolicyStatus::Expired,
            },
        ];

        for seed in seeds {
            store.create_policy(seed).expect("seed policy is valid");
        }

        store
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryStore {
    fn clients(&self) -> Result<Vec<Client>, StoreError> {
        let mut clients = self.clients.clone();
        clients.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(clients)
    }

    fn client(&self, id: u32) -> Result<Option<Client>, StoreError> {
        Ok(self.clients.iter().find(|c| c.id == id).cloned())
    }

    fn create_client(&mut self, input: NewClient) -> Result<Client, StoreError> {
        input.validate()?;

        let client = Client {
            id: self.next_client_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            kra_pin: input.kra_pin,
            id_number: input.id_number,
            status: input.status,
            avatar: input.avatar,
            last_contact_date: input.last_contact_date,
        };
        self.next_client_id += 1;
        self.clients.push(client.clone());
        log::debug!("created client {} ({})", client.id, client.name);
        Ok(client)
    }

    fn update_client(&mut self, id: u32, updates: ClientUpdate) -> Result<Client, StoreError> {
        updates.validate()?;

        let client = self
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::ClientNotFound(id))?;
        updates.apply_to(client);
        Ok(client.clone())
    }

    fn delete_client(&mut self, id: u32) -> Result<(), StoreError> {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        if self.clients.len() == before {
            return Err(StoreError::ClientNotFound(id));
        }
        // Policies keep their client_id: references are soft and may dangle
        Ok(())
    }

    fn policies(&self) -> Result<Vec<Policy>, StoreError> {
        let mut policies = self.policies.clone();
        policies.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(policies)
    }

    fn policy(&self, id: u32) -> Result<Option<Policy>, StoreError> {
        Ok(self.policies.iter().find(|p| p.id == id).cloned())
    }

    fn policies_by_client(&self, client_id: u32) -> Result<Vec<Policy>, StoreError> {
        Ok(self
            .policies
            .iter()
            .filter(|p| p.client_id == client_id)
            .cloned()
            .collect())
    }

    fn policies_by_status(&self, status: &PolicyStatus) -> Result<Vec<Policy>, StoreError> {
        Ok(self
            .policies
            .iter()
            .filter(|p| &p.status == status)
            .cloned()
            .collect())
    }

    fn policies_expiring_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Policy>, StoreError> {
        Ok(self
            .policies
            .iter()
            .filter(|p| p.expiration_date >= from && p.expiration_date < to)
            .cloned()
            .collect())
    }

    fn create_policy(&mut self, input: NewPolicy) -> Result<Policy, StoreError> {
        input.validate()?;

        // The client must exist at creation time; it may be deleted later,
        // leaving the reference dangling.
        if !self.clients.iter().any(|c| c.id == input.client_id) {
            return Err(StoreError::ClientNotFound(input.client_id));
        }

        let policy = Policy {
            id: self.next_policy_id,
            client_id: input.client_id,
            policy_number: input.policy_number,
            policy_type: input.policy_type,
            carrier: input.carrier,
            start_date: input.start_date,
            expiration_date: input.expiration_date,
            premium: input.premium.trim().to_string(),
            status: input.status,
        };
        self.next_policy_id += 1;
        self.policies.push(policy.clone());
        log::debug!("created policy {} ({})", policy.id, policy.policy_number);
        Ok(policy)
    }

    fn update_policy(&mut self, id: u32, updates: PolicyUpdate) -> Result<Policy, StoreError> {
        updates.validate()?;

        let policy = self
            .policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::PolicyNotFound(id))?;
        updates.apply_to(policy);
        Ok(policy.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{compute_dashboard_stats, expiration_alerts, UNKNOWN_CLIENT};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: "555-0100".to_string(),
            address: None,
            kra_pin: None,
            id_number: None,
            status: ClientStatus::Active,
            avatar: None,
            last_contact_date: None,
        }
    }

    fn new_policy(client_id: u32, number: &str, expiration: NaiveDate) -> NewPolicy {
        NewPolicy {
            client_id,
            policy_number: number.to_string(),
            policy_type: PolicyType::Auto,
            carrier: "SafeDrive Insurance".to_string(),
            start_date: date(2024, 1, 1),
            expiration_date: expiration,
            premium: "1200.00".to_string(),
            status: PolicyStatus::Active,
        }
    }

    #[test]
    fn test_ids_are_sequential_and_immutable() {
        let mut store = InMemoryStore::new();
        let a = store.create_client(new_client("Alice Ray")).unwrap();
        let b = store.create_client(new_client("Bob Hale")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        store.delete_client(a.id).unwrap();
        let c = store.create_client(new_client("Cara Lund")).unwrap();
        // Deleted ids are never reused
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_listings_are_newest_first() {
        let mut store = InMemoryStore::new();
        store.create_client(new_client("Alice Ray")).unwrap();
        store.create_client(new_client("Bob Hale")).unwrap();

        let ids: Vec<u32> = store.clients().unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_validation_rejects_empty_required_fields() {
        let mut store = InMemoryStore::new();
        let mut input = new_client("Alice Ray");
        input.email = "  ".to_string();

        match store.create_client(input).unwrap_err() {
            StoreError::Invalid(err) => assert_eq!(err.field, "email"),
            other => panic!("expected validation error, got {:?}", other),
        }
        // Nothing was written
        assert!(store.clients().unwrap().is_empty());
    }

    #[test]
    fn test_policy_creation_requires_existing_client() {
        let mut store = InMemoryStore::new();
        let err = store
            .create_policy(new_policy(42, "AUTO-1001", date(2026, 1, 1)))
            .unwrap_err();
        match err {
            StoreError::ClientNotFound(id) => assert_eq!(id, 42),
            other => panic!("expected ClientNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_creation_rejects_bad_premium() {
        let mut store = InMemoryStore::new();
        let client = store.create_client(new_client("Alice Ray")).unwrap();
        let mut input = new_policy(client.id, "AUTO-1001", date(2026, 1, 1));
        input.premium = "12,00".to_string();

        match store.create_policy(input).unwrap_err() {
            StoreError::Invalid(err) => assert_eq!(err.field, "premium"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_not_found_is_distinct_from_validation() {
        let mut store = InMemoryStore::new();
        let err = store
            .update_policy(7, PolicyUpdate::default())
            .unwrap_err();
        match err {
            StoreError::PolicyNotFound(id) => assert_eq!(id, 7),
            other => panic!("expected PolicyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut store = InMemoryStore::new();
        let client = store.create_client(new_client("Alice Ray")).unwrap();
        let policy = store
            .create_policy(new_policy(client.id, "AUTO-1001", date(2026, 1, 1)))
            .unwrap();

        let updated = store
            .update_policy(
                policy.id,
                PolicyUpdate {
                    expiration_date: Some(date(2027, 1, 1)),
                    ..PolicyUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.expiration_date, date(2027, 1, 1));
        assert_eq!(updated.premium, policy.premium);
        assert_eq!(updated.policy_number, policy.policy_number);
        assert_eq!(updated.status, policy.status);
    }

    #[test]
    fn test_filtered_queries() {
        let today = date(2025, 6, 1);
        let store = InMemoryStore::seeded(today);

        let active = store.policies_by_status(&PolicyStatus::Active).unwrap();
        assert_eq!(active.len(), 3);

        let expiring = store
            .policies_expiring_between(today, today + Duration::days(30))
            .unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].policy_number, "AUTO-1001");

        let johns = store.policies_by_client(1).unwrap();
        assert_eq!(johns.len(), 2);
    }

    #[test]
    fn test_deleting_client_leaves_policies_dangling() {
        let today = date(2025, 6, 1);
        let mut store = InMemoryStore::seeded(today);

        store.delete_client(1).unwrap();

        // The policies survive and the alert list falls back to the placeholder
        let policies = store.policies().unwrap();
        let clients = store.clients().unwrap();
        assert_eq!(store.policies_by_client(1).unwrap().len(), 2);

        let alerts = expiration_alerts(&policies, &clients, today, 60);
        assert!(alerts.iter().any(|a| a.client_name == UNKNOWN_CLIENT));
    }

    #[test]
    fn test_seeded_store_dashboard() {
        let today = date(2025, 6, 1);
        let store = InMemoryStore::seeded(today);

        let stats = compute_dashboard_stats(
            &store.policies().unwrap(),
            &store.clients().unwrap(),
            today,
        )
        .unwrap();

        assert_eq!(stats.total_active_policies, 3);
        assert_eq!(stats.upcoming_expirations, 1);
        assert_eq!(stats.active_clients, 2);
        assert_eq!(
            stats.total_premium_volume,
            "2550.50".parse::<rust_decimal::Decimal>().unwrap()
        );
    }
}
