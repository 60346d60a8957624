//! Client data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Standing of a client relationship
///
/// Open enumeration like the policy labels: `active`, `inactive` and
/// `pending` are the suggested values, anything else is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClientStatus {
    Active,
    Inactive,
    Pending,
    Other(String),
}

impl ClientStatus {
    pub fn parse(label: &str) -> Self {
        match label {
            "active" => ClientStatus::Active,
            "inactive" => ClientStatus::Inactive,
            "pending" => ClientStatus::Pending,
            other => ClientStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Pending => "pending",
            ClientStatus::Other(label) => label,
        }
    }
}

impl From<String> for ClientStatus {
    fn from(label: String) -> Self {
        ClientStatus::parse(&label)
    }
}

impl From<ClientStatus> for String {
    fn from(status: ClientStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Default for ClientStatus {
    /// Records without a stored status count as active
    fn default() -> Self {
        ClientStatus::Active
    }
}

/// A client of the agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Store-assigned identifier, immutable once assigned
    pub id: u32,

    pub name: String,
    pub email: String,
    pub phone: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Tax identifier (KRA PIN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kra_pin: Option<String>,

    /// National ID number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,

    #[serde(default)]
    pub status: ClientStatus,

    /// Avatar image reference (URL or embedded data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<NaiveDate>,
}

impl Client {
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_status_defaults_to_active() {
        let json = r#"{"id":1,"name":"John Smith","email":"john.smith@example.com","phone":"555-0101"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.status, ClientStatus::Active);
        assert!(client.is_active());
        assert!(client.address.is_none());
    }

    #[test]
    fn test_unknown_status_preserved() {
        let status = ClientStatus::parse("prospect");
        assert_eq!(status, ClientStatus::Other("prospect".to_string()));
        assert_eq!(status.as_str(), "prospect");
    }

    #[test]
    fn test_wire_shape() {
        let client = Client {
            id: 2,
            name: "Sarah Johnson".to_string(),
            email: "sarah.j@example.com".to_string(),
            phone: "555-0102".to_string(),
            address: Some("456 Oak Dr, Springfield, IL".to_string()),
            kra_pin: Some("A001234567Z".to_string()),
            id_number: None,
            status: ClientStatus::Active,
            avatar: None,
            last_contact_date: NaiveDate::from_ymd_opt(2024, 12, 1),
        };

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["kraPin"], "A001234567Z");
        assert_eq!(json["lastContactDate"], "2024-12-01");
        assert_eq!(json["status"], "active");
        assert!(json.get("idNumber").is_none());
    }
}
