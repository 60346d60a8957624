//! Load client records from a CSV export

use super::{Client, ClientStatus};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the client export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ClientID")]
    client_id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Phone")]
    phone: String,
    #[serde(rename = "Address")]
    address: Option<String>,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "KraPin")]
    kra_pin: Option<String>,
    #[serde(rename = "IdNumber")]
    id_number: Option<String>,
    #[serde(rename = "LastContactDate")]
    last_contact_date: Option<chrono::NaiveDate>,
}

impl CsvRow {
    fn to_client(self) -> Client {
        Client {
            id: self.client_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address.filter(|a| !a.is_empty()),
            kra_pin: self.kra_pin.filter(|p| !p.is_empty()),
            id_number: self.id_number.filter(|n| !n.is_empty()),
            status: ClientStatus::parse(&self.status),
            avatar: None,
            last_contact_date: self.last_contact_date,
        }
    }
}

/// Load all clients from a CSV file
pub fn load_clients<P: AsRef<Path>>(path: P) -> Result<Vec<Client>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut clients = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        clients.push(row.to_client());
    }

    Ok(clients)
}

/// Load clients from any reader (e.g., string buffer, network stream)
pub fn load_clients_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Client>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut clients = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        clients.push(row.to_client());
    }

    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ClientID,Name,Email,Phone,Address,Status,KraPin,IdNumber,LastContactDate
1,John Smith,john.smith@example.com,555-0101,\"123 Maple Ave, Springfield, IL\",active,,,2025-01-15
2,Sarah Johnson,sarah.j@example.com,555-0102,,active,A001234567Z,,
3,Michael Brown,m.brown@example.com,555-0103,\"789 Pine Ln, Springfield, IL\",inactive,,,2023-12-01
";

    #[test]
    fn test_load_clients() {
        let clients = load_clients_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(clients.len(), 3);

        assert_eq!(clients[0].name, "John Smith");
        assert_eq!(clients[0].status, ClientStatus::Active);
        assert_eq!(
            clients[0].last_contact_date,
            chrono::NaiveDate::from_ymd_opt(2025, 1, 15)
        );

        // Empty optional columns come through as None
        assert_eq!(clients[1].address, None);
        assert_eq!(clients[1].kra_pin.as_deref(), Some("A001234567Z"));

        assert_eq!(clients[2].status, ClientStatus::Inactive);
    }
}
