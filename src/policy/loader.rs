//! Load policy records from a book-of-business CSV export

use super::{Policy, PolicyStatus, PolicyType};
use csv::Reader;
use rust_decimal::Decimal;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

/// Raw CSV row matching the policy export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PolicyID")]
    policy_id: u32,
    #[serde(rename = "ClientID")]
    client_id: u32,
    #[serde(rename = "PolicyNumber")]
    policy_number: String,
    #[serde(rename = "Type")]
    policy_type: String,
    #[serde(rename = "Carrier")]
    carrier: String,
    #[serde(rename = "StartDate")]
    start_date: chrono::NaiveDate,
    #[serde(rename = "ExpirationDate")]
    expiration_date: chrono::NaiveDate,
    #[serde(rename = "Premium")]
    premium: String,
    #[serde(rename = "Status")]
    status: String,
}

impl CsvRow {
    fn to_policy(self) -> Result<Policy, Box<dyn Error>> {
        // Premium stays as text on the record, but a row that cannot parse as
        // a decimal would poison every later aggregation, so reject it here.
        if Decimal::from_str(self.premium.trim()).is_err() {
            return Err(format!(
                "Policy {}: unparseable premium {:?}",
                self.policy_id, self.premium
            )
            .into());
        }

        Ok(Policy {
            id: self.policy_id,
            client_id: self.client_id,
            policy_number: self.policy_number,
            policy_type: PolicyType::parse(&self.policy_type),
            carrier: self.carrier,
            start_date: self.start_date,
            expiration_date: self.expiration_date,
            premium: self.premium.trim().to_string(),
            status: PolicyStatus::parse(&self.status),
        })
    }
}

/// Load all policies from a CSV file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut policies = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        policies.push(row.to_policy()?);
    }

    Ok(policies)
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Policy>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut policies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        policies.push(row.to_policy()?);
    }

    Ok(policies)
}
