//! Per-client book-of-business report
//!
//! Loads client and policy CSV exports, aggregates each client's policies in
//! parallel and writes a per-client summary CSV alongside the overall
//! dashboard figures.

use agency_system::client::{load_clients, Client};
use agency_system::dashboard::compute_dashboard_stats;
use agency_system::policy::{load_policies, Policy};
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "book_report", about = "Aggregate a book of business per client")]
struct Args {
    /// Client export CSV
    #[arg(long)]
    clients: PathBuf,

    /// Policy export CSV
    #[arg(long)]
    policies: PathBuf,

    /// Reference date (defaults to today), format YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,

    /// Output CSV path
    #[arg(long, default_value = "book_report.csv")]
    output: PathBuf,
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    s.parse()
}

/// One client's aggregated slice of the book
#[derive(Debug)]
struct ClientRow {
    client_id: u32,
    name: String,
    policy_count: usize,
    active_policies: usize,
    active_premium: Decimal,
    next_expiration: Option<NaiveDate>,
}

fn summarize_client(client: &Client, policies: &[Policy], as_of: NaiveDate) -> anyhow::Result<ClientRow> {
    let owned: Vec<&Policy> = policies.iter().filter(|p| p.client_id == client.id).collect();

    let mut active_premium = Decimal::ZERO;
    let mut active_policies = 0usize;
    for policy in owned.iter().filter(|p| p.is_active()) {
        active_policies += 1;
        active_premium += Decimal::from_str(policy.premium.trim()).map_err(|_| {
            anyhow!(
                "policy {}: unparseable premium {:?}",
                policy.id,
                policy.premium
            )
        })?;
    }

    let next_expiration = owned
        .iter()
        .filter(|p| p.is_active() && p.expiration_date >= as_of)
        .map(|p| p.expiration_date)
        .min();

    Ok(ClientRow {
        client_id: client.id,
        name: client.name.clone(),
        policy_count: owned.len(),
        active_policies,
        active_premium,
        next_expiration,
    })
}

/// Write the per-client rows; names are free text, so fields go through the
/// csv writer for quoting rather than bare line formatting
fn write_report<W: Write>(writer: &mut csv::Writer<W>, rows: &[ClientRow]) -> csv::Result<()> {
    writer.write_record([
        "ClientID",
        "Name",
        "PolicyCount",
        "ActivePolicies",
        "ActivePremium",
        "NextExpiration",
    ])?;
    for row in rows {
        writer.write_record([
            row.client_id.to_string(),
            row.name.clone(),
            row.policy_count.to_string(),
            row.active_policies.to_string(),
            row.active_premium.to_string(),
            row.next_expiration.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_quotes_comma_in_client_name() {
        let rows = vec![ClientRow {
            client_id: 7,
            name: "Smith, John".to_string(),
            policy_count: 2,
            active_policies: 1,
            active_premium: Decimal::from_str("1200.50").unwrap(),
            next_expiration: Some(NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()),
        }];

        let mut writer = csv::Writer::from_writer(Vec::new());
        write_report(&mut writer, &rows).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 6);
        assert_eq!(&record[1], "Smith, John");
        assert_eq!(&record[4], "1200.50");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let clients = load_clients(&args.clients)
        .map_err(|e| anyhow!("loading {}: {}", args.clients.display(), e))?;
    let policies = load_policies(&args.policies)
        .map_err(|e| anyhow!("loading {}: {}", args.policies.display(), e))?;
    println!(
        "Loaded {} clients / {} policies in {:?}",
        clients.len(),
        policies.len(),
        start.elapsed()
    );

    let as_of = args.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

    // Per-client aggregation is independent, so fan out across the book
    let mut rows: Vec<ClientRow> = clients
        .par_iter()
        .map(|client| summarize_client(client, &policies, as_of))
        .collect::<anyhow::Result<Vec<_>>>()?;
    rows.sort_by(|a, b| b.active_premium.cmp(&a.active_premium));

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_report(&mut writer, &rows)?;
    println!("Per-client report written to: {}", args.output.display());

    // Overall dashboard figures for the same snapshot
    let stats = compute_dashboard_stats(&policies, &clients, as_of)?;
    println!("\nBook summary as of {}:", as_of);
    println!("  Active Policies:    {}", stats.total_active_policies);
    println!("  Premium Volume:     ${}", stats.total_premium_volume);
    println!("  Expiring (30 days): {}", stats.upcoming_expirations);
    println!("  Active Clients:     {}", stats.active_clients);

    Ok(())
}
