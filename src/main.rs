//! Agency System CLI
//!
//! Console demo: seeds the in-memory store, prints the dashboard and writes
//! an expiration report CSV.

use agency_system::dashboard::{
    classify_installment_policies, compute_dashboard_stats, expiration_alerts, is_renewable,
    ExpirationAlert, ALERT_HORIZON_DAYS,
};
use agency_system::store::InMemoryStore;
use agency_system::RecordStore;
use std::io::Write;

/// Client names are free text, so the report goes through the csv writer
/// for field quoting
fn write_expiration_report<W: Write>(
    writer: &mut csv::Writer<W>,
    alerts: &[ExpirationAlert],
) -> csv::Result<()> {
    writer.write_record([
        "PolicyID",
        "PolicyNumber",
        "Client",
        "ExpirationDate",
        "DaysRemaining",
    ])?;
    for alert in alerts {
        writer.write_record([
            alert.policy_id.to_string(),
            alert.policy_number.clone(),
            alert.client_name.clone(),
            alert.expiration_date.to_string(),
            alert.days_remaining.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Agency System v0.1.0");
    println!("====================\n");

    let today = chrono::Local::now().date_naive();
    let store = InMemoryStore::seeded(today);

    let policies = store.policies()?;
    let clients = store.clients()?;

    // Dashboard summary
    let stats = compute_dashboard_stats(&policies, &clients, today)?;
    println!("Dashboard ({}):", today);
    println!("  Active Policies:      {}", stats.total_active_policies);
    println!("  Premium Volume:       ${}", stats.total_premium_volume);
    println!("  Expiring (30 days):   {}", stats.upcoming_expirations);
    println!("  Active Clients:       {}", stats.active_clients);
    println!();

    // Upcoming expirations with renewal eligibility
    let alerts = expiration_alerts(&policies, &clients, today, ALERT_HORIZON_DAYS);
    println!("Upcoming Expirations ({}-day horizon):", ALERT_HORIZON_DAYS);
    println!("{:>8} {:<12} {:<20} {:>12} {:>6} {:>9}",
        "Policy", "Number", "Client", "Expires", "Days", "Renewable");
    println!("{}", "-".repeat(72));

    for alert in &alerts {
        let renewable = policies
            .iter()
            .find(|p| p.id == alert.policy_id)
            .map(|p| is_renewable(p, today))
            .unwrap_or(false);
        println!("{:>8} {:<12} {:<20} {:>12} {:>6} {:>9}",
            alert.policy_id,
            alert.policy_number,
            alert.client_name,
            alert.expiration_date.to_string(),
            alert.days_remaining,
            if renewable { "yes" } else { "no" },
        );
    }
    if alerts.is_empty() {
        println!("  (none)");
    }

    // Short-term installment covers
    let installments = classify_installment_policies(&policies);
    println!("\nInstallment policies: {}", installments.len());

    // Write full expiration report to CSV
    let csv_path = "expiration_report.csv";
    let mut writer = csv::Writer::from_path(csv_path)?;
    write_expiration_report(&mut writer, &alerts)?;
    println!("\nExpiration report written to: {}", csv_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_expiration_report_quotes_comma_in_client_name() {
        let alerts = vec![ExpirationAlert {
            policy_id: 3,
            policy_number: "AUTO-1001".to_string(),
            client_name: "Smith, John".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            days_remaining: 19,
        }];

        let mut writer = csv::Writer::from_writer(Vec::new());
        write_expiration_report(&mut writer, &alerts).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(&record[2], "Smith, John");
        assert_eq!(&record[3], "2025-06-20");
    }
}
