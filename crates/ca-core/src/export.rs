//! Client list CSV export
//!
//! Write-only. Fields are joined with bare commas and never quoted, so a
//! value holding a comma shifts the columns of its row.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::Result;
use crate::models::Client;

pub const CSV_HEADER: &str = "Name,Email,Phone,Company,Status,Added Date";

/// Render `clients` (already filtered and sorted) as CSV text
pub fn clients_to_csv(clients: &[&Client]) -> String {
    let mut lines = Vec::with_capacity(clients.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(clients.iter().map(|c| csv_row(c)));
    lines.join("\n")
}

fn csv_row(client: &Client) -> String {
    [
        client.name.as_str(),
        client.email.as_str(),
        client.phone.as_str(),
        client.company_name.as_str(),
        client.status.as_str(),
        &client.added_date.format("%Y-%m-%d").to_string(),
    ]
    .join(",")
}

/// `clients_<yyyy-MM-dd>.csv`
pub fn default_export_file_name(today: NaiveDate) -> String {
    format!("clients_{}.csv", today.format("%Y-%m-%d"))
}

/// Write the CSV for `clients` to `path`
pub fn write_clients_csv<P: AsRef<Path>>(path: P, clients: &[&Client]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, clients_to_csv(clients))?;
    info!("Exported {} clients to {}", clients.len(), path.display());
    Ok(())
}
