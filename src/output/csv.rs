//! CSV snapshot of enterprise organizations

use std::path::Path;

use chrono::SecondsFormat;

use crate::client::models::Organization;
use crate::error::{ConfigError, Result};

/// Fixed column order; `sec-team` and downstream tooling depend on it.
pub const ORG_CSV_HEADER: [&str; 8] = [
    "id",
    "createdAt",
    "login",
    "email",
    "viewerCanAdminister",
    "viewerIsAMember",
    "repositories.totalCount",
    "repositories.totalDiskUsage",
];

/// Write the organization snapshot, one row per organization.
pub fn write_orgs(path: &Path, orgs: &[Organization]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(ORG_CSV_HEADER)?;

    for org in orgs {
        writer.write_record([
            org.id.clone(),
            org.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            org.login.clone(),
            org.email.clone().unwrap_or_default(),
            org.viewer_can_administer.to_string(),
            org.viewer_is_a_member.to_string(),
            org.repositories.total_count.to_string(),
            org.repositories
                .total_disk_usage
                .map(|usage| usage.to_string())
                .unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Read the organization login column back from a snapshot.
pub fn read_org_logins(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;

    let login_idx = reader
        .headers()?
        .iter()
        .position(|column| column == "login")
        .ok_or_else(|| ConfigError::MissingColumn {
            path: path.display().to_string(),
            column: "login".to_string(),
        })?;

    let mut logins = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(login) = record.get(login_idx) {
            if !login.is_empty() {
                logins.push(login.to_string());
            }
        }
    }

    Ok(logins)
}
