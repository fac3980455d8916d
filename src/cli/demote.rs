//! Demote the calling enterprise admin from previously unmanaged
//! organizations, undoing temporary ownership grants from `promote`

use std::path::Path;

use colored::Colorize;
use log::{error, info};

use crate::client::api::{EnterpriseApi, OrganizationRole};
use crate::error::{Error, Result};
use crate::output;

/// Run the demote operation.
///
/// Reads the newline-delimited organization ID file written by `promote`
/// and sets the caller's role to UNAFFILIATED on each. Per-organization
/// failures are logged and the loop continues.
pub async fn run<C: EnterpriseApi>(
    client: &C,
    enterprise_slug: &str,
    unmanaged_path: &Path,
) -> Result<()> {
    let org_ids = output::read_org_ids(unmanaged_path)?;

    let enterprise_id = client.enterprise_id(enterprise_slug).await?;
    info!("Total count of orgs to demote admin from: {}", org_ids.len());

    let mut failed = 0usize;
    for (i, org_id) in org_ids.iter().enumerate() {
        info!(
            "Removing from organization: {org_id} [{}/{}]",
            i + 1,
            org_ids.len()
        );
        if let Err(err) = client
            .set_org_role(&enterprise_id, org_id, OrganizationRole::Unaffiliated)
            .await
        {
            error!("Failed to demote from {org_id}: {err}");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(Error::PartialFailure {
            failed,
            orgs: org_ids.len(),
        });
    }

    println!(
        "{} Removed from {} organization(s)",
        "✓".green(),
        org_ids.len()
    );
    Ok(())
}
