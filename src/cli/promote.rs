//! Promote the calling enterprise admin to owner on unmanaged organizations
//!
//! Replaces the legacy `ghe-org-admin-promote` tool; works across GHES,
//! GHEC, data residency, and EMU through the GraphQL API.

use std::path::Path;

use colored::Colorize;
use log::{error, info, warn};

use crate::client::api::{EnterpriseApi, OrganizationRole};
use crate::client::models::Organization;
use crate::client::pagination::collect_all_counted;
use crate::error::{Error, Result};
use crate::output;

/// Run the promote operation.
///
/// Enumerates every organization in the enterprise (verified against the
/// reported total), promotes the caller to owner on each organization they
/// cannot administer, then writes the unmanaged-ID file and the full CSV
/// snapshot. Individual promotion failures are logged and the loop
/// continues; the run still fails at the end if any occurred.
pub async fn run<C: EnterpriseApi>(
    client: &C,
    enterprise_slug: &str,
    unmanaged_out: &Path,
    orgs_csv: &Path,
) -> Result<()> {
    let total = client.org_total_count(enterprise_slug).await?;
    if total == 0 {
        warn!("No organizations found in enterprise {enterprise_slug}");
        output::write_org_ids(unmanaged_out, &[])?;
        output::csv::write_orgs(orgs_csv, &[])?;
        return Ok(());
    }

    let orgs =
        collect_all_counted(total, |token| client.org_page(enterprise_slug, token)).await?;
    info!("Enterprise {enterprise_slug} has {} organizations", orgs.len());

    let enterprise_id = client.enterprise_id(enterprise_slug).await?;

    let unmanaged: Vec<&Organization> = orgs
        .iter()
        .filter(|org| !org.viewer_can_administer)
        .collect();
    info!(
        "Total count of unmanaged organizations to be promoted on: {}",
        unmanaged.len()
    );

    let mut failed = 0usize;
    for (i, org) in unmanaged.iter().enumerate() {
        info!(
            "Promoting to owner on organization: {} [{}/{}]",
            org.login,
            i + 1,
            unmanaged.len()
        );
        if let Err(err) = client
            .set_org_role(&enterprise_id, &org.id, OrganizationRole::Owner)
            .await
        {
            error!("Failed to promote on {}: {err}", org.login);
            failed += 1;
        }
    }

    let unmanaged_ids: Vec<String> = unmanaged.iter().map(|org| org.id.clone()).collect();
    output::write_org_ids(unmanaged_out, &unmanaged_ids)?;
    output::csv::write_orgs(orgs_csv, &orgs)?;

    if failed > 0 {
        return Err(Error::PartialFailure {
            failed,
            orgs: unmanaged_ids.len(),
        });
    }

    println!(
        "{} Newly managed organizations: {} (snapshot: {})",
        "✓".green(),
        unmanaged_ids.len(),
        orgs_csv.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockGitHub;
    use crate::client::models::RepositorySummary;
    use chrono::{TimeZone, Utc};

    fn org(id: &str, login: &str, can_administer: bool) -> Organization {
        Organization {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            login: login.to_string(),
            email: Some(format!("admin@{login}.example")),
            viewer_can_administer: can_administer,
            viewer_is_a_member: can_administer,
            repositories: RepositorySummary {
                total_count: 1,
                total_disk_usage: Some(10),
            },
        }
    }

    fn three_org_mock() -> MockGitHub {
        MockGitHub {
            enterprise_id: "E_1".to_string(),
            orgs: vec![
                org("O_1", "acme", true),
                org("O_2", "globex", false),
                org("O_3", "initech", false),
            ],
            org_page_size: 2,
            ..MockGitHub::default()
        }
    }

    #[tokio::test]
    async fn test_promote_targets_only_unmanaged_orgs() {
        let mock = three_org_mock();
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("unmanaged_orgs.txt");
        let csv = dir.path().join("all_orgs.csv");

        run(&mock, "acme-ent", &txt, &csv).await.unwrap();

        assert_eq!(
            mock.recorded(),
            vec!["set_org_role:O_2:OWNER", "set_org_role:O_3:OWNER"]
        );

        let ids = std::fs::read_to_string(&txt).unwrap();
        assert_eq!(ids, "O_2\nO_3\n");

        // Header plus one row per organization, cursor pagination spanning
        // two pages notwithstanding
        let snapshot = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(snapshot.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_promote_aborts_on_count_mismatch() {
        let mut mock = three_org_mock();
        mock.reported_total = Some(5);

        let dir = tempfile::tempdir().unwrap();
        let err = run(
            &mock,
            "acme-ent",
            &dir.path().join("u.txt"),
            &dir.path().join("o.csv"),
        )
        .await
        .unwrap_err();

        match err {
            Error::Api(crate::error::ApiError::CountMismatch { expected, actual }) => {
                assert_eq!(expected, 5);
                assert_eq!(actual, 3);
            }
            other => panic!("expected CountMismatch, got {other:?}"),
        }

        // No mutation may run against data that cannot be trusted
        assert!(mock.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_promote_continues_past_per_org_failures() {
        let mut mock = three_org_mock();
        mock.fail_role_orgs.insert("O_2".to_string());

        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("unmanaged_orgs.txt");
        let csv = dir.path().join("all_orgs.csv");

        let err = run(&mock, "acme-ent", &txt, &csv).await.unwrap_err();
        match err {
            Error::PartialFailure { failed, orgs } => {
                assert_eq!(failed, 1);
                assert_eq!(orgs, 2);
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }

        // Both promotions were attempted and both IDs still land in the
        // hand-off file so demote can undo whatever succeeded
        assert_eq!(mock.recorded().len(), 2);
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "O_2\nO_3\n");
        assert!(csv.is_file());
    }

    #[tokio::test]
    async fn test_promote_empty_enterprise_writes_empty_reports() {
        let mock = MockGitHub {
            enterprise_id: "E_1".to_string(),
            ..MockGitHub::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("unmanaged_orgs.txt");
        let csv = dir.path().join("all_orgs.csv");

        run(&mock, "acme-ent", &txt, &csv).await.unwrap();

        assert!(mock.recorded().is_empty());
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "");
        assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 1);
    }
}
