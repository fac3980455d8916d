//! Converge a security-manager team in each organization
//!
//! Meant to run after `promote`: for every organization in the CSV
//! snapshot, ensure the team exists, holds the security-manager role, and
//! has exactly the desired member set.

use std::collections::HashSet;
use std::path::Path;

use colored::Colorize;
use log::{debug, error, info};

use crate::client::api::OrgAdminApi;
use crate::client::models::Team;
use crate::client::pagination::collect_all;
use crate::config;
use crate::error::{ConfigError, Error, Result};
use crate::output;
use crate::reconcile;

/// Custom role name GitHub assigns to the security-manager capability
const SECURITY_MANAGER_ROLE: &str = "security_manager";

/// Run the sec-team operation across every organization in the snapshot.
///
/// An organization-level failure (role missing, team creation rejected) is
/// logged and counted, and the loop moves to the next organization; member
/// level failures are counted the same way without aborting the
/// organization. Any failure makes the whole run exit non-zero.
pub async fn run<C: OrgAdminApi>(
    client: &C,
    org_list: &Path,
    team_name: &str,
    members: Option<Vec<String>>,
    members_file: Option<&Path>,
    legacy: bool,
) -> Result<()> {
    let desired = resolve_members(members, members_file)?;
    let orgs = output::csv::read_org_logins(org_list)?;

    let mut failed = 0usize;
    for org in &orgs {
        match converge_org(client, org, team_name, &desired, legacy).await {
            Ok(0) => debug!("✓ {org} converged"),
            Ok(n) => failed += n,
            Err(err) => {
                error!("⨯ {org}: {err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::PartialFailure {
            failed,
            orgs: orgs.len(),
        });
    }

    println!(
        "{} Security manager team {} converged in {} organization(s)",
        "✓".green(),
        team_name,
        orgs.len()
    );
    Ok(())
}

/// Resolve the desired member list from the two mutually exclusive sources.
fn resolve_members(
    members: Option<Vec<String>>,
    members_file: Option<&Path>,
) -> Result<Vec<String>> {
    let resolved = match (members, members_file) {
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingMemberSources.into()),
        (Some(list), None) => list,
        (None, Some(path)) => config::read_lines(path)?,
        (None, None) => Vec::new(),
    };

    if resolved.is_empty() {
        return Err(ConfigError::MissingMembers.into());
    }
    Ok(resolved)
}

/// Converge one organization; returns the number of member-level failures.
async fn converge_org<C: OrgAdminApi>(
    client: &C,
    org: &str,
    team_name: &str,
    desired: &[String],
    legacy: bool,
) -> Result<usize> {
    let team = ensure_team(client, org, team_name).await?;
    ensure_security_manager_role(client, org, &team, legacy).await?;

    let mut failed = ensure_org_membership(client, org, desired).await?;

    let team_members = collect_all(|token| client.team_members_page(org, &team.slug, token)).await?;
    let observed: Vec<String> = team_members.into_iter().map(|m| m.login).collect();

    let diff = reconcile::diff(desired, &observed);
    if diff.is_converged() {
        debug!("✓ Team {} membership already matches in {org}", team.slug);
        return Ok(failed);
    }

    // Removals first: when one handle replaces another this avoids a window
    // where both hold the capability
    for handle in &diff.to_remove {
        info!("Removing {handle} from team {} in {org}", team.slug);
        if let Err(err) = client.remove_team_member(org, &team.slug, handle).await {
            error!("⨯ Failed to remove {handle} from {}: {err}", team.slug);
            failed += 1;
        }
    }

    for handle in &diff.to_add {
        info!("Adding {handle} to team {} in {org}", team.slug);
        if let Err(err) = client.add_team_member(org, &team.slug, handle).await {
            error!("⨯ Failed to add {handle} to {}: {err}", team.slug);
            failed += 1;
        }
    }

    Ok(failed)
}

/// Find the team by name, creating it when absent.
async fn ensure_team<C: OrgAdminApi>(client: &C, org: &str, team_name: &str) -> Result<Team> {
    let teams = collect_all(|token| client.teams_page(org, token)).await?;

    if let Some(team) = teams.into_iter().find(|t| t.name == team_name) {
        debug!("✓ Team {} already exists in {org}", team.slug);
        return Ok(team);
    }

    info!("Creating team {team_name} in {org}");
    client.create_team(org, team_name).await
}

/// Make sure the team holds the security-manager capability.
///
/// The legacy strategy is a single idempotent PUT. The current strategy
/// resolves the role ID by name, checks the role's team list to avoid a
/// redundant write, and assigns only when absent.
async fn ensure_security_manager_role<C: OrgAdminApi>(
    client: &C,
    org: &str,
    team: &Team,
    legacy: bool,
) -> Result<()> {
    if legacy {
        return client.set_legacy_security_manager(org, &team.slug).await;
    }

    let roles = client.org_roles(org).await?;
    let role = roles
        .into_iter()
        .find(|role| role.name == SECURITY_MANAGER_ROLE)
        .ok_or_else(|| {
            crate::error::ApiError::NotFound(format!(
                "organization {org} does not have a {SECURITY_MANAGER_ROLE} role"
            ))
        })?;

    let holders = collect_all(|token| client.role_teams_page(org, role.id, token)).await?;
    if holders.iter().any(|holder| holder.slug == team.slug) {
        debug!("✓ Team {} already has the {SECURITY_MANAGER_ROLE} role in {org}", team.slug);
        return Ok(());
    }

    info!("Assigning the {SECURITY_MANAGER_ROLE} role to {} in {org}", team.slug);
    client.assign_team_role(org, &team.slug, role.id).await
}

/// Invite desired handles that are not yet organization members; returns
/// the number of failed invitations.
async fn ensure_org_membership<C: OrgAdminApi>(
    client: &C,
    org: &str,
    desired: &[String],
) -> Result<usize> {
    let members = collect_all(|token| client.org_members_page(org, token)).await?;
    let present: HashSet<String> = members
        .into_iter()
        .map(|member| member.login.to_lowercase())
        .collect();

    let mut failed = 0usize;
    for handle in desired {
        if present.contains(&handle.to_lowercase()) {
            continue;
        }
        info!("Adding {handle} to {org}");
        if let Err(err) = client.add_org_member(org, handle).await {
            error!("⨯ Failed to add {handle} to {org}: {err}");
            failed += 1;
        }
    }

    Ok(failed)
}
