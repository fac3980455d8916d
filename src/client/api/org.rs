//! Organization administration trait for REST operations

use async_trait::async_trait;

use crate::client::models::{Member, OrgRole, Team};
use crate::client::pagination::{Page, PageToken};
use crate::error::Result;

/// Organization, team, and membership operations against the REST API.
///
/// All listings use page-number pagination; every write is idempotent
/// (add-if-absent, remove-if-present, set-role).
#[async_trait]
pub trait OrgAdminApi: Send + Sync {
    // ========================================================================
    // Teams
    // ========================================================================

    /// One page of the organization's teams.
    async fn teams_page(&self, org: &str, token: Option<PageToken>) -> Result<Page<Team>>;

    /// Create a closed team in the organization.
    async fn create_team(&self, org: &str, name: &str) -> Result<Team>;

    // ========================================================================
    // Security-manager role assignment
    // ========================================================================

    /// Grant the legacy security-manager capability to a team.
    async fn set_legacy_security_manager(&self, org: &str, team_slug: &str) -> Result<()>;

    /// List the organization's custom roles.
    async fn org_roles(&self, org: &str) -> Result<Vec<OrgRole>>;

    /// One page of teams currently holding a custom role.
    async fn role_teams_page(
        &self,
        org: &str,
        role_id: u64,
        token: Option<PageToken>,
    ) -> Result<Page<Team>>;

    /// Assign a custom role to a team.
    async fn assign_team_role(&self, org: &str, team_slug: &str, role_id: u64) -> Result<()>;

    // ========================================================================
    // Membership
    // ========================================================================

    /// One page of the organization's members.
    async fn org_members_page(&self, org: &str, token: Option<PageToken>) -> Result<Page<Member>>;

    /// Add (or invite) a user to the organization.
    async fn add_org_member(&self, org: &str, username: &str) -> Result<()>;

    /// One page of a team's members.
    async fn team_members_page(
        &self,
        org: &str,
        team_slug: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Member>>;

    /// Add a user to a team.
    async fn add_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()>;

    /// Remove a user from a team.
    async fn remove_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()>;
}
