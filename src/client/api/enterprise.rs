//! Enterprise API trait for GraphQL queries and role mutations

use async_trait::async_trait;

use crate::client::models::Organization;
use crate::client::pagination::{Page, PageToken};
use crate::error::Result;

/// Target state for the caller's relationship to an organization.
///
/// The mutation is an unconditional "set role to X": safe to repeat and safe
/// to call on an organization already in the target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizationRole {
    Owner,
    Unaffiliated,
}

impl OrganizationRole {
    /// GraphQL enum value for the mutation variable
    pub fn as_graphql(self) -> &'static str {
        match self {
            OrganizationRole::Owner => "OWNER",
            OrganizationRole::Unaffiliated => "UNAFFILIATED",
        }
    }
}

/// Enterprise-scoped operations against the GraphQL endpoint
#[async_trait]
pub trait EnterpriseApi: Send + Sync {
    /// Total number of organizations in the enterprise, reported
    /// independently of the paginated listing.
    async fn org_total_count(&self, enterprise_slug: &str) -> Result<usize>;

    /// One page of the enterprise's organizations (cursor pagination).
    async fn org_page(
        &self,
        enterprise_slug: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Organization>>;

    /// Resolve the enterprise node ID from its slug.
    async fn enterprise_id(&self, enterprise_slug: &str) -> Result<String>;

    /// Set the caller's role on an organization within the enterprise.
    async fn set_org_role(
        &self,
        enterprise_id: &str,
        org_id: &str,
        role: OrganizationRole,
    ) -> Result<()>;
}
