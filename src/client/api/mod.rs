//! API trait definitions split by responsibility
//!
//! - [`EnterpriseApi`] - GraphQL enterprise queries and role mutations
//! - [`OrgAdminApi`] - REST organization/team/membership operations
//!
//! [`GitHubClient`](super::GitHubClient) implements both; operation drivers
//! are generic over the traits so tests can script a mock.

mod enterprise;
mod org;

pub use enterprise::{EnterpriseApi, OrganizationRole};
pub use org::OrgAdminApi;
