//! Typed records for API resources
//!
//! Required fields are non-optional on purpose: a response missing one of
//! them fails deserialization at the boundary and surfaces as an invalid
//! response error instead of a panic deeper in the run.

mod org;
mod role;
mod team;
mod user;

pub use org::{Organization, RepositorySummary};
pub use role::OrgRole;
pub use team::{CreateTeamRequest, Team};
pub use user::Member;
