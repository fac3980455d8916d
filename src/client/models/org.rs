//! Organization resources from the enterprise GraphQL listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One organization node as returned by the enterprise listing query.
///
/// Read-only snapshot: fetched per invocation, never mutated locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// Opaque node ID, stable across calls
    pub id: String,

    /// Creation timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Login name (human-readable, mutable on the remote side)
    pub login: String,

    /// Contact email, not set on every organization
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the caller can administer this organization
    #[serde(rename = "viewerCanAdminister")]
    pub viewer_can_administer: bool,

    /// Whether the caller is a member of this organization
    #[serde(rename = "viewerIsAMember")]
    pub viewer_is_a_member: bool,

    /// Repository aggregate summary
    pub repositories: RepositorySummary,
}

/// Aggregate repository counts for an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    #[serde(rename = "totalCount")]
    pub total_count: u64,

    /// Disk usage in kilobytes; null for organizations without repositories
    #[serde(rename = "totalDiskUsage", default)]
    pub total_disk_usage: Option<u64>,
}
