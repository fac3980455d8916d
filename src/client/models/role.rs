//! Organization custom roles from the REST API

use serde::{Deserialize, Serialize};

/// One custom organization role, resolved by name before team assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgRole {
    pub id: u64,
    pub name: String,
}
