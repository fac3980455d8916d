//! Member resources from the REST API

use serde::{Deserialize, Serialize};

/// Organization or team member, identified by login handle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub login: String,
}
