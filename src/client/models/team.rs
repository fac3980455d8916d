//! Team resources from the REST API

use serde::{Deserialize, Serialize};

/// Team record, unique by slug within an organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub slug: String,
}

/// Request body for team creation.
///
/// Teams are created "closed" so members are visible to the rest of the
/// organization, making it clear who holds the security-manager capability.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub description: String,
    pub privacy: String,
}

impl CreateTeamRequest {
    pub fn closed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: "Enterprise security manager team".to_string(),
            privacy: "closed".to_string(),
        }
    }
}
