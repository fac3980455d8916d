//! Scripted in-memory API double for driver tests
//!
//! Listings are served from plain collections, mutations update the same
//! collections, and every mutation (plus the role lookup) is recorded so
//! tests can assert call counts and ordering.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::api::{EnterpriseApi, OrgAdminApi, OrganizationRole};
use super::models::{Member, OrgRole, Organization, Team};
use super::pagination::{Page, PageToken};
use crate::error::{ApiError, Result};

#[derive(Default)]
pub struct MockState {
    pub teams: HashMap<String, Vec<Team>>,
    pub role_teams: HashMap<(String, u64), Vec<Team>>,
    pub org_members: HashMap<String, Vec<Member>>,
    pub team_members: HashMap<(String, String), Vec<Member>>,
}

#[derive(Default)]
pub struct MockGitHub {
    pub enterprise_id: String,
    pub orgs: Vec<Organization>,
    pub org_page_size: usize,
    /// Override for the independently reported total (defaults to orgs.len())
    pub reported_total: Option<usize>,
    pub org_roles: HashMap<String, Vec<OrgRole>>,
    pub state: Mutex<MockState>,
    /// Handles whose membership mutations fail
    pub fail_handles: HashSet<String>,
    /// Org IDs whose role mutation fails
    pub fail_role_orgs: HashSet<String>,
    /// Recorded calls, in order
    pub calls: Mutex<Vec<String>>,
}

pub fn team(name: &str) -> Team {
    Team {
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
    }
}

pub fn member(login: &str) -> Member {
    Member {
        login: login.to_string(),
    }
}

impl MockGitHub {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn recorded(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl EnterpriseApi for MockGitHub {
    async fn org_total_count(&self, _enterprise_slug: &str) -> Result<usize> {
        Ok(self.reported_total.unwrap_or(self.orgs.len()))
    }

    async fn org_page(
        &self,
        _enterprise_slug: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Organization>> {
        let start = match token {
            None => 0,
            Some(PageToken::Cursor(cursor)) => cursor.parse().expect("mock cursor"),
            Some(PageToken::Number(_)) => panic!("page-number token on the cursor endpoint"),
        };

        let size = if self.org_page_size == 0 {
            self.orgs.len().max(1)
        } else {
            self.org_page_size
        };
        let end = (start + size).min(self.orgs.len());

        Ok(Page {
            items: self.orgs[start..end].to_vec(),
            next: (end < self.orgs.len()).then(|| PageToken::Cursor(end.to_string())),
        })
    }

    async fn enterprise_id(&self, _enterprise_slug: &str) -> Result<String> {
        Ok(self.enterprise_id.clone())
    }

    async fn set_org_role(
        &self,
        _enterprise_id: &str,
        org_id: &str,
        role: OrganizationRole,
    ) -> Result<()> {
        self.record(format!("set_org_role:{org_id}:{}", role.as_graphql()));

        if self.fail_role_orgs.contains(org_id) {
            return Err(ApiError::ServerError("injected failure".to_string()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl OrgAdminApi for MockGitHub {
    async fn teams_page(&self, org: &str, _token: Option<PageToken>) -> Result<Page<Team>> {
        let teams = self.state.lock().unwrap().teams.get(org).cloned().unwrap_or_default();
        Ok(Page {
            items: teams,
            next: None,
        })
    }

    async fn create_team(&self, org: &str, name: &str) -> Result<Team> {
        self.record(format!("create_team:{org}:{name}"));

        let created = team(name);
        self.state
            .lock()
            .unwrap()
            .teams
            .entry(org.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn set_legacy_security_manager(&self, org: &str, team_slug: &str) -> Result<()> {
        self.record(format!("legacy_role:{org}:{team_slug}"));
        Ok(())
    }

    async fn org_roles(&self, org: &str) -> Result<Vec<OrgRole>> {
        self.record(format!("org_roles:{org}"));
        Ok(self.org_roles.get(org).cloned().unwrap_or_default())
    }

    async fn role_teams_page(
        &self,
        org: &str,
        role_id: u64,
        _token: Option<PageToken>,
    ) -> Result<Page<Team>> {
        let teams = self
            .state
            .lock()
            .unwrap()
            .role_teams
            .get(&(org.to_string(), role_id))
            .cloned()
            .unwrap_or_default();
        Ok(Page {
            items: teams,
            next: None,
        })
    }

    async fn assign_team_role(&self, org: &str, team_slug: &str, role_id: u64) -> Result<()> {
        self.record(format!("assign_role:{org}:{team_slug}:{role_id}"));

        self.state
            .lock()
            .unwrap()
            .role_teams
            .entry((org.to_string(), role_id))
            .or_default()
            .push(team(team_slug));
        Ok(())
    }

    async fn org_members_page(&self, org: &str, _token: Option<PageToken>) -> Result<Page<Member>> {
        let members = self
            .state
            .lock()
            .unwrap()
            .org_members
            .get(org)
            .cloned()
            .unwrap_or_default();
        Ok(Page {
            items: members,
            next: None,
        })
    }

    async fn add_org_member(&self, org: &str, username: &str) -> Result<()> {
        self.record(format!("add_org_member:{org}:{username}"));

        if self.fail_handles.contains(username) {
            return Err(ApiError::ServerError("injected failure".to_string()).into());
        }

        self.state
            .lock()
            .unwrap()
            .org_members
            .entry(org.to_string())
            .or_default()
            .push(member(username));
        Ok(())
    }

    async fn team_members_page(
        &self,
        org: &str,
        team_slug: &str,
        _token: Option<PageToken>,
    ) -> Result<Page<Member>> {
        let members = self
            .state
            .lock()
            .unwrap()
            .team_members
            .get(&(org.to_string(), team_slug.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(Page {
            items: members,
            next: None,
        })
    }

    async fn add_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()> {
        self.record(format!("add_member:{org}:{team_slug}:{username}"));

        if self.fail_handles.contains(username) {
            return Err(ApiError::ServerError("injected failure".to_string()).into());
        }

        self.state
            .lock()
            .unwrap()
            .team_members
            .entry((org.to_string(), team_slug.to_string()))
            .or_default()
            .push(member(username));
        Ok(())
    }

    async fn remove_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()> {
        self.record(format!("remove_member:{org}:{team_slug}:{username}"));

        if self.fail_handles.contains(username) {
            return Err(ApiError::ServerError("injected failure".to_string()).into());
        }

        self.state
            .lock()
            .unwrap()
            .team_members
            .entry((org.to_string(), team_slug.to_string()))
            .or_default()
            .retain(|m| !m.login.eq_ignore_ascii_case(username));
        Ok(())
    }
}
