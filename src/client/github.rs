//! GitHub API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Certificate, Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::api::{EnterpriseApi, OrgAdminApi, OrganizationRole};
use super::models::{CreateTeamRequest, Member, OrgRole, Organization, Team};
use super::pagination::{PAGE_SIZE, Page, PageInfo, PageToken, link_has_next};
use crate::config::RunConfig;
use crate::error::{ApiError, ConfigError, Result};

/// API version header value required on every request
const API_VERSION: &str = "2022-11-28";

/// Media type GitHub expects in the Accept header
const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

/// Requests per second, kept well under GitHub's secondary rate limits
const REQUESTS_PER_SECOND: u32 = 5;

const ORG_TOTAL_COUNT_QUERY: &str = r"
query countEnterpriseOrganizations($slug: String!) {
  enterprise(slug: $slug) {
    organizations {
      totalCount
    }
  }
}";

const ORG_PAGE_QUERY: &str = r"
query listEnterpriseOrganizations($slug: String!, $after: String) {
  enterprise(slug: $slug) {
    organizations(first: 100, after: $after) {
      nodes {
        id
        createdAt
        login
        email
        viewerCanAdminister
        viewerIsAMember
        repositories {
          totalCount
          totalDiskUsage
        }
      }
      pageInfo {
        endCursor
        hasNextPage
      }
    }
  }
}";

const ENTERPRISE_ID_QUERY: &str = r"
query enterpriseId($slug: String!) {
  enterprise(slug: $slug) {
    id
  }
}";

const SET_ORG_ROLE_MUTATION: &str = r"
mutation updateOrganizationRole($enterpriseId: ID!, $organizationId: ID!, $role: RoleInOrganization!) {
  updateEnterpriseOwnerOrganizationRole(
    input: { enterpriseId: $enterpriseId, organizationId: $organizationId, organizationRole: $role }
  ) {
    clientMutationId
  }
}";

/// GitHub API client over one HTTP connection pool.
///
/// Headers are built once from the immutable run configuration; requests are
/// gated by an in-process rate limiter and issued one at a time by callers.
#[derive(Debug)]
pub struct GitHubClient {
    http: HttpClient,
    graphql_url: String,
    rest_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GitHubClient {
    /// Create a new client from a validated run configuration.
    pub fn new(config: &RunConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("token {}", config.token))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let mut builder = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers);

        if let Some(path) = &config.ca_bundle {
            let pem = std::fs::read(path)?;
            let certs = Certificate::from_pem_bundle(&pem).map_err(|err| {
                ConfigError::CaBundleInvalid {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                }
            })?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        let http = builder.build().map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            http,
            graphql_url: config.graphql_url.clone(),
            rest_url: config.rest_url.clone(),
            rate_limiter,
        })
    }

    /// Execute a GraphQL document with bind variables.
    ///
    /// Identifiers and slugs travel as variables, never interpolated into
    /// the query text.
    async fn graphql<T: DeserializeOwned>(&self, query: &'static str, variables: Value) -> Result<T> {
        #[derive(Deserialize)]
        struct Envelope<T> {
            data: Option<T>,
            #[serde(default)]
            errors: Vec<GraphQlError>,
        }

        #[derive(Deserialize)]
        struct GraphQlError {
            message: String,
        }

        self.rate_limiter.until_ready().await;

        let response = self
            .http
            .post(&self.graphql_url)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = check_status(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ApiError::InvalidResponse(messages.join("; ")).into());
        }

        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("response carried no data".to_string()).into())
    }

    /// Fetch one page of a REST collection via page-number pagination.
    ///
    /// Continuation is signalled by a `rel="next"` relation in the Link
    /// response header.
    async fn rest_page<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<PageToken>,
    ) -> Result<Page<T>> {
        let page = rest_page_number(token)?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}{}?per_page={}&page={}", self.rest_url, path, PAGE_SIZE, page);
        let response = self.http.get(&url).send().await.map_err(ApiError::from)?;
        let response = check_status(response).await?;

        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .is_some_and(link_has_next)
            .then(|| PageToken::Number(page + 1));

        let items = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Ok(Page { items, next })
    }

    async fn rest_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.rest_url, path);
        let response = self.http.get(&url).send().await.map_err(ApiError::from)?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")).into())
    }

    async fn rest_post<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.rest_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ApiError::from)?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {e}")).into())
    }

    async fn rest_put(&self, path: &str) -> Result<()> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.rest_url, path);
        let response = self.http.put(&url).send().await.map_err(ApiError::from)?;
        check_status(response).await?;
        Ok(())
    }

    async fn rest_delete(&self, path: &str) -> Result<()> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.rest_url, path);
        let response = self.http.delete(&url).send().await.map_err(ApiError::from)?;
        check_status(response).await?;
        Ok(())
    }
}

/// Extract the REST page number from a continuation token.
fn rest_page_number(token: Option<PageToken>) -> Result<u32> {
    match token {
        None => Ok(1),
        Some(PageToken::Number(n)) => Ok(n),
        Some(PageToken::Cursor(_)) => Err(ApiError::InvalidResponse(
            "cursor token supplied to a page-numbered endpoint".to_string(),
        )
        .into()),
    }
}

/// Extract the GraphQL cursor from a continuation token.
fn graphql_cursor(token: Option<PageToken>) -> Result<Value> {
    match token {
        None => Ok(Value::Null),
        Some(PageToken::Cursor(cursor)) => Ok(Value::String(cursor)),
        Some(PageToken::Number(_)) => Err(ApiError::InvalidResponse(
            "page-number token supplied to a cursor endpoint".to_string(),
        )
        .into()),
    }
}

/// Map a non-success status to the matching error, or pass the response on.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let err = match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Resource not found".to_string());
            ApiError::NotFound(body)
        }
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Bad request".to_string());
            ApiError::BadRequest(body)
        }
        status if status.is_server_error() => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| format!("Server error: {status}"));
            ApiError::ServerError(body)
        }
        status => ApiError::InvalidResponse(format!("Unexpected status code: {status}")),
    };

    Err(err.into())
}

#[async_trait]
impl EnterpriseApi for GitHubClient {
    async fn org_total_count(&self, enterprise_slug: &str) -> Result<usize> {
        #[derive(Deserialize)]
        struct Data {
            enterprise: Option<Enterprise>,
        }

        #[derive(Deserialize)]
        struct Enterprise {
            organizations: Organizations,
        }

        #[derive(Deserialize)]
        struct Organizations {
            #[serde(rename = "totalCount")]
            total_count: usize,
        }

        let data: Data = self
            .graphql(ORG_TOTAL_COUNT_QUERY, json!({ "slug": enterprise_slug }))
            .await?;

        let enterprise = data
            .enterprise
            .ok_or_else(|| ApiError::NotFound(format!("enterprise {enterprise_slug}")))?;

        Ok(enterprise.organizations.total_count)
    }

    async fn org_page(
        &self,
        enterprise_slug: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Organization>> {
        #[derive(Deserialize)]
        struct Data {
            enterprise: Option<Enterprise>,
        }

        #[derive(Deserialize)]
        struct Enterprise {
            organizations: OrgConnection,
        }

        #[derive(Deserialize)]
        struct OrgConnection {
            nodes: Vec<Organization>,
            #[serde(rename = "pageInfo")]
            page_info: PageInfo,
        }

        let after = graphql_cursor(token)?;
        let data: Data = self
            .graphql(ORG_PAGE_QUERY, json!({ "slug": enterprise_slug, "after": after }))
            .await?;

        let connection = data
            .enterprise
            .ok_or_else(|| ApiError::NotFound(format!("enterprise {enterprise_slug}")))?
            .organizations;

        Ok(Page {
            items: connection.nodes,
            next: connection.page_info.next_token(),
        })
    }

    async fn enterprise_id(&self, enterprise_slug: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Data {
            enterprise: Option<Enterprise>,
        }

        #[derive(Deserialize)]
        struct Enterprise {
            id: String,
        }

        let data: Data = self
            .graphql(ENTERPRISE_ID_QUERY, json!({ "slug": enterprise_slug }))
            .await?;

        data.enterprise
            .map(|e| e.id)
            .ok_or_else(|| ApiError::NotFound(format!("enterprise {enterprise_slug}")).into())
    }

    async fn set_org_role(
        &self,
        enterprise_id: &str,
        org_id: &str,
        role: OrganizationRole,
    ) -> Result<()> {
        let _: Value = self
            .graphql(
                SET_ORG_ROLE_MUTATION,
                json!({
                    "enterpriseId": enterprise_id,
                    "organizationId": org_id,
                    "role": role.as_graphql(),
                }),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl OrgAdminApi for GitHubClient {
    async fn teams_page(&self, org: &str, token: Option<PageToken>) -> Result<Page<Team>> {
        self.rest_page(&format!("/orgs/{org}/teams"), token).await
    }

    async fn create_team(&self, org: &str, name: &str) -> Result<Team> {
        self.rest_post(&format!("/orgs/{org}/teams"), &CreateTeamRequest::closed(name))
            .await
    }

    async fn set_legacy_security_manager(&self, org: &str, team_slug: &str) -> Result<()> {
        self.rest_put(&format!("/orgs/{org}/security-managers/teams/{team_slug}"))
            .await
    }

    async fn org_roles(&self, org: &str) -> Result<Vec<OrgRole>> {
        #[derive(Deserialize)]
        struct RoleList {
            roles: Vec<OrgRole>,
        }

        let list: RoleList = self.rest_get(&format!("/orgs/{org}/organization-roles")).await?;
        Ok(list.roles)
    }

    async fn role_teams_page(
        &self,
        org: &str,
        role_id: u64,
        token: Option<PageToken>,
    ) -> Result<Page<Team>> {
        self.rest_page(&format!("/orgs/{org}/organization-roles/{role_id}/teams"), token)
            .await
    }

    async fn assign_team_role(&self, org: &str, team_slug: &str, role_id: u64) -> Result<()> {
        self.rest_put(&format!("/orgs/{org}/organization-roles/teams/{team_slug}/{role_id}"))
            .await
    }

    async fn org_members_page(&self, org: &str, token: Option<PageToken>) -> Result<Page<Member>> {
        self.rest_page(&format!("/orgs/{org}/members"), token).await
    }

    async fn add_org_member(&self, org: &str, username: &str) -> Result<()> {
        self.rest_put(&format!("/orgs/{org}/memberships/{username}")).await
    }

    async fn team_members_page(
        &self,
        org: &str,
        team_slug: &str,
        token: Option<PageToken>,
    ) -> Result<Page<Member>> {
        self.rest_page(&format!("/orgs/{org}/teams/{team_slug}/members"), token)
            .await
    }

    async fn add_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()> {
        self.rest_put(&format!("/orgs/{org}/teams/{team_slug}/memberships/{username}"))
            .await
    }

    async fn remove_team_member(&self, org: &str, team_slug: &str, username: &str) -> Result<()> {
        self.rest_delete(&format!("/orgs/{org}/teams/{team_slug}/memberships/{username}"))
            .await
    }
}
