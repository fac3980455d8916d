//! Run configuration: token resolution, API URL derivation, TLS trust

use std::env;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{ConfigError, Result};

/// Environment variable consulted when no token file is given
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

const PUBLIC_GRAPHQL_URL: &str = "https://api.github.com/graphql";
const PUBLIC_REST_URL: &str = "https://api.github.com";

/// Immutable per-run configuration, built once before any network call and
/// passed by reference into the client. Never stored in process-wide state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// GraphQL endpoint derived from the server URL
    pub graphql_url: String,

    /// REST API root derived from the server URL
    pub rest_url: String,

    /// Personal access token with admin:enterprise and admin:org scope
    pub token: String,

    /// Optional custom CA certificate/bundle (PEM) for TLS validation
    pub ca_bundle: Option<PathBuf>,
}

impl RunConfig {
    /// Build and validate the configuration from CLI inputs.
    ///
    /// Every configuration error is raised here, before the HTTP client is
    /// constructed and before any request is sent.
    pub fn from_args(
        github_url: Option<&str>,
        token_file: Option<&Path>,
        ca_bundle: Option<&Path>,
    ) -> Result<Self> {
        let token = resolve_token(token_file)?.ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            graphql_url: graphql_api_url_from_server_url(github_url)?,
            rest_url: rest_api_url_from_server_url(github_url)?,
            token,
            ca_bundle: validate_ca_bundle(ca_bundle)?,
        })
    }
}

/// Read a PAT from a file, falling back to the GITHUB_TOKEN env var.
///
/// Returns `Ok(None)` when neither source yields a token, so callers decide
/// how to report the absence. A token file that does not exist falls through
/// to the environment; any other read failure is an error.
pub fn resolve_token(token_file: Option<&Path>) -> Result<Option<String>> {
    if let Some(path) = token_file {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if !token.is_empty() {
                    return Ok(Some(token.to_string()));
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(ConfigError::FileRead {
                    path: path.display().to_string(),
                    source: err,
                }
                .into());
            }
        }
    }

    match env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Ok(None),
    }
}

/// Derive the GraphQL API endpoint from a server URL.
///
/// Special cases: the public SaaS host maps to api.github.com, and hosts
/// under the reserved .ghe.com suffix get an api. prefix. Everything else
/// (GHES) serves GraphQL under /api/graphql on the same host.
pub fn graphql_api_url_from_server_url(
    server_url: Option<&str>,
) -> std::result::Result<String, ConfigError> {
    let Some(server_url) = server_url else {
        return Ok(PUBLIC_GRAPHQL_URL.to_string());
    };

    let (scheme, host) = parse_server_url(server_url)?;

    if host == "github.com" {
        return Ok(PUBLIC_GRAPHQL_URL.to_string());
    }

    if host.ends_with(".ghe.com") {
        return Ok(format!("{}://api.{}/graphql", scheme, host));
    }

    Ok(format!("{}/api/graphql", server_url.trim_end_matches('/')))
}

/// Derive the REST API root from a server URL.
///
/// Same special cases as the GraphQL derivation; GHES hosts serve the REST
/// API under /api/v3.
pub fn rest_api_url_from_server_url(
    server_url: Option<&str>,
) -> std::result::Result<String, ConfigError> {
    let Some(server_url) = server_url else {
        return Ok(PUBLIC_REST_URL.to_string());
    };

    let (scheme, host) = parse_server_url(server_url)?;

    if host == "github.com" {
        return Ok(PUBLIC_REST_URL.to_string());
    }

    if host.ends_with(".ghe.com") {
        return Ok(format!("{}://api.{}", scheme, host));
    }

    Ok(format!("{}/api/v3", server_url.trim_end_matches('/')))
}

fn parse_server_url(server_url: &str) -> std::result::Result<(String, String), ConfigError> {
    let url = Url::parse(server_url).map_err(|err| ConfigError::InvalidServerUrl {
        url: server_url.to_string(),
        reason: err.to_string(),
    })?;

    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidServerUrl {
            url: server_url.to_string(),
            reason: "no host".to_string(),
        })?;

    Ok((url.scheme().to_string(), host.to_string()))
}

/// Validate an optional custom CA bundle path.
///
/// The file must exist on disk; the PEM contents are parsed later when the
/// HTTP client is built.
pub fn validate_ca_bundle(
    ca_bundle: Option<&Path>,
) -> std::result::Result<Option<PathBuf>, ConfigError> {
    match ca_bundle {
        None => Ok(None),
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::CaBundleNotFound(path.display().to_string())),
    }
}

/// Read a file and return its non-empty trimmed lines.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|err| ConfigError::FileRead {
        path: path.display().to_string(),
        source: err,
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
