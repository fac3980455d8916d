//! Error types for the ghe-admin CLI

use thiserror::Error;

/// Result type alias for ghe-admin operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Per-item reconciliation failures. The surrounding loop kept going,
    /// but the process must still exit non-zero so the operator knows
    /// convergence was incomplete.
    #[error("{failed} operation(s) failed across {orgs} organization(s)")]
    PartialFailure { failed: usize, orgs: usize },
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "Authentication failed. Check that the token has admin:enterprise and admin:org scope."
    )]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded; re-run once the limit resets")]
    RateLimit,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// The collected item count diverged from the independently reported
    /// total. Callers must not reconcile against data they cannot trust.
    #[error("collected {actual} item(s) but the API reported a total of {expected}")]
    CountMismatch { expected: usize, actual: usize },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors, all detected before any network call
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GitHub Personal Access Token not found. Pass --token-file or set GITHUB_TOKEN.")]
    MissingToken,

    #[error("Token contains characters that cannot be sent in a request header")]
    InvalidToken,

    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("CA bundle not found: {0}")]
    CaBundleNotFound(String),

    #[error("Invalid CA bundle {path}: {reason}")]
    CaBundleInvalid { path: String, reason: String },

    #[error("Use either --members or --members-file, not both")]
    ConflictingMemberSources,

    #[error("No team members provided. Pass --members or --members-file.")]
    MissingMembers,

    #[error("Column {column:?} not found in {path}")]
    MissingColumn { path: String, column: String },

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_unauthorized_message() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("admin:enterprise"));
    }

    #[test]
    fn test_api_error_count_mismatch() {
        let err = ApiError::CountMismatch {
            expected: 5,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_api_error_not_found() {
        let err = ApiError::NotFound("enterprise acme".to_string());
        assert!(err.to_string().contains("acme"));
    }

    #[test]
    fn test_config_error_missing_token() {
        let err = ConfigError::MissingToken;
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_config_error_invalid_server_url() {
        let err = ConfigError::InvalidServerUrl {
            url: "ghes.internal".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("ghes.internal"));
    }

    #[test]
    fn test_config_error_conflicting_member_sources() {
        let err = ConfigError::ConflictingMemberSources;
        assert!(err.to_string().contains("--members-file"));
    }

    #[test]
    fn test_partial_failure_message() {
        let err = Error::PartialFailure { failed: 2, orgs: 7 };
        let msg = err.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('7'));
    }

    #[test]
    fn test_error_from_api_error() {
        let api_err = ApiError::Forbidden;
        let err: Error = api_err.into();

        match err {
            Error::Api(ApiError::Forbidden) => (),
            _ => panic!("Expected Error::Api(ApiError::Forbidden)"),
        }
    }

    #[test]
    fn test_error_from_config_error() {
        let cfg_err = ConfigError::MissingToken;
        let err: Error = cfg_err.into();

        match err {
            Error::Config(ConfigError::MissingToken) => (),
            _ => panic!("Expected Error::Config(ConfigError::MissingToken)"),
        }
    }
}
