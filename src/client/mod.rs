//! GitHub API client

pub mod api;
pub mod github;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use github::GitHubClient;
