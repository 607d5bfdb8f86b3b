//! Run configuration
//!
//! Everything the update job needs to know: which repositories to query,
//! where the input and output files live, and how patient to be with the API.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Repository whose totals double-count commits from before the split.
pub const SPLIT_REPOSITORY: &str = "server";

pub const DEFAULT_REPOSITORIES: &[&str] = &["server", "web", "desktop", "docs"];

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable naming a PEM file with an extra trusted root.
pub const CA_BUNDLE_ENV: &str = "CONTRIBUTORS_CA_BUNDLE";

#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub organization or user owning the repositories
    pub owner: String,

    /// Repositories to query, in processing order
    pub repositories: Vec<String>,

    /// Base URL of the GitHub REST API
    pub api_url: String,

    /// Bearer token; unauthenticated requests get a much lower rate limit
    pub token: Option<String>,

    /// Extra root certificate (PEM) to trust
    pub ca_bundle: Option<PathBuf>,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Number of fetch rounds before giving up
    pub max_retries: u32,

    /// Pause between rounds, giving GitHub time to compute statistics
    pub retry_delay: Duration,

    /// Continue with partial data when some repositories never answered
    pub not_required: bool,

    pub output_path: PathBuf,
    pub fixture_path: PathBuf,
    pub duplicates_path: PathBuf,
}

impl Config {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repositories: DEFAULT_REPOSITORIES.iter().map(|r| r.to_string()).collect(),
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            ca_bundle: None,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            not_required: false,
            output_path: PathBuf::from("site/data/contributors.json"),
            fixture_path: PathBuf::from("fixtures/contributors.json"),
            duplicates_path: PathBuf::from("data/duplicate_commits.json"),
        }
    }

    /// Validates settings needed for a live (non-fixture) run
    pub fn validate(&self) -> Result<()> {
        if self.owner.is_empty() {
            return Err(AppError::Config(
                "repository owner is required (--owner or CONTRIBUTORS_OWNER)".to_string(),
            ));
        }

        if self.repositories.is_empty() {
            return Err(AppError::Config("at least one repository is required".to_string()));
        }

        if self.repositories.iter().any(|r| r.is_empty() || r == "avatar" || r == "name") {
            return Err(AppError::Config(format!(
                "invalid repository name in {:?}",
                self.repositories
            )));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(AppError::Config(
                "api_url must start with http:// or https://".to_string(),
            ));
        }

        if self.max_retries == 0 {
            return Err(AppError::Config("max_retries must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("")
    }
}
