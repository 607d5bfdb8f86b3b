//! Application error types.
//!
//! Defines `AppError` for every failure the update job can hit. All variants
//! are fatal to the run; non-200 responses are not errors at all (the fetcher
//! reports them as "no data" and the runner retries).
//!
//! Error kinds:
//! - `Http` → transport, TLS or timeout failure talking to the API
//! - `MissingField` → upstream payload no longer matches the expected schema
//! - `RetriesExhausted` → repositories still without data after the last round
//! - `Io`, `Json` → local file read/write or (de)serialization failure
//! - `Config` → invalid command-line or environment configuration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream schema changed: entry from '{repo}' is missing '{field}'")]
    MissingField { repo: String, field: &'static str },

    #[error("No statistics after {rounds} round(s) for: {}", .missing.join(", "))]
    RetriesExhausted { rounds: u32, missing: Vec<String> },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn missing_field(repo: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            repo: repo.into(),
            field,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_repo_and_field() {
        let err = AppError::missing_field("server", "avatar_url");
        assert_eq!(
            err.to_string(),
            "Upstream schema changed: entry from 'server' is missing 'avatar_url'"
        );
    }

    #[test]
    fn test_retries_exhausted_lists_missing_repos() {
        let err = AppError::RetriesExhausted {
            rounds: 3,
            missing: vec!["web".to_string(), "docs".to_string()],
        };
        assert_eq!(err.to_string(), "No statistics after 3 round(s) for: web, docs");
    }
}
