//! GitHub contributor statistics client.
//!
//! GitHub computes contributor statistics lazily: the first request after a
//! quiet period answers `202 Accepted` with an empty body while the numbers
//! are being generated. Anything other than `200 OK` is therefore reported
//! as "no data yet" and left for the runner to retry. Transport failures
//! (DNS, TLS, timeout) are returned as errors and are not retried.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Certificate, Client, StatusCode};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::ContributorStats;

/// Source of per-repository contributor statistics.
pub trait StatsSource {
    /// Fetch statistics for one repository.
    ///
    /// Returns `Ok(None)` when the upstream has no data to give right now.
    async fn fetch(&self, repo: &str) -> Result<Option<Vec<ContributorStats>>>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    owner: String,
    client: Client,
}

impl GitHubClient {
    /// Build a client from the run configuration.
    ///
    /// Reads the extra root certificate, if any, and applies the request
    /// timeout and authentication token to every request.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| AppError::Config("GITHUB_TOKEN contains invalid characters".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.request_timeout);

        if let Some(path) = &config.ca_bundle {
            tracing::debug!("Trusting extra CA bundle: {}", path.display());
            let pem = std::fs::read(path)?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        }

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stats_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/{}/stats/contributors", self.base_url, self.owner, repo)
    }
}

impl StatsSource for GitHubClient {
    async fn fetch(&self, repo: &str) -> Result<Option<Vec<ContributorStats>>> {
        let url = self.stats_url(repo);
        tracing::debug!("GET {}", url);

        let start = std::time::Instant::now();
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            tracing::info!("{}: status {} after {:?}, no data yet", repo, status, start.elapsed());
            return Ok(None);
        }

        let stats: Vec<ContributorStats> = response.json().await?;
        tracing::debug!("{}: {} entries in {:?}", repo, stats.len(), start.elapsed());
        Ok(Some(stats))
    }
}
