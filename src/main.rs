//! Contributor Stats - builds the contributors page data from GitHub
//!
//! # Usage
//! ```bash
//! contributor-stats --owner acme                 # Fetch, merge and write
//! contributor-stats --owner acme --not-required  # Accept partial data
//! contributor-stats --use-fixture                # Offline: copy the fixture
//! ```

mod config;
mod contributors;
mod error;
mod github;
mod models;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CA_BUNDLE_ENV, Config, DEFAULT_API_URL};
use github::GitHubClient;

/// Collect per-repository commit totals into the contributors page document
#[derive(Parser)]
#[command(name = "contributor-stats")]
#[command(about = "Builds the contributors JSON document from GitHub statistics", long_about = None)]
struct Cli {
    /// Number of fetch rounds before giving up on a repository
    #[arg(long, default_value = "3")]
    max_retries: u32,

    /// Copy the fixture to the output instead of querying GitHub
    #[arg(long)]
    use_fixture: bool,

    /// Write whatever was collected even if some repositories never answered
    #[arg(long)]
    not_required: bool,

    /// Organization or user owning the repositories
    #[arg(long, env = "CONTRIBUTORS_OWNER", default_value = "")]
    owner: String,

    /// Repository to include (repeatable)
    #[arg(long = "repo", value_name = "NAME", default_values = config::DEFAULT_REPOSITORIES)]
    repositories: Vec<String>,

    /// Where to write the contributors document
    #[arg(long, default_value = "site/data/contributors.json")]
    output: PathBuf,

    /// Document copied verbatim by --use-fixture
    #[arg(long, default_value = "fixtures/contributors.json")]
    fixture: PathBuf,

    /// Per-login duplicate commit counts for the split repository
    #[arg(long, default_value = "data/duplicate_commits.json")]
    duplicates: PathBuf,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// GitHub token for authenticated requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Extra root certificate (PEM) to trust
    #[arg(long, env = CA_BUNDLE_ENV)]
    ca_bundle: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Seconds to wait between fetch rounds
    #[arg(long, default_value = "2")]
    retry_delay: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            owner: cli.owner,
            repositories: cli.repositories,
            api_url: cli.api_url,
            token: cli.token.filter(|t| !t.is_empty()),
            ca_bundle: cli.ca_bundle,
            request_timeout: Duration::from_secs(cli.timeout),
            max_retries: cli.max_retries,
            retry_delay: Duration::from_secs(cli.retry_delay),
            not_required: cli.not_required,
            output_path: cli.output,
            fixture_path: cli.fixture,
            duplicates_path: cli.duplicates,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let use_fixture = cli.use_fixture;
    let config = Config::from(cli);

    if use_fixture {
        if let Err(e) = output::copy_fixture(&config.fixture_path, &config.output_path) {
            eprintln!("✗ Failed to copy fixture: {}", e);
            eprintln!("  Fixture: {}", config.fixture_path.display());
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run(&config).await {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

async fn run(config: &Config) -> error::Result<()> {
    config.validate()?;

    let client = GitHubClient::new(config)?;
    tracing::info!(
        "Fetching contributor statistics for {} repositories from {}",
        config.repositories.len(),
        client.base_url()
    );

    let summary = contributors::update(config, &client, &output::today()).await?;

    tracing::info!(
        "Done: {} contributors, {} repositories fetched, {} missing, {} corrected",
        summary.document.contrib.len(),
        summary.fetched.len(),
        summary.missing.len(),
        summary.adjusted
    );
    Ok(())
}
