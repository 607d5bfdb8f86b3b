//! Contributor statistics pipeline: fetch rounds, merge, duplicate
//! correction, and the final write.

pub mod adjust;
pub mod aggregate;
pub mod runner;

pub use adjust::DuplicateCommits;
pub use runner::{FetchOutcome, fetch_all};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::github::StatsSource;
use crate::models::OutputDocument;
use crate::output;

/// What a live run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub document: OutputDocument,
    pub fetched: Vec<String>,
    pub missing: Vec<String>,
    pub adjusted: usize,
}

/// Fetch, merge, correct and write the contributors document.
///
/// Repositories that never produced data are fatal unless
/// `config.not_required` is set, in which case the document is written from
/// whatever was collected.
pub async fn update<S: StatsSource>(config: &Config, source: &S, date: &str) -> Result<RunSummary> {
    let duplicates = DuplicateCommits::load(&config.duplicates_path)?;
    tracing::debug!("Loaded {} duplicate-commit corrections", duplicates.len());

    let FetchOutcome {
        mut contributors,
        fetched,
        missing,
        rounds,
    } = fetch_all(source, &config.repositories, config.max_retries, config.retry_delay).await?;

    if !missing.is_empty() {
        if !config.not_required {
            return Err(AppError::RetriesExhausted { rounds, missing });
        }
        tracing::warn!(
            "Continuing without statistics for: {} (after {} rounds)",
            missing.join(", "),
            rounds
        );
    }

    if contributors.is_empty() {
        tracing::warn!("No contributors collected");
    } else {
        tracing::info!(
            "Collected {} contributors from {} repositories",
            contributors.len(),
            fetched.len()
        );
    }

    let adjusted = duplicates.apply(&mut contributors);
    let document = output::build_document(contributors.finalize(), date);
    output::write_document(&config.output_path, &document)?;

    Ok(RunSummary {
        document,
        fetched,
        missing,
        adjusted,
    })
}
