//! Fetch rounds with retry.
//!
//! GitHub answers the statistics endpoint with `202 Accepted` until it has
//! finished computing the numbers, so a cold repository usually needs a
//! second request. Each round asks every repository that has not produced
//! data yet, in declaration order, then pauses before the next round.

use std::time::Duration;

use crate::contributors::aggregate::ContributorMap;
use crate::error::Result;
use crate::github::StatsSource;

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub contributors: ContributorMap,
    /// Repositories merged, in the order they produced data
    pub fetched: Vec<String>,
    /// Repositories that never produced data
    pub missing: Vec<String>,
    /// Rounds actually performed
    pub rounds: u32,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Fetch and merge statistics for every repository.
///
/// Stops early once every repository has produced data. Repositories still
/// missing after `max_retries` rounds are reported in the outcome; deciding
/// whether that is fatal is up to the caller. Transport errors and malformed
/// payloads abort immediately.
pub async fn fetch_all<S: StatsSource>(
    source: &S,
    repositories: &[String],
    max_retries: u32,
    retry_delay: Duration,
) -> Result<FetchOutcome> {
    let mut outcome = FetchOutcome {
        contributors: ContributorMap::new(),
        fetched: Vec::new(),
        missing: repositories.to_vec(),
        rounds: 0,
    };

    for round in 1..=max_retries {
        outcome.rounds = round;
        let mut still_missing = Vec::new();

        for repo in std::mem::take(&mut outcome.missing) {
            match source.fetch(&repo).await? {
                Some(stats) => {
                    let merged = outcome.contributors.merge_repository(&repo, &stats)?;
                    tracing::info!("{}: merged {} contributors (round {})", repo, merged, round);
                    outcome.fetched.push(repo);
                }
                None => still_missing.push(repo),
            }
        }

        outcome.missing = still_missing;
        if outcome.is_complete() {
            break;
        }

        if round < max_retries {
            tracing::info!(
                "Waiting {:?} before retrying: {}",
                retry_delay,
                outcome.missing.join(", ")
            );
            tokio::time::sleep(retry_delay).await;
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{ContributorStats, StatsAuthor};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves scripted responses per repository; `None` once the script runs out.
    #[derive(Default)]
    struct ScriptedSource {
        responses: RefCell<HashMap<String, Vec<Option<Vec<ContributorStats>>>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedSource {
        fn respond(self, repo: &str, script: Vec<Option<Vec<ContributorStats>>>) -> Self {
            self.responses.borrow_mut().insert(repo.to_string(), script);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl StatsSource for ScriptedSource {
        async fn fetch(&self, repo: &str) -> Result<Option<Vec<ContributorStats>>> {
            self.calls.borrow_mut().push(repo.to_string());
            let mut responses = self.responses.borrow_mut();
            let script = responses.entry(repo.to_string()).or_default();
            if script.is_empty() {
                Ok(None)
            } else {
                Ok(script.remove(0))
            }
        }
    }

    fn stat(login: &str, avatar: &str, total: i64) -> ContributorStats {
        ContributorStats {
            author: Some(StatsAuthor {
                login: Some(login.to_string()),
                avatar_url: Some(avatar.to_string()),
            }),
            total: Some(total),
        }
    }

    fn repos(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_repositories_in_first_round() {
        let source = ScriptedSource::default()
            .respond("A", vec![Some(vec![stat("bob", "u", 10)])])
            .respond("B", vec![Some(vec![stat("bob", "u2", 5)])]);

        let outcome = fetch_all(&source, &repos(&["A", "B"]), 3, Duration::ZERO)
            .await
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.fetched, repos(&["A", "B"]));

        let bob = outcome.contributors.get("bob").unwrap();
        assert_eq!(bob.avatar, "u2");
        assert_eq!(bob.commits.get("A"), Some(&10));
        assert_eq!(bob.commits.get("B"), Some(&5));
    }

    #[tokio::test]
    async fn test_only_missing_repositories_are_retried() {
        let source = ScriptedSource::default()
            .respond("server", vec![Some(vec![stat("amy", "a", 3)])])
            .respond("web", vec![None, Some(vec![stat("kim", "k", 1)])]);

        let outcome = fetch_all(&source, &repos(&["server", "web"]), 3, Duration::ZERO)
            .await
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.rounds, 2);
        assert_eq!(source.calls(), repos(&["server", "web", "web"]));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let source = ScriptedSource::default()
            .respond("server", vec![Some(vec![stat("amy", "a", 3)])]);

        let outcome = fetch_all(&source, &repos(&["server", "docs"]), 3, Duration::ZERO)
            .await
            .unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.rounds, 3);
        assert_eq!(outcome.missing, repos(&["docs"]));
        assert_eq!(source.calls(), repos(&["server", "docs", "docs", "docs"]));
        assert_eq!(outcome.contributors.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_aborts() {
        let mut broken = stat("amy", "a", 3);
        broken.total = None;
        let source = ScriptedSource::default().respond("server", vec![Some(vec![broken])]);

        let err = fetch_all(&source, &repos(&["server"]), 3, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingField { .. }));
    }

    /// Fails every request as a transport error would.
    #[derive(Default)]
    struct UnreachableSource {
        calls: RefCell<u32>,
    }

    impl StatsSource for UnreachableSource {
        async fn fetch(&self, _repo: &str) -> Result<Option<Vec<ContributorStats>>> {
            *self.calls.borrow_mut() += 1;
            Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    #[tokio::test]
    async fn test_transport_error_aborts_without_retry() {
        let source = UnreachableSource::default();

        let err = fetch_all(&source, &repos(&["server", "web"]), 3, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(*source.calls.borrow(), 1);
    }
}
