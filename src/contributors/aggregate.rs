//! Per-contributor accumulation across repositories.
//!
//! `ContributorMap` is keyed by login and keeps first-appearance order, which
//! is also the order of the `contrib` list in the output document.
//!
//! Merge rule for a login seen again (same or another repository):
//! - `avatar`: last write wins
//! - `<repo>` count: last write wins; other repositories' counts are kept
//!
//! Each repository is merged at most once per run, so in practice every
//! repository writes its own field once.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::error::{AppError, Result};
use crate::models::{ContributorRecord, ContributorStats};

/// Accumulated data for one login, before finalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributorEntry {
    pub avatar: String,
    pub commits: BTreeMap<String, i64>,
}

impl ContributorEntry {
    /// Overlay `other` onto `self` field by field.
    pub fn merge(&mut self, other: ContributorEntry) {
        self.avatar = other.avatar;
        self.commits.extend(other.commits);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContributorMap {
    entries: IndexMap<String, ContributorEntry>,
}

impl ContributorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, login: &str) -> Option<&ContributorEntry> {
        self.entries.get(login)
    }

    pub fn get_mut(&mut self, login: &str) -> Option<&mut ContributorEntry> {
        self.entries.get_mut(login)
    }

    /// Merge one repository's statistics into the map.
    ///
    /// Entries without an author (deleted accounts) are skipped. A present
    /// author lacking `login` or `avatar_url`, or an entry lacking `total`,
    /// aborts the merge: the upstream schema is no longer what we expect.
    /// Validation runs over the whole batch first so a bad payload leaves
    /// the map untouched.
    pub fn merge_repository(&mut self, repo: &str, stats: &[ContributorStats]) -> Result<usize> {
        let mut parsed = Vec::with_capacity(stats.len());

        for stat in stats {
            let Some(author) = &stat.author else {
                tracing::debug!("{}: skipping entry without author", repo);
                continue;
            };

            let login = author
                .login
                .clone()
                .ok_or_else(|| AppError::missing_field(repo, "login"))?;
            let avatar = author
                .avatar_url
                .clone()
                .ok_or_else(|| AppError::missing_field(repo, "avatar_url"))?;
            let total = stat.total.ok_or_else(|| AppError::missing_field(repo, "total"))?;

            parsed.push((
                login,
                ContributorEntry {
                    avatar,
                    commits: BTreeMap::from([(repo.to_string(), total)]),
                },
            ));
        }

        let merged = parsed.len();
        for (login, entry) in parsed {
            self.insert_or_merge(login, entry);
        }
        Ok(merged)
    }

    fn insert_or_merge(&mut self, login: String, entry: ContributorEntry) {
        match self.entries.get_mut(&login) {
            Some(existing) => existing.merge(entry),
            None => {
                self.entries.insert(login, entry);
            }
        }
    }

    /// Attach names and produce output records in first-appearance order.
    pub fn finalize(self) -> Vec<ContributorRecord> {
        self.entries
            .into_iter()
            .map(|(login, entry)| ContributorRecord {
                avatar: entry.avatar,
                name: login,
                commits: entry.commits,
            })
            .collect()
    }
}
