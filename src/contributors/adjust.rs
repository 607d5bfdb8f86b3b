//! Duplicate-commit correction.
//!
//! When the old monolithic repository was split, the history of the new
//! repositories kept commits that are also counted in the split repository.
//! The correction table lists, per login, how many of those to subtract
//! from the split repository's total.

use std::collections::HashMap;
use std::path::Path;

use crate::config::SPLIT_REPOSITORY;
use crate::contributors::aggregate::ContributorMap;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct DuplicateCommits {
    table: HashMap<String, i64>,
}

impl DuplicateCommits {
    pub fn new(table: HashMap<String, i64>) -> Self {
        Self { table }
    }

    /// Load the correction table: a JSON object mapping login to count.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: HashMap<String, i64> = serde_json::from_str(&contents)?;
        Ok(Self::new(table))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Subtract duplicates from the split repository's totals.
    ///
    /// Only logins with a count for the split repository are touched. The
    /// result is not floored; a negative total is logged and kept.
    /// Returns the number of adjusted contributors.
    pub fn apply(&self, contributors: &mut ContributorMap) -> usize {
        let mut adjusted = 0;

        for (login, duplicates) in &self.table {
            let Some(total) = contributors
                .get_mut(login)
                .and_then(|entry| entry.commits.get_mut(SPLIT_REPOSITORY))
            else {
                continue;
            };

            *total -= duplicates;
            adjusted += 1;

            if *total < 0 {
                tracing::warn!(
                    "{}: {} total is negative ({}) after removing {} duplicate commits",
                    login,
                    SPLIT_REPOSITORY,
                    total,
                    duplicates
                );
            }
        }

        adjusted
    }
}
