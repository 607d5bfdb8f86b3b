use serde::{Deserialize, Serialize};

/// One element of `GET /repos/{owner}/{repo}/stats/contributors`.
///
/// Every field is optional here so that a schema change surfaces as a
/// descriptive `MissingField` error during aggregation instead of an opaque
/// deserialization failure. The per-week breakdown is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorStats {
    pub author: Option<StatsAuthor>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsAuthor {
    pub login: Option<String>,
    pub avatar_url: Option<String>,
}
