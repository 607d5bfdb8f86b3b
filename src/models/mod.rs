//! Data shapes read from and written to the outside world.
//!
//! - `stats`: ContributorStats, StatsAuthor as returned by the GitHub
//!   contributor statistics endpoint
//! - `contributor`: ContributorRecord, OutputDocument written for the website

pub mod contributor;
pub mod stats;

pub use contributor::*;
pub use stats::*;
