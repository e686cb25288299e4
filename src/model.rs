use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merged pull request as reported by the paginated search, before its
/// diff has been fetched and measured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedPullRequest {
    pub number: u64,
    pub author: String,
    pub merged_at: DateTime<Utc>,
    pub base_branch: String,
}

/// One persisted row: a merged pull request plus its measured word count.
/// Rows are insert-only; a number is recorded at most once and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestRecord {
    pub number: u64,
    pub author: String,
    pub merged_at: DateTime<Utc>,
    pub base_branch: String,
    pub zh_word_count: u64,
}

/// One page of results from the cursor-paginated query. The cursor is only
/// meaningful for the duration of a single walk and is never persisted.
#[derive(Debug, Clone)]
pub struct PullRequestPage {
    pub items: Vec<MergedPullRequest>,
    pub end_cursor: Option<String>,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionRow {
    pub author: String,
    pub total: u64,
}

/// Ranked (label, value) pairs ending with a synthetic "other" entry.
/// The values always sum to the filtered grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBucket {
    pub entries: Vec<(String, u64)>,
}

impl ReportBucket {
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, value)| value).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Both bounds are inclusive.
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}
