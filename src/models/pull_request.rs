//! Pull request metadata as returned by the hosting API.

use chrono::{DateTime, Utc};

/// The subset of pull request metadata shown in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    /// Login of the account that opened the pull request.
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}
