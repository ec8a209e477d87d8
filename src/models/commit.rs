use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Entry of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub commit: CommitDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub date: DateTime<FixedOffset>,
}

/// A commit as the analyzer sees it: message plus author timestamp.
///
/// The timestamp keeps the offset it was recorded with; bucketing by hour
/// and weekday happens in that offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub message: String,
    pub date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

impl CommitRecord {
    pub fn from_summary(summary: CommitSummary, repository: &str) -> Self {
        Self {
            message: summary.commit.message,
            date: summary.commit.author.date,
            repository: Some(repository.to_string()),
        }
    }
}
