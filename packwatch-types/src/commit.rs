use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit as listed by the source host, with its changed files.
///
/// Created by the VCS collaborator and never mutated after ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,

    /// Full commit message; the first line is the title.
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub files: Vec<ChangedFile>,
}

impl Commit {
    /// First line of the commit message.
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Abbreviated commit id (first seven characters, as shown by hosts).
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,

    #[serde(default)]
    pub additions: u64,

    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    #[serde(other)]
    Other,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Removed => "removed",
            FileStatus::Renamed => "renamed",
            FileStatus::Other => "other",
        }
    }
}

/// A changed file that matched the monitored-path specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedFile {
    pub path: String,
    pub status: FileStatus,
}

/// A commit that passed the filter, with the subset of files that matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedCommit {
    pub commit: Commit,
    pub matched: Vec<MatchedFile>,
}

/// A matched commit paired with the one-line summary chosen for reporting.
///
/// The summary is the reasoning-service text when one was produced, else
/// the commit title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedCommit {
    pub entry: MatchedCommit,
    pub summary: String,
}
