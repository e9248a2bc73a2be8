//! In-memory port implementations for embedding and testing.

use packwatch_types::{Commit, RepoLocator};

use crate::error::{Result, WatchError};
use crate::ports::{CommitSource, Summarizer};

/// Serves a fixed commit list, mimicking the real host's two-step shape:
/// `compare` answers with shallow entries and `commit_detail` fills in the
/// changed files. Commits are returned in construction order.
#[derive(Debug, Clone, Default)]
pub struct StaticCommitSource {
    commits: Vec<Commit>,
}

impl StaticCommitSource {
    pub fn new(commits: Vec<Commit>) -> Self {
        Self { commits }
    }
}

impl CommitSource for StaticCommitSource {
    fn compare(&self, _locator: &RepoLocator, _base: &str, _head: &str) -> Result<Vec<Commit>> {
        Ok(self
            .commits
            .iter()
            .map(|c| Commit {
                files: vec![],
                ..c.clone()
            })
            .collect())
    }

    fn commit_detail(&self, _locator: &RepoLocator, id: &str) -> Result<Commit> {
        self.commits
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| WatchError::ExternalService(format!("unknown commit {id}")))
    }
}

/// Answers every summary request with the same line.
#[derive(Debug, Clone)]
pub struct FixedSummarizer {
    line: String,
}

impl FixedSummarizer {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }
}

impl Summarizer for FixedSummarizer {
    fn summarize(&self, _commit: &Commit) -> Result<String> {
        Ok(self.line.clone())
    }
}
