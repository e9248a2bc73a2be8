//! GitHub compare-API commit source.

use chrono::{DateTime, Utc};
use packwatch_types::{ChangedFile, Commit, FileStatus, HostFamily, RepoLocator};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::adapters::with_retries;
use crate::error::{Result, WatchError};
use crate::ports::CommitSource;
use crate::settings::{Credentials, HttpSettings};

const GITHUB_API: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

pub struct GithubCommitSource {
    client: Client,
    api_base: String,
    token: Option<String>,
    retries: u32,
}

impl GithubCommitSource {
    pub fn new(http: &HttpSettings, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(http.timeout)
            .build()
            .map_err(|e| WatchError::Configuration(format!("build http client: {e}")))?;
        Ok(Self {
            client,
            api_base: GITHUB_API.to_string(),
            token: credentials.github_token.clone(),
            retries: http.retries,
        })
    }

    /// Point the source at a different API root (enterprise installs).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        with_retries("github api", self.retries, || {
            let mut request = self.client.get(url).header(ACCEPT, GITHUB_ACCEPT);
            if let Some(token) = &self.token {
                request = request.header(AUTHORIZATION, format!("token {token}"));
            }
            let response = request
                .send()
                .map_err(|e| WatchError::ExternalService(format!("GET {url}: {e}")))?;
            let status = response.status();
            if status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS {
                // 404s and friends will not get better on retry
                return Err(WatchError::RepositoryAccess(format!(
                    "GET {url}: HTTP {status}"
                )));
            }
            if !status.is_success() {
                return Err(WatchError::ExternalService(format!(
                    "GET {url}: HTTP {status}"
                )));
            }
            response
                .json::<T>()
                .map_err(|e| WatchError::ExternalService(format!("decode response of {url}: {e}")))
        })
    }

    fn require_github(&self, locator: &RepoLocator) -> Result<()> {
        if locator.host == HostFamily::Github {
            Ok(())
        } else {
            Err(WatchError::Configuration(format!(
                "commit analysis needs a GitHub repository, got {}",
                locator.url
            )))
        }
    }
}

impl CommitSource for GithubCommitSource {
    fn compare(&self, locator: &RepoLocator, base: &str, head: &str) -> Result<Vec<Commit>> {
        self.require_github(locator)?;
        let url = format!(
            "{}/repos/{}/{}/compare/{base}...{head}",
            self.api_base, locator.owner, locator.repo
        );
        debug!(url = %url, "comparing refs");
        let response: CompareResponse = self.get_json(&url)?;
        Ok(response.commits.into_iter().map(Commit::from).collect())
    }

    fn commit_detail(&self, locator: &RepoLocator, id: &str) -> Result<Commit> {
        self.require_github(locator)?;
        let url = format!(
            "{}/repos/{}/{}/commits/{id}",
            self.api_base, locator.owner, locator.repo
        );
        let entry: CommitEntry = self.get_json(&url)?;
        Ok(entry.into())
    }
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    commits: Vec<CommitEntry>,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
    commit: CommitPayload,
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct CommitPayload {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<AuthorPayload>,
}

#[derive(Debug, Deserialize)]
struct AuthorPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    filename: String,
    status: FileStatus,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
}

impl From<CommitEntry> for Commit {
    fn from(entry: CommitEntry) -> Self {
        let author = entry.commit.author.as_ref().and_then(|a| a.name.clone());
        let timestamp = entry.commit.author.as_ref().and_then(|a| a.date);
        Commit {
            id: entry.sha,
            message: entry.commit.message,
            author,
            timestamp,
            url: entry.html_url,
            files: entry.files.into_iter().map(ChangedFile::from).collect(),
        }
    }
}

impl From<FileEntry> for ChangedFile {
    fn from(entry: FileEntry) -> Self {
        ChangedFile {
            path: entry.filename,
            status: entry.status,
            additions: entry.additions,
            deletions: entry.deletions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn commit_entry_parses_the_full_payload() {
        let json = r#"{
            "sha": "8a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b",
            "html_url": "https://github.com/psf/requests/commit/8a1b2c3",
            "commit": {
                "message": "Pin urllib3 below 2.0\n\nSee #6432.",
                "author": {
                    "name": "Nate P",
                    "email": "nate@example.com",
                    "date": "2024-05-20T16:01:02Z"
                }
            },
            "files": [
                {"filename": "requirements.txt", "status": "modified", "additions": 1, "deletions": 1},
                {"filename": "old/setup.py", "status": "removed", "additions": 0, "deletions": 40},
                {"filename": "docs/conf.py", "status": "copied"}
            ]
        }"#;
        let commit: Commit = serde_json::from_str::<CommitEntry>(json).unwrap().into();

        assert_eq!(commit.short_id(), "8a1b2c3");
        assert_eq!(commit.title(), "Pin urllib3 below 2.0");
        assert_eq!(commit.author.as_deref(), Some("Nate P"));
        assert_eq!(commit.files.len(), 3);
        assert_eq!(commit.files[0].status, FileStatus::Modified);
        assert_eq!(commit.files[1].status, FileStatus::Removed);
        // unknown statuses degrade instead of failing the whole fetch
        assert_eq!(commit.files[2].status, FileStatus::Other);
    }

    #[test]
    fn compare_response_tolerates_sparse_entries() {
        let json = r#"{
            "commits": [
                {"sha": "abc", "commit": {"message": "m"}}
            ]
        }"#;
        let response: CompareResponse = serde_json::from_str(json).unwrap();
        let commit: Commit = response.commits.into_iter().next().unwrap().into();

        assert_eq!(commit.id, "abc");
        assert_eq!(commit.author, None);
        assert_eq!(commit.url, None);
        assert!(commit.files.is_empty());
    }

    #[test]
    fn non_github_locators_are_rejected_up_front() {
        let source =
            GithubCommitSource::new(&HttpSettings::default(), &Credentials::default()).unwrap();
        let gitlab = RepoLocator::parse("https://gitlab.com/group/project").unwrap();

        let err = source.compare(&gitlab, "a", "b").unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
    }
}
