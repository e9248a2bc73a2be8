use serde::{Deserialize, Serialize};
use std::fmt;

/// Host families with distinct credential shapes.
///
/// GitHub authenticates clones with a bare token; the GitLab family pairs a
/// username with its access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostFamily {
    Github,
    Gitlab,
    Generic,
}

/// Where the target repository lives.
///
/// Accepts the `owner/repo` shorthand (resolved against github.com), a full
/// `https://` URL, or a `file://` URL for a local mirror. The owner/repo
/// slug feeds report titles; the URL feeds clone and API calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLocator {
    pub host: HostFamily,
    pub owner: String,
    pub repo: String,

    /// Clone URL without credentials. For https URLs a trailing `.git` is
    /// dropped; `file://` URLs are kept verbatim since the path is literal.
    pub url: String,
}

impl RepoLocator {
    /// Parse a locator argument. Returns `None` when the shape is not a
    /// recognizable `owner/repo` pair, https URL, or file URL.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if let Some(rest) = input.strip_prefix("https://") {
            return Self::parse_url(rest);
        }
        if let Some(rest) = input.strip_prefix("file://") {
            return Self::parse_file_url(input, rest);
        }
        if input.contains("://") {
            return None;
        }
        // owner/repo shorthand
        let mut parts = input.split('/');
        let owner = parts.next()?.to_string();
        let repo = parts.next()?.trim_end_matches(".git").to_string();
        if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
            return None;
        }
        Some(Self {
            host: HostFamily::Github,
            owner: owner.clone(),
            repo: repo.clone(),
            url: format!("https://github.com/{owner}/{repo}"),
        })
    }

    fn parse_url(rest: &str) -> Option<Self> {
        let mut segments = rest.trim_end_matches('/').split('/');
        let host = segments.next()?;
        if host.is_empty() {
            return None;
        }
        let path: Vec<&str> = segments.collect();
        if path.len() < 2 {
            return None;
        }
        let repo = path.last()?.trim_end_matches(".git");
        let owner = path[path.len() - 2];
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        let family = if host == "github.com" {
            HostFamily::Github
        } else if host == "gitlab.com" || host.starts_with("gitlab.") {
            HostFamily::Gitlab
        } else {
            HostFamily::Generic
        };
        let mut url = format!("https://{host}");
        for seg in &path[..path.len() - 1] {
            url.push('/');
            url.push_str(seg);
        }
        url.push('/');
        url.push_str(repo);
        Some(Self {
            host: family,
            owner: owner.to_string(),
            repo: repo.to_string(),
            url,
        })
    }

    fn parse_file_url(input: &str, rest: &str) -> Option<Self> {
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
        let repo = segments.last()?.trim_end_matches(".git");
        if repo.is_empty() {
            return None;
        }
        let owner = if segments.len() >= 2 {
            segments[segments.len() - 2]
        } else {
            "local"
        };
        Some(Self {
            host: HostFamily::Generic,
            owner: owner.to_string(),
            repo: repo.to_string(),
            url: input.trim_end_matches('/').to_string(),
        })
    }

    /// `owner/repo`, as used in report titles.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for RepoLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
