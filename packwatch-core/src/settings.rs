//! Clap-free settings for embedding the pipelines in other tools.
//!
//! The CLI builds these from flags, `packwatch.toml`, and environment
//! variables; embedders fill them directly.

use std::time::Duration;

use camino::Utf8PathBuf;
use packwatch_types::RepoLocator;

/// Commits inspected per run unless the caller raises the cap.
pub const DEFAULT_MAX_COMMITS: usize = 50;

/// Reference validated when none is given.
pub const DEFAULT_VALIDATION_REF: &str = "main";

/// Regeneration attempts per rejected patch.
pub const DEFAULT_REGEN_ATTEMPTS: u32 = 1;

/// Settings for a commit-analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeSettings {
    // Target
    pub locator: RepoLocator,
    pub from_ref: String,
    pub to_ref: String,

    // Scope
    /// Upper bound on commits fetched in detail, oldest first.
    pub max_commits: usize,
    /// Glob patterns for pattern mode. Ignored when `patches_dir` is set.
    pub patterns: Vec<String>,
    /// Switches matching to exact mode: the monitored set becomes the
    /// paths named by the patch files and path lists in this directory.
    pub patches_dir: Option<Utf8PathBuf>,
}

impl AnalyzeSettings {
    pub fn new(
        locator: RepoLocator,
        from_ref: impl Into<String>,
        to_ref: impl Into<String>,
    ) -> Self {
        Self {
            locator,
            from_ref: from_ref.into(),
            to_ref: to_ref.into(),
            max_commits: DEFAULT_MAX_COMMITS,
            patterns: packwatch_domain::DEFAULT_PACKAGING_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            patches_dir: None,
        }
    }
}

/// Settings for a patch-validation run.
#[derive(Debug, Clone)]
pub struct ValidateSettings {
    // Target
    pub locator: RepoLocator,
    /// Branch, tag, or commit id the patches must apply to.
    pub reference: String,

    // Patches
    pub patches_dir: Utf8PathBuf,
    /// Regeneration attempts per rejected patch; `0` disables recovery.
    pub regen_attempts: u32,
}

impl ValidateSettings {
    pub fn new(locator: RepoLocator, patches_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            locator,
            reference: DEFAULT_VALIDATION_REF.to_string(),
            patches_dir: patches_dir.into(),
            regen_attempts: DEFAULT_REGEN_ATTEMPTS,
        }
    }
}

/// Shared knobs for the HTTP adapters.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Attempts per request, first try included.
    pub retries: u32,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 3,
            user_agent: format!("packwatch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Tokens for the source hosts. All optional; public repositories work
/// without any.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub gitlab_username: Option<String>,
    pub gitlab_token: Option<String>,
}

/// Connection details for the reasoning service. No `endpoint` means the
/// run proceeds without summaries or regeneration.
#[derive(Debug, Clone)]
pub struct ReasoningSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for ReasoningSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
        }
    }
}
