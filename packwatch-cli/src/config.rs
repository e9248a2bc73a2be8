//! Configuration file loading for packwatch.
//!
//! Discovers and loads `packwatch.toml` from the working directory,
//! overlays credential environment variables once at startup, and
//! merges the result with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use packwatch_core::settings::{
    Credentials, DEFAULT_REGEN_ATTEMPTS, HttpSettings, ReasoningSettings,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "packwatch.toml";

/// Top-level configuration from packwatch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PackwatchConfig {
    /// GitHub API access.
    pub github: GithubSection,

    /// GitLab clone credentials.
    pub gitlab: GitlabSection,

    /// Reasoning service used for summaries and patch regeneration.
    pub reasoning: ReasoningSection,

    /// Outbound HTTP behaviour.
    pub http: HttpSection,

    /// Patch validation behaviour.
    pub validate: ValidateSection,
}

/// GitHub section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GithubSection {
    /// API token, sent as `Authorization: token <value>`.
    pub token: Option<String>,
}

/// GitLab section of the config.
///
/// Both fields must be present for clone URLs to carry credentials.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitlabSection {
    pub username: Option<String>,
    pub token: Option<String>,
}

/// Reasoning section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReasoningSection {
    /// Chat-completions endpoint. Summaries and regeneration stay off
    /// when unset.
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint.
    pub api_key: Option<String>,

    /// Model name requested from the endpoint.
    pub model: Option<String>,
}

/// HTTP section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Attempts per request for transient failures.
    pub retries: Option<u32>,
}

/// Validate section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidateSection {
    /// Regeneration attempts per rejected patch.
    pub regen_attempts: Option<u32>,
}

/// Discover the packwatch.toml config file.
///
/// Searches for `packwatch.toml` in the given directory.
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a packwatch.toml config file.
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PackwatchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PackwatchConfig> {
    let config: PackwatchConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the working directory, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<PackwatchConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(PackwatchConfig::default()),
    }
}

/// Overlay credential environment variables onto a loaded config.
///
/// Applied once at startup; nothing downstream reads the environment.
/// `PACKWATCH_*` variables override the file, and the bare
/// `GITHUB_TOKEN` fallback keeps existing CI setups working. Empty
/// values are treated as unset.
pub fn overlay_env(config: &mut PackwatchConfig, get: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| get(name).filter(|value| !value.trim().is_empty());

    if let Some(token) = lookup("PACKWATCH_GITHUB_TOKEN").or_else(|| lookup("GITHUB_TOKEN")) {
        config.github.token = Some(token);
    }
    if let Some(username) = lookup("PACKWATCH_GITLAB_USERNAME") {
        config.gitlab.username = Some(username);
    }
    if let Some(token) = lookup("PACKWATCH_GITLAB_TOKEN") {
        config.gitlab.token = Some(token);
    }
    if let Some(endpoint) = lookup("PACKWATCH_REASONING_ENDPOINT") {
        config.reasoning.endpoint = Some(endpoint);
    }
    if let Some(api_key) = lookup("PACKWATCH_REASONING_API_KEY") {
        config.reasoning.api_key = Some(api_key);
    }
    if let Some(model) = lookup("PACKWATCH_REASONING_MODEL") {
        config.reasoning.model = Some(model);
    }
}

impl PackwatchConfig {
    /// Clone and API credentials drawn from the merged sections.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            github_token: self.github.token.clone(),
            gitlab_username: self.gitlab.username.clone(),
            gitlab_token: self.gitlab.token.clone(),
        }
    }

    /// HTTP settings with file overrides applied on top of the defaults.
    pub fn http_settings(&self) -> HttpSettings {
        let defaults = HttpSettings::default();
        HttpSettings {
            timeout: self
                .http
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            retries: self.http.retries.unwrap_or(defaults.retries),
            user_agent: defaults.user_agent,
        }
    }

    /// Reasoning settings with the default model filled in.
    pub fn reasoning_settings(&self) -> ReasoningSettings {
        let defaults = ReasoningSettings::default();
        ReasoningSettings {
            endpoint: self.reasoning.endpoint.clone(),
            api_key: self.reasoning.api_key.clone(),
            model: self.reasoning.model.clone().unwrap_or(defaults.model),
        }
    }

    /// Regeneration attempt budget: CLI flag beats the file, the file
    /// beats the built-in default.
    pub fn regen_attempts(&self, cli_override: Option<u32>) -> u32 {
        cli_override
            .or(self.validate.regen_attempts)
            .unwrap_or(DEFAULT_REGEN_ATTEMPTS)
    }
}
