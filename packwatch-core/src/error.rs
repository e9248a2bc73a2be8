//! Error taxonomy for the analysis and validation pipelines.
//!
//! Only failures that end a run are errors here. A patch that does not
//! apply, or a patch file that does not parse, is recorded in the run's
//! [`ValidationResult`](packwatch_types::ValidationResult) list instead.

use thiserror::Error;

/// Fatal pipeline failure.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Invalid settings detected before any network or subprocess work:
    /// bad flag combination, unusable pattern, missing credential.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The target repository could not be cloned or the requested
    /// reference checked out. Fatal for the run, never retried.
    #[error("repository access failed: {0}")]
    RepositoryAccess(String),

    /// A remote dependency (source-host API, reasoning service) was
    /// unreachable or answered with garbage. Retried with backoff by the
    /// adapters; escalated only once the retry budget is spent.
    #[error("external service failure: {0}")]
    ExternalService(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchError>;
