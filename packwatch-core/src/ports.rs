//! Port traits separating the pipelines from network and subprocess I/O.
//!
//! Production implementations live in [`crate::adapters`]; tests drive the
//! pipelines through the in-memory fakes from the same module.

use camino::Utf8Path;
use packwatch_types::{Commit, RepoLocator};

use crate::error::Result;

/// Lists commits between two refs and resolves their changed files.
pub trait CommitSource {
    /// Commits reachable in `base...head`, oldest first, as the host
    /// reports them. Entries may come back without file details.
    fn compare(&self, locator: &RepoLocator, base: &str, head: &str) -> Result<Vec<Commit>>;

    /// Full detail for a single commit, including its changed files.
    fn commit_detail(&self, locator: &RepoLocator, id: &str) -> Result<Commit>;
}

/// Result of one `git apply` attempt. Rejection is data, not an error:
/// the validator records it and decides whether to regenerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The diff applied. `three_way` is set when the direct apply failed
    /// and the three-way merge fallback succeeded.
    Applied { three_way: bool },
    /// The diff did not apply; `diagnostics` is the tool output verbatim.
    Rejected { diagnostics: String },
}

/// A file from the checked-out tree, `None` when absent at that ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub path: String,
    pub content: Option<String>,
}

/// Git operations against an ephemeral working tree.
///
/// Errors are reserved for infrastructure failures. An apply that merely
/// rejects comes back as `Ok(ApplyOutcome::Rejected { .. })`.
pub trait GitClient {
    /// Clones `locator` into `dest`, which must not yet exist.
    fn clone_repo(&self, locator: &RepoLocator, dest: &Utf8Path) -> Result<()>;

    /// Detached checkout of `reference` (branch, tag, or commit id).
    fn checkout(&self, workdir: &Utf8Path, reference: &str) -> Result<()>;

    /// Applies `diff` to the working tree, falling back to a three-way
    /// merge when the direct apply rejects.
    fn apply_patch(&self, workdir: &Utf8Path, diff: &str) -> Result<ApplyOutcome>;

    /// Restores the tree to the checked-out reference, discarding any
    /// leftovers from previous apply attempts.
    fn reset_baseline(&self, workdir: &Utf8Path) -> Result<()>;

    /// Reads one repo-relative file from the working tree.
    fn read_file(&self, workdir: &Utf8Path, path: &str) -> Result<Option<String>>;
}

/// Produces the one-line summary used when reporting a matched commit.
pub trait Summarizer {
    fn summarize(&self, commit: &Commit) -> Result<String>;
}

/// Regenerates a rejected diff against the current state of its targets.
///
/// The service is a black box: it receives the failing diff, the apply
/// diagnostics, and the current content of the files the diff touches,
/// and returns a candidate replacement diff. The caller re-applies the
/// candidate to judge it; the service's own claims are never trusted.
pub trait RegenerationService {
    fn regenerate(
        &self,
        original_diff: &str,
        diagnostics: &str,
        current_files: &[TreeFile],
    ) -> Result<String>;
}
