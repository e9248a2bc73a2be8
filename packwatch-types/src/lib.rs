//! Shared data model for the packwatch workspace.
//!
//! # Design constraints
//! - The report types are serialized to stdout for machine consumption.
//! - Commit and changed-file records are immutable after ingestion; nothing
//!   downstream mutates them.
//! - Prefer adding optional fields over changing semantics.

pub mod commit;
pub mod locator;
pub mod patch;
pub mod report;
pub mod validation;

pub use commit::{AnalyzedCommit, ChangedFile, Commit, FileStatus, MatchedCommit, MatchedFile};
pub use locator::{HostFamily, RepoLocator};
pub use patch::{PatchFile, PathList};
pub use report::IssueReport;
pub use validation::{AttemptOutcome, PatchState, RegenerationAttempt, RunPhase, ValidationResult};
