//! Embeddable core of packwatch: compare two refs for packaging changes,
//! or validate maintained patches against a checked-out reference.
//!
//! The crate is clap-free. The CLI (and any other embedder) builds
//! [`settings`] values, picks implementations of the [`ports`] traits, and
//! calls the entry points.
//!
//! # Port traits
//!
//! * [`ports::CommitSource`]: lists and details commits between two refs
//! * [`ports::GitClient`]: clone, checkout, apply, reset
//! * [`ports::Summarizer`]: one-line summaries for matched commits
//! * [`ports::RegenerationService`]: repairs rejected diffs
//!
//! Production adapters live in [`adapters`]; in-memory fakes for embedding
//! and tests live there too.
//!
//! # Entry points
//!
//! * [`run_analyze`]: compare refs, filter to monitored paths, summarize
//! * [`run_validate`]: apply every patch in a directory, regenerating
//!   rejected ones within a bounded budget

pub mod adapters;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod regen;
pub mod settings;
pub mod validator;

pub use error::{Result, WatchError};
pub use pipeline::{AnalyzeOutcome, ValidateOutcome, run_analyze, run_validate};
pub use ports::{ApplyOutcome, CommitSource, GitClient, RegenerationService, Summarizer, TreeFile};
pub use regen::PatchRegenerator;
pub use settings::{
    AnalyzeSettings, Credentials, HttpSettings, ReasoningSettings, ValidateSettings,
};
pub use validator::PatchValidator;
