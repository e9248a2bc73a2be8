//! Domain logic: decide which commits count as packaging changes.
//!
//! This crate owns *which* paths are monitored and *which* commits pass the
//! filter. It does not own where commits come from; that's the
//! `packwatch-core` ports.

mod filter;
mod matcher;

pub use filter::CommitFilter;
pub use matcher::{DEFAULT_PACKAGING_PATTERNS, InvalidPattern, MonitoredPathSpec};
