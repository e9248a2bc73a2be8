//! Patch-file parsing for packwatch.
//!
//! Turns raw patch/diff content or plain-text path lists into normalized,
//! repo-relative target paths, and loads whole patches directories with
//! per-file failure capture.

pub mod error;
pub mod load;
pub mod parser;

pub use error::PatchParseError;
pub use load::{LoadedPatches, PatchLoadFailure, load_patches_dir};
pub use parser::{extract_diff_paths, parse_path_list};
