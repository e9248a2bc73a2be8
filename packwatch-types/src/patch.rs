use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A maintained patch loaded from the patches directory.
///
/// `target_paths` holds the repo-relative paths extracted from the diff
/// headers, in first-seen order, deduplicated, with the one-level `a/`/`b/`
/// prefixes stripped. A rename contributes both endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchFile {
    pub source_path: Utf8PathBuf,

    /// File name of the patch; used as its identifier in results and reports.
    pub name: String,

    /// Raw diff content, byte-for-byte as read from disk.
    pub raw: String,

    #[serde(default)]
    pub target_paths: Vec<String>,
}

/// A plain-text list of literal monitored paths (`.txt` in the patches
/// directory). Contributes paths to exact-mode matching; nothing to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathList {
    pub source_path: Utf8PathBuf,
    pub name: String,

    #[serde(default)]
    pub paths: Vec<String>,
}
