use thiserror::Error;

/// Parse failures for one patch or path-list file.
///
/// Fatal for that file only; the loader keeps going and the failure is
/// reported and counted against the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchParseError {
    /// The extension said diff, but no unified-diff headers were found.
    #[error("no unified diff headers found in {path}")]
    NoDiffHeaders { path: String },

    /// The extension said path list, but no usable path lines were found.
    #[error("no usable paths found in {path}")]
    NoPaths { path: String },

    #[error("unreadable patch file {path}: {message}")]
    Unreadable { path: String, message: String },
}
