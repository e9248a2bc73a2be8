use crate::error::PatchParseError;
use crate::parser::{extract_diff_paths, parse_path_list};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use packwatch_types::{PatchFile, PathList};
use std::collections::HashSet;
use tracing::debug;

/// Everything found in a patches directory.
///
/// Parse failures are carried alongside the successes: each one is fatal for
/// its own file and counts as a failed patch downstream, but never aborts the
/// siblings.
#[derive(Debug, Clone, Default)]
pub struct LoadedPatches {
    pub patches: Vec<PatchFile>,
    pub lists: Vec<PathList>,
    pub failures: Vec<PatchLoadFailure>,
}

#[derive(Debug, Clone)]
pub struct PatchLoadFailure {
    pub path: Utf8PathBuf,
    pub name: String,
    pub error: PatchParseError,
}

impl LoadedPatches {
    /// Union of all extracted target paths, first-seen order, deduplicated.
    /// This is the exact-mode monitored set.
    pub fn monitored_paths(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let candidates = self
            .patches
            .iter()
            .flat_map(|p| p.target_paths.iter())
            .chain(self.lists.iter().flat_map(|l| l.paths.iter()));
        for path in candidates {
            if seen.insert(path.clone()) {
                out.push(path.clone());
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty() && self.lists.is_empty() && self.failures.is_empty()
    }
}

/// Load a patches directory.
///
/// `.patch`/`.diff` files are parsed as diffs, `.txt` files as literal path
/// lists; anything else is ignored. Entries are processed in file-name order.
pub fn load_patches_dir(dir: &Utf8Path) -> anyhow::Result<LoadedPatches> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read patches dir {dir}"))? {
        let entry = entry.with_context(|| format!("read patches dir entry in {dir}"))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|p| anyhow::anyhow!("non-UTF-8 path in patches dir: {}", p.display()))?;
            entries.push(path);
        }
    }
    // Deterministic order matters.
    entries.sort();

    let mut out = LoadedPatches::default();
    for path in entries {
        let name = path.file_name().unwrap_or_default().to_string();
        match path.extension() {
            Some("patch") | Some("diff") => match read_file(&path) {
                Ok(raw) => match extract_diff_paths(&raw, &name) {
                    Ok(target_paths) => out.patches.push(PatchFile {
                        source_path: path,
                        name,
                        raw,
                        target_paths,
                    }),
                    Err(error) => out.failures.push(PatchLoadFailure { path, name, error }),
                },
                Err(error) => out.failures.push(PatchLoadFailure { path, name, error }),
            },
            Some("txt") => match read_file(&path) {
                Ok(raw) => match parse_path_list(&raw, &name) {
                    Ok(paths) => out.lists.push(PathList {
                        source_path: path,
                        name,
                        paths,
                    }),
                    Err(error) => out.failures.push(PatchLoadFailure { path, name, error }),
                },
                Err(error) => out.failures.push(PatchLoadFailure { path, name, error }),
            },
            _ => {
                debug!(path = %path, "ignoring non-patch file in patches dir");
            }
        }
    }

    debug!(
        patches = out.patches.len(),
        lists = out.lists.len(),
        failures = out.failures.len(),
        "loaded patches dir {dir}"
    );
    Ok(out)
}

fn read_file(path: &Utf8Path) -> Result<String, PatchParseError> {
    fs::read_to_string(path).map_err(|e| PatchParseError::Unreadable {
        path: path.to_string(),
        message: e.to_string(),
    })
}
