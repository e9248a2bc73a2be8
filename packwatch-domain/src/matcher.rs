//! Packaging-path matching.
//!
//! A run monitors either a glob pattern list (the default) or an exact set
//! of literal paths derived from a patches directory. A spec is in exactly
//! one mode; the modes never mix within one matching decision.

use glob::Pattern;
use std::collections::BTreeSet;
use thiserror::Error;

/// Paths that almost always carry packaging impact when touched.
///
/// Bare names match the basename anywhere in the tree; entries with a
/// separator match the full repo-relative path.
pub const DEFAULT_PACKAGING_PATTERNS: &[&str] = &[
    "requirements.txt",
    "requirements/*.txt",
    "constraints.txt",
    "*.in",
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    "MANIFEST.in",
    "Pipfile",
    "Pipfile.lock",
    "poetry.lock",
    "uv.lock",
    "environment.yml",
    "conda-lock.yml",
    "tox.ini",
    "Makefile",
    "Dockerfile",
    "Dockerfile.*",
    "Containerfile",
];

/// A monitored pattern that does not compile as a glob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid packaging pattern `{pattern}`: {message}")]
pub struct InvalidPattern {
    pub pattern: String,
    pub message: String,
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    glob: Pattern,
    /// Patterns with a separator anchor to the whole repo-relative path.
    full_path: bool,
}

#[derive(Debug, Clone)]
enum Mode {
    Patterns(Vec<CompiledPattern>),
    Exact(BTreeSet<String>),
}

/// The set of paths one run watches.
#[derive(Debug, Clone)]
pub struct MonitoredPathSpec {
    mode: Mode,
}

impl Default for MonitoredPathSpec {
    fn default() -> Self {
        Self::default_patterns()
    }
}

impl MonitoredPathSpec {
    /// Pattern mode over the builtin list.
    pub fn default_patterns() -> Self {
        let compiled: Vec<_> = DEFAULT_PACKAGING_PATTERNS
            .iter()
            .filter_map(|raw| compile_pattern(raw).ok())
            .collect();
        debug_assert_eq!(compiled.len(), DEFAULT_PACKAGING_PATTERNS.len());
        Self {
            mode: Mode::Patterns(compiled),
        }
    }

    /// Pattern mode over a caller-supplied list.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, InvalidPattern> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            compiled.push(compile_pattern(raw.as_ref())?);
        }
        Ok(Self {
            mode: Mode::Patterns(compiled),
        })
    }

    /// Exact mode: literal path equality, no wildcard expansion.
    pub fn exact<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            mode: Mode::Exact(paths.into_iter().collect()),
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self.mode, Mode::Exact(_))
    }

    /// Number of patterns or literal paths monitored.
    pub fn len(&self) -> usize {
        match &self.mode {
            Mode::Patterns(patterns) => patterns.len(),
            Mode::Exact(paths) => paths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` hits the monitored set. Case-sensitive in both modes.
    pub fn matches(&self, path: &str) -> bool {
        match &self.mode {
            Mode::Patterns(patterns) => {
                let basename = path.rsplit('/').next().unwrap_or(path);
                patterns.iter().any(|p| {
                    let candidate = if p.full_path { path } else { basename };
                    p.glob.matches(candidate)
                })
            }
            Mode::Exact(paths) => paths.contains(path),
        }
    }
}

fn compile_pattern(raw: &str) -> Result<CompiledPattern, InvalidPattern> {
    let glob = Pattern::new(raw).map_err(|e| InvalidPattern {
        pattern: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(CompiledPattern {
        glob,
        full_path: raw.contains('/'),
    })
}
