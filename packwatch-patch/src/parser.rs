//! Path extraction from unified diffs and plain-text path lists.
//!
//! The extracted paths are repo-relative: the one-level `a/`/`b/` prefixes
//! from diff headers are stripped, `/dev/null` sides are skipped, and the
//! result preserves first-seen order with duplicates removed.

use crate::error::PatchParseError;
use std::collections::HashSet;

/// Extract target paths from unified-diff content.
///
/// Recognizes `diff --git a/<old> b/<new>` lines and `--- `/`+++ ` headers.
/// A rename yields both endpoints. Errors when no header yields a path.
pub fn extract_diff_paths(content: &str, source: &str) -> Result<Vec<String>, PatchParseError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |path: Option<String>| {
        if let Some(p) = path
            && !p.is_empty()
            && seen.insert(p.clone())
        {
            out.push(p);
        }
    };

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("diff --git ") {
            let (old, new) = split_git_header(rest);
            push(normalize_side(old, "a/"));
            push(normalize_side(new, "b/"));
        } else if let Some(rest) = line.strip_prefix("--- ") {
            push(normalize_side(Some(rest), "a/"));
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            push(normalize_side(Some(rest), "b/"));
        }
    }

    if out.is_empty() {
        return Err(PatchParseError::NoDiffHeaders {
            path: source.to_string(),
        });
    }
    Ok(out)
}

/// Split the remainder of a `diff --git ` line into its two sides.
///
/// Paths containing spaces make the split ambiguous; git quotes such paths,
/// and otherwise ` b/` is the separator git itself writes.
fn split_git_header(rest: &str) -> (Option<&str>, Option<&str>) {
    if let Some(stripped) = rest.strip_prefix('"')
        && let Some(end) = stripped.find('"')
    {
        let old = &rest[..end + 2];
        let new = rest[end + 2..].trim_start();
        return (Some(old), Some(new));
    }
    match rest.find(" b/") {
        Some(idx) => (Some(&rest[..idx]), Some(&rest[idx + 1..])),
        None => {
            // --no-prefix output: two plain paths separated by a space.
            let mut parts = rest.splitn(2, ' ');
            (parts.next(), parts.next())
        }
    }
}

/// Normalize one header side to a repo-relative path.
///
/// Strips surrounding quotes, a trailing tab-separated timestamp (classic
/// `diff -u` output), and exactly one level of the given diff prefix.
fn normalize_side(raw: Option<&str>, prefix: &str) -> Option<String> {
    let raw = raw?.trim();
    let raw = raw.split('\t').next().unwrap_or(raw).trim();
    let raw = raw.trim_matches('"');
    if raw.is_empty() || raw == "/dev/null" {
        return None;
    }
    let path = raw.strip_prefix(prefix).unwrap_or(raw);
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// Parse a plain-text path list: one path per line, blank lines and
/// `#`-prefixed comment lines skipped. Errors when nothing remains.
pub fn parse_path_list(content: &str, source: &str) -> Result<Vec<String>, PatchParseError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if seen.insert(line.to_string()) {
            out.push(line.to_string());
        }
    }
    if out.is_empty() {
        return Err(PatchParseError::NoPaths {
            path: source.to_string(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_single_path_once_from_both_headers() {
        let diff = "--- a/foo.txt\n+++ b/foo.txt\n@@ -1 +1 @@\n-old\n+new\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["foo.txt"]);
    }

    #[test]
    fn extracts_from_git_header_line() {
        let diff = "diff --git a/src/main.py b/src/main.py\nindex 111..222 100644\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["src/main.py"]);
    }

    #[test]
    fn rename_yields_both_endpoints_in_order() {
        let diff = concat!(
            "diff --git a/old_name.txt b/new_name.txt\n",
            "similarity index 90%\n",
            "rename from old_name.txt\n",
            "rename to new_name.txt\n",
        );
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["old_name.txt", "new_name.txt"]);
    }

    #[test]
    fn dev_null_sides_are_skipped() {
        let diff = "--- /dev/null\n+++ b/created.txt\n@@ -0,0 +1 @@\n+hi\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["created.txt"]);
    }

    #[test]
    fn multi_file_diff_preserves_order() {
        let diff = concat!(
            "diff --git a/requirements.txt b/requirements.txt\n",
            "--- a/requirements.txt\n",
            "+++ b/requirements.txt\n",
            "@@ -1 +1 @@\n-a\n+b\n",
            "diff --git a/Dockerfile b/Dockerfile\n",
            "--- a/Dockerfile\n",
            "+++ b/Dockerfile\n",
            "@@ -1 +1 @@\n-c\n+d\n",
        );
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["requirements.txt", "Dockerfile"]);
    }

    #[test]
    fn classic_diff_timestamp_is_trimmed() {
        let diff = "--- a/foo.txt\t2024-01-01 00:00:00\n+++ b/foo.txt\t2024-01-02 00:00:00\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["foo.txt"]);
    }

    #[test]
    fn no_prefix_diff_keeps_paths_as_is() {
        let diff = "diff --git pyproject.toml pyproject.toml\n--- pyproject.toml\n+++ pyproject.toml\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["pyproject.toml"]);
    }

    #[test]
    fn hunk_body_lines_are_not_headers() {
        // Removed/added body lines start with a single marker character.
        let diff = "--- a/f\n+++ b/f\n@@ -1,2 +1,2 @@\n--x\n++y\n context\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["f"]);
    }

    #[test]
    fn garbage_content_is_a_parse_error() {
        let err = extract_diff_paths("not a diff at all\n", "bad.patch").unwrap_err();
        assert_eq!(
            err,
            PatchParseError::NoDiffHeaders {
                path: "bad.patch".to_string()
            }
        );
    }

    #[test]
    fn empty_content_is_a_parse_error() {
        assert!(extract_diff_paths("", "empty.diff").is_err());
    }

    #[test]
    fn path_list_skips_blanks_and_comments() {
        let content = "# monitored files\n\nrequirements.txt\n  poetry.lock  \n# trailing\n";
        let paths = parse_path_list(content, "paths.txt").unwrap();
        assert_eq!(paths, vec!["requirements.txt", "poetry.lock"]);
    }

    #[test]
    fn path_list_dedups_preserving_order() {
        let content = "b.txt\na.txt\nb.txt\n";
        let paths = parse_path_list(content, "paths.txt").unwrap();
        assert_eq!(paths, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn comment_only_list_is_a_parse_error() {
        let err = parse_path_list("# nothing here\n\n", "paths.txt").unwrap_err();
        assert_eq!(
            err,
            PatchParseError::NoPaths {
                path: "paths.txt".to_string()
            }
        );
    }

    #[test]
    fn quoted_git_paths_are_unquoted() {
        let diff = "diff --git \"a/with space.txt\" \"b/with space.txt\"\n";
        let paths = extract_diff_paths(diff, "x.patch").unwrap();
        assert_eq!(paths, vec!["with space.txt"]);
    }
}
