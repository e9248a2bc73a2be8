//! Rendering helpers for human-readable and JSON report output.

use packwatch_types::{AnalyzedCommit, IssueReport, RepoLocator, ValidationResult};
use tracing::debug;

/// Commit analysis report.
///
/// Summaries and commit ordering come in ready-made; this function only
/// lays them out.
pub fn render_analysis(
    locator: &RepoLocator,
    from: &str,
    to: &str,
    commits: &[AnalyzedCommit],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Comparing {}: {} -> {}\n\n", locator.slug(), from, to));

    if commits.is_empty() {
        out.push_str("No packaging-related changes found between the specified refs.\n");
        return out;
    }

    out.push_str(&format!(
        "Found {} commits touching packaging files.\n\n",
        commits.len()
    ));

    for analyzed in commits {
        let commit = &analyzed.entry.commit;
        out.push_str(&format!(
            "[packaging] {} {} - {}\n",
            locator.slug(),
            commit.short_id(),
            analyzed.summary
        ));
        if let Some(author) = &commit.author {
            out.push_str(&format!("  author: {}\n", author));
        }
        if let Some(url) = &commit.url {
            out.push_str(&format!("  url: {}\n", url));
        }
        out.push_str("  files:\n");
        for file in &analyzed.entry.matched {
            out.push_str(&format!("    {} {}\n", file.status.as_str(), file.path));
        }
        out.push('\n');
    }

    out
}

/// Patch validation report.
///
/// Diagnostics are passed through verbatim so the text can be pasted into
/// an issue without mangling.
pub fn render_validation(
    locator: &RepoLocator,
    reference: &str,
    results: &[ValidationResult],
) -> String {
    let applied = results.iter().filter(|r| r.applied).count();
    let failed = results.len() - applied;

    let mut out = String::new();
    out.push_str(&format!(
        "Patch validation for {} at '{}'\n",
        locator.slug(),
        reference
    ));
    out.push_str(&format!(
        "Patches: {}, applied: {}, failed: {}\n\n",
        results.len(),
        applied,
        failed
    ));

    for result in results {
        if result.applied {
            match result.attempts.len() {
                0 => out.push_str(&format!("[ok] {}\n", result.patch)),
                n => out.push_str(&format!(
                    "[ok] {} (applied after regeneration attempt {})\n",
                    result.patch, n
                )),
            }
            out.push('\n');
            continue;
        }

        out.push_str(&format!("[failed] {}\n", result.patch));
        if !result.diagnostics.is_empty() {
            out.push_str(&result.diagnostics);
            ensure_newline(&mut out);
        }
        for attempt in &result.attempts {
            out.push_str(&format!(
                "regeneration attempt {}: {}\n",
                attempt.attempt,
                attempt_label(attempt.outcome)
            ));
            if !attempt.diagnostics.is_empty() {
                out.push_str(&attempt.diagnostics);
                ensure_newline(&mut out);
            }
        }
        out.push('\n');
    }

    if failed == 0 {
        out.push_str("All patches applied cleanly.\n");
    } else {
        out.push_str(&format!(
            "{} of {} patches failed to apply.\n",
            failed,
            results.len()
        ));
    }

    out
}

/// Issue payload for a failed validation run, or `None` when everything
/// applied (JSON mode stays silent on success).
pub fn validation_issue(
    locator: &RepoLocator,
    reference: &str,
    results: &[ValidationResult],
) -> Option<IssueReport> {
    if results.iter().all(|r| r.applied) {
        debug!(slug = %locator.slug(), "all patches applied, no issue to report");
        return None;
    }
    let content = render_validation(locator, reference, results);
    Some(IssueReport::patch_failure(
        &locator.slug(),
        reference,
        content.trim_end().to_string(),
    ))
}

/// Serializes an issue report as a single JSON object.
pub fn render_issue_json(report: &IssueReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn attempt_label(outcome: packwatch_types::AttemptOutcome) -> &'static str {
    match outcome {
        packwatch_types::AttemptOutcome::Applied => "applied",
        packwatch_types::AttemptOutcome::Rejected => "rejected",
        packwatch_types::AttemptOutcome::ServiceError => "service error",
    }
}

fn ensure_newline(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
}
