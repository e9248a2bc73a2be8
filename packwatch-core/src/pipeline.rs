//! Entry points tying ports, matching, and validation together.

use packwatch_domain::{CommitFilter, MonitoredPathSpec};
use packwatch_patch::load_patches_dir;
use packwatch_types::{AnalyzedCommit, MatchedCommit, RepoLocator, ValidationResult};
use tracing::{debug, info, warn};

use crate::error::{Result, WatchError};
use crate::ports::{CommitSource, GitClient, RegenerationService, Summarizer};
use crate::settings::{AnalyzeSettings, ValidateSettings};
use crate::validator::PatchValidator;

/// Result of one commit-analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub locator: RepoLocator,
    pub from_ref: String,
    pub to_ref: String,
    pub commits: Vec<AnalyzedCommit>,
    /// Commits dropped because their detail fetch kept failing.
    pub skipped: usize,
}

/// Result of one patch-validation run.
#[derive(Debug, Clone)]
pub struct ValidateOutcome {
    pub locator: RepoLocator,
    pub reference: String,
    pub results: Vec<ValidationResult>,
}

impl ValidateOutcome {
    /// Run-level success: every patch ended applied.
    pub fn all_applied(&self) -> bool {
        self.results.iter().all(|r| r.applied)
    }
}

/// Compare two refs and report the commits that touch monitored paths.
///
/// A commit whose detail fetch fails is skipped with a warning; the compare
/// call itself failing is fatal. Without a summarizer (or when it errors)
/// the commit title stands in for the summary.
pub fn run_analyze(
    settings: &AnalyzeSettings,
    source: &dyn CommitSource,
    summarizer: Option<&dyn Summarizer>,
) -> Result<AnalyzeOutcome> {
    let filter = CommitFilter::new(monitored_spec(settings)?);

    let listed = source.compare(&settings.locator, &settings.from_ref, &settings.to_ref)?;
    info!(
        total = listed.len(),
        cap = settings.max_commits,
        "compared {} {}..{}",
        settings.locator.slug(),
        settings.from_ref,
        settings.to_ref
    );

    let mut detailed = Vec::new();
    let mut skipped = 0usize;
    for commit in listed.into_iter().take(settings.max_commits) {
        match source.commit_detail(&settings.locator, &commit.id) {
            Ok(full) => detailed.push(full),
            Err(err) => {
                warn!(
                    commit = commit.short_id(),
                    error = %err,
                    "failed to fetch commit detail, skipping"
                );
                skipped += 1;
            }
        }
    }

    let mut commits = Vec::new();
    for entry in filter.filter(detailed) {
        let summary = resolve_summary(&entry, summarizer)?;
        commits.push(AnalyzedCommit { entry, summary });
    }

    Ok(AnalyzeOutcome {
        locator: settings.locator.clone(),
        from_ref: settings.from_ref.clone(),
        to_ref: settings.to_ref.clone(),
        commits,
        skipped,
    })
}

/// Validate every patch in the configured directory against one reference.
///
/// Parse failures count as failed patches but never abort the others; the
/// clone or checkout failing aborts the run.
pub fn run_validate(
    settings: &ValidateSettings,
    git: &dyn GitClient,
    regen: Option<&dyn RegenerationService>,
) -> Result<ValidateOutcome> {
    let loaded = load_patches_dir(&settings.patches_dir)
        .map_err(|e| WatchError::Configuration(format!("{e:#}")))?;
    if loaded.patches.is_empty() && loaded.failures.is_empty() {
        return Err(WatchError::Configuration(format!(
            "no patch files found in {}",
            settings.patches_dir
        )));
    }

    let mut results: Vec<ValidationResult> = loaded
        .failures
        .iter()
        .map(|f| ValidationResult::failure(&f.name, f.error.to_string()))
        .collect();

    if !loaded.patches.is_empty() {
        let validator = PatchValidator::new(git, regen, settings.regen_attempts);
        results.extend(validator.validate(
            &settings.locator,
            &settings.reference,
            &loaded.patches,
        )?);
    }

    // Report in file-name order regardless of which bucket a result came from.
    results.sort_by(|a, b| a.patch.cmp(&b.patch));

    Ok(ValidateOutcome {
        locator: settings.locator.clone(),
        reference: settings.reference.clone(),
        results,
    })
}

fn resolve_summary(entry: &MatchedCommit, summarizer: Option<&dyn Summarizer>) -> Result<String> {
    let Some(summarizer) = summarizer else {
        return Ok(entry.commit.title().to_string());
    };
    match summarizer.summarize(&entry.commit) {
        Ok(text) => Ok(text),
        Err(WatchError::ExternalService(message)) => {
            warn!(
                commit = entry.commit.short_id(),
                error = %message,
                "summary unavailable, falling back to the commit title"
            );
            Ok(entry.commit.title().to_string())
        }
        Err(other) => Err(other),
    }
}

fn monitored_spec(settings: &AnalyzeSettings) -> Result<MonitoredPathSpec> {
    match &settings.patches_dir {
        Some(dir) => {
            let loaded =
                load_patches_dir(dir).map_err(|e| WatchError::Configuration(format!("{e:#}")))?;
            for failure in &loaded.failures {
                warn!(file = %failure.name, error = %failure.error, "ignoring unparseable patch file");
            }
            let paths = loaded.monitored_paths();
            if paths.is_empty() {
                return Err(WatchError::Configuration(format!(
                    "patches directory {dir} contributes no monitored paths"
                )));
            }
            debug!(paths = paths.len(), "exact-path mode from patches dir");
            Ok(MonitoredPathSpec::exact(paths))
        }
        None => MonitoredPathSpec::from_patterns(&settings.patterns)
            .map_err(|e| WatchError::Configuration(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedSummarizer, StaticCommitSource};
    use crate::ports::ApplyOutcome;
    use camino::{Utf8Path, Utf8PathBuf};
    use packwatch_types::{ChangedFile, Commit, FileStatus};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn make_commit(id: &str, message: &str, paths: &[&str]) -> Commit {
        Commit {
            id: id.to_string(),
            message: message.to_string(),
            author: Some("Dev".to_string()),
            timestamp: None,
            url: None,
            files: paths
                .iter()
                .map(|p| ChangedFile {
                    path: p.to_string(),
                    status: FileStatus::Modified,
                    additions: 1,
                    deletions: 1,
                })
                .collect(),
        }
    }

    fn settings() -> AnalyzeSettings {
        AnalyzeSettings::new(
            RepoLocator::parse("psf/requests").unwrap(),
            "v2.31.0",
            "v2.32.0",
        )
    }

    /// Commit source with injectable compare and per-commit detail failures.
    struct FlakySource {
        commits: Vec<Commit>,
        fail_detail: BTreeSet<String>,
        fail_compare: Option<String>,
        detail_calls: Mutex<u32>,
    }

    impl FlakySource {
        fn new(commits: Vec<Commit>, fail_detail: &[&str]) -> Self {
            Self {
                commits,
                fail_detail: fail_detail.iter().map(|s| s.to_string()).collect(),
                fail_compare: None,
                detail_calls: Mutex::new(0),
            }
        }

        fn failing_compare(mut self, message: &str) -> Self {
            self.fail_compare = Some(message.to_string());
            self
        }
    }

    impl CommitSource for FlakySource {
        fn compare(&self, _: &RepoLocator, _: &str, _: &str) -> Result<Vec<Commit>> {
            if let Some(message) = &self.fail_compare {
                return Err(WatchError::ExternalService(message.clone()));
            }
            Ok(self
                .commits
                .iter()
                .map(|c| Commit {
                    files: vec![],
                    ..c.clone()
                })
                .collect())
        }

        fn commit_detail(&self, _: &RepoLocator, id: &str) -> Result<Commit> {
            *self.detail_calls.lock().unwrap() += 1;
            if self.fail_detail.contains(id) {
                return Err(WatchError::ExternalService("scripted failure".to_string()));
            }
            self.commits
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| WatchError::ExternalService(format!("unknown commit {id}")))
        }
    }

    struct BrokenSummarizer;

    impl Summarizer for BrokenSummarizer {
        fn summarize(&self, _: &Commit) -> Result<String> {
            Err(WatchError::ExternalService("summary endpoint down".to_string()))
        }
    }

    #[test]
    fn analyze_keeps_only_matching_commits() {
        let source = StaticCommitSource::new(vec![
            make_commit("a1a1a1a1", "Bump requests", &["requirements.txt"]),
            make_commit("b2b2b2b2", "Fix docs", &["README.md"]),
            make_commit("c3c3c3c3", "New build", &["setup.py", "src/app.py"]),
        ]);

        let outcome = run_analyze(&settings(), &source, None).unwrap();

        assert_eq!(outcome.commits.len(), 2);
        assert_eq!(outcome.commits[0].entry.commit.id, "a1a1a1a1");
        assert_eq!(outcome.commits[1].entry.commit.id, "c3c3c3c3");
        // only the matching subset of files is reported
        assert_eq!(outcome.commits[1].entry.matched.len(), 1);
        assert_eq!(outcome.commits[1].entry.matched[0].path, "setup.py");
        // without a summarizer the title stands in
        assert_eq!(outcome.commits[0].summary, "Bump requests");
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn analyze_caps_detail_fetches() {
        let commits = vec![
            make_commit("a1", "one", &["requirements.txt"]),
            make_commit("b2", "two", &["requirements.txt"]),
            make_commit("c3", "three", &["requirements.txt"]),
        ];
        let source = FlakySource::new(commits, &[]);
        let mut settings = settings();
        settings.max_commits = 2;

        let outcome = run_analyze(&settings, &source, None).unwrap();

        assert_eq!(*source.detail_calls.lock().unwrap(), 2);
        assert_eq!(outcome.commits.len(), 2);
    }

    #[test]
    fn analyze_skips_commits_with_failing_detail() {
        let commits = vec![
            make_commit("a1", "one", &["requirements.txt"]),
            make_commit("b2", "two", &["requirements.txt"]),
        ];
        let source = FlakySource::new(commits, &["a1"]);

        let outcome = run_analyze(&settings(), &source, None).unwrap();

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.commits.len(), 1);
        assert_eq!(outcome.commits[0].entry.commit.id, "b2");
    }

    #[test]
    fn analyze_compare_failure_is_fatal() {
        let source = FlakySource::new(vec![], &[]).failing_compare("GET /compare: HTTP 502");

        let err = run_analyze(&settings(), &source, None).unwrap_err();

        assert!(matches!(err, WatchError::ExternalService(_)));
    }

    #[test]
    fn analyze_prefers_service_summaries() {
        let source = StaticCommitSource::new(vec![make_commit(
            "a1",
            "chore: weekly lockfile refresh",
            &["poetry.lock"],
        )]);
        let summarizer = FixedSummarizer::new("Refreshes every pinned dependency");

        let outcome = run_analyze(&settings(), &source, Some(&summarizer)).unwrap();

        assert_eq!(outcome.commits[0].summary, "Refreshes every pinned dependency");
    }

    #[test]
    fn analyze_falls_back_to_title_when_summaries_fail() {
        let source = StaticCommitSource::new(vec![make_commit(
            "a1",
            "chore: weekly lockfile refresh",
            &["poetry.lock"],
        )]);

        let outcome = run_analyze(&settings(), &source, Some(&BrokenSummarizer)).unwrap();

        assert_eq!(outcome.commits[0].summary, "chore: weekly lockfile refresh");
    }

    #[test]
    fn analyze_rejects_an_invalid_pattern() {
        let source = StaticCommitSource::new(vec![]);
        let mut settings = settings();
        settings.patterns = vec!["requirements[".to_string()];

        let err = run_analyze(&settings, &source, None).unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
    }

    #[test]
    fn analyze_patches_dir_switches_to_exact_mode() {
        let td = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        std::fs::write(
            dir.join("pin.patch"),
            "--- a/requirements.txt\n+++ b/requirements.txt\n@@ -1 +1 @@\n-a\n+b\n",
        )
        .unwrap();

        // setup.py would match the builtin patterns but is not an exact target
        let source = StaticCommitSource::new(vec![
            make_commit("a1", "pin deps", &["requirements.txt"]),
            make_commit("b2", "new build", &["setup.py"]),
        ]);
        let mut settings = settings();
        settings.patches_dir = Some(dir);

        let outcome = run_analyze(&settings, &source, None).unwrap();

        assert_eq!(outcome.commits.len(), 1);
        assert_eq!(outcome.commits[0].entry.commit.id, "a1");
    }

    #[test]
    fn analyze_empty_exact_set_is_a_configuration_error() {
        let td = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        let source = StaticCommitSource::new(vec![]);
        let mut settings = settings();
        settings.patches_dir = Some(dir);

        let err = run_analyze(&settings, &source, None).unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
    }

    // validate

    #[derive(Default)]
    struct AppliedGit;

    impl GitClient for AppliedGit {
        fn clone_repo(&self, _: &RepoLocator, _: &Utf8Path) -> Result<()> {
            Ok(())
        }

        fn checkout(&self, _: &Utf8Path, _: &str) -> Result<()> {
            Ok(())
        }

        fn apply_patch(&self, _: &Utf8Path, _: &str) -> Result<ApplyOutcome> {
            Ok(ApplyOutcome::Applied { three_way: false })
        }

        fn reset_baseline(&self, _: &Utf8Path) -> Result<()> {
            Ok(())
        }

        fn read_file(&self, _: &Utf8Path, _: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn validate_settings(dir: &Utf8Path) -> ValidateSettings {
        ValidateSettings::new(RepoLocator::parse("psf/requests").unwrap(), dir)
    }

    #[test]
    fn validate_merges_parse_failures_with_apply_results() {
        let td = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        std::fs::write(dir.join("broken.patch"), "not a diff at all\n").unwrap();
        std::fs::write(
            dir.join("pin.patch"),
            "--- a/requirements.txt\n+++ b/requirements.txt\n@@ -1 +1 @@\n-a\n+b\n",
        )
        .unwrap();

        let outcome = run_validate(&validate_settings(&dir), &AppliedGit, None).unwrap();

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].patch, "broken.patch");
        assert!(!outcome.results[0].applied);
        assert_eq!(outcome.results[1].patch, "pin.patch");
        assert!(outcome.results[1].applied);
        assert!(!outcome.all_applied());
    }

    #[test]
    fn validate_empty_dir_is_a_configuration_error() {
        let td = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();

        let err = run_validate(&validate_settings(&dir), &AppliedGit, None).unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
    }

    #[test]
    fn validate_lists_alone_are_not_validatable() {
        let td = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
        std::fs::write(dir.join("tracked.txt"), "requirements.txt\n").unwrap();

        let err = run_validate(&validate_settings(&dir), &AppliedGit, None).unwrap_err();

        assert!(matches!(err, WatchError::Configuration(_)));
    }
}
