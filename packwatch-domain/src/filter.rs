//! Commit filtering against the monitored path set.

use crate::matcher::MonitoredPathSpec;
use packwatch_types::{Commit, MatchedCommit, MatchedFile};
use tracing::debug;

/// Keeps the commits whose changed files intersect the monitored set.
#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    monitored: MonitoredPathSpec,
}

impl CommitFilter {
    pub fn new(monitored: MonitoredPathSpec) -> Self {
        Self { monitored }
    }

    pub fn monitored(&self) -> &MonitoredPathSpec {
        &self.monitored
    }

    /// The changed files of `commit` that hit the monitored set, in commit
    /// order.
    pub fn matched_files(&self, commit: &Commit) -> Vec<MatchedFile> {
        commit
            .files
            .iter()
            .filter(|f| self.monitored.matches(&f.path))
            .map(|f| MatchedFile {
                path: f.path.clone(),
                status: f.status,
            })
            .collect()
    }

    /// A commit is kept iff at least one changed file matched. Upstream
    /// ordering is preserved.
    pub fn filter(&self, commits: Vec<Commit>) -> Vec<MatchedCommit> {
        let total = commits.len();
        let mut kept = Vec::new();
        for commit in commits {
            let matched = self.matched_files(&commit);
            if matched.is_empty() {
                continue;
            }
            kept.push(MatchedCommit { commit, matched });
        }
        debug!(total, kept = kept.len(), "filtered commits");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packwatch_types::{ChangedFile, FileStatus};
    use pretty_assertions::assert_eq;

    fn commit(id: &str, paths: &[&str]) -> Commit {
        Commit {
            id: id.to_string(),
            message: format!("commit {id}"),
            author: None,
            timestamp: None,
            url: None,
            files: paths
                .iter()
                .map(|p| ChangedFile {
                    path: p.to_string(),
                    status: FileStatus::Modified,
                    additions: 1,
                    deletions: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn keeps_only_commits_touching_monitored_paths() {
        let filter = CommitFilter::new(MonitoredPathSpec::default_patterns());
        let commits = vec![
            commit("aaa", &["src/lib.py", "README.md"]),
            commit("bbb", &["requirements.txt"]),
            commit("ccc", &["docs/guide.md"]),
        ];

        let kept = filter.filter(commits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit.id, "bbb");
    }

    #[test]
    fn preserves_upstream_commit_order() {
        let filter = CommitFilter::new(MonitoredPathSpec::default_patterns());
        let commits = vec![
            commit("ccc", &["setup.py"]),
            commit("aaa", &["pyproject.toml"]),
            commit("bbb", &["Dockerfile"]),
        ];

        let ids: Vec<String> = filter
            .filter(commits)
            .into_iter()
            .map(|m| m.commit.id)
            .collect();
        assert_eq!(ids, vec!["ccc", "aaa", "bbb"]);
    }

    #[test]
    fn records_the_matched_subset_in_commit_order() {
        let filter = CommitFilter::new(MonitoredPathSpec::default_patterns());
        let commits = vec![commit(
            "abc",
            &["setup.py", "src/app.py", "requirements/dev.txt"],
        )];

        let kept = filter.filter(commits);
        let paths: Vec<&str> = kept[0].matched.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["setup.py", "requirements/dev.txt"]);
    }

    #[test]
    fn exact_spec_ignores_basename_coincidences() {
        let filter = CommitFilter::new(MonitoredPathSpec::exact(vec![
            "pkg/requirements.txt".to_string(),
        ]));
        let commits = vec![
            commit("aaa", &["requirements.txt"]),
            commit("bbb", &["pkg/requirements.txt"]),
        ];

        let kept = filter.filter(commits);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].commit.id, "bbb");
    }

    #[test]
    fn commit_without_files_is_dropped() {
        let filter = CommitFilter::new(MonitoredPathSpec::default_patterns());
        let kept = filter.filter(vec![commit("aaa", &[])]);
        assert!(kept.is_empty());
    }
}
