//! Bounded recovery of rejected patches through the reasoning service.

use camino::Utf8Path;
use packwatch_types::{
    AttemptOutcome, PatchFile, PatchState, RegenerationAttempt, ValidationResult,
};
use tracing::{debug, info, warn};

use crate::error::{Result, WatchError};
use crate::ports::{ApplyOutcome, GitClient, RegenerationService, TreeFile};

/// Drives the `Regenerating(n)` part of a patch's lifecycle.
///
/// Every attempt has the same shape: restore the baseline tree, snapshot the
/// files the diff touches, ask the service for a replacement, and re-apply
/// it. The service's output is only believed once `git apply` accepts it.
pub struct PatchRegenerator<'a> {
    git: &'a dyn GitClient,
    service: &'a dyn RegenerationService,
    attempts: u32,
}

impl<'a> PatchRegenerator<'a> {
    pub fn new(
        git: &'a dyn GitClient,
        service: &'a dyn RegenerationService,
        attempts: u32,
    ) -> Self {
        Self {
            git,
            service,
            attempts,
        }
    }

    /// Recover `patch` after its direct apply rejected with
    /// `initial_diagnostics`. Returns the terminal result either way; a
    /// service outage during an attempt is recorded, not escalated.
    pub fn recover(
        &self,
        workdir: &Utf8Path,
        patch: &PatchFile,
        initial_diagnostics: String,
    ) -> Result<ValidationResult> {
        let mut attempts = Vec::new();
        let mut prior_error = initial_diagnostics.clone();

        for attempt in 1..=self.attempts {
            let state = PatchState::Regenerating { attempt };
            debug!(patch = %patch.name, ?state, "regenerating rejected patch");

            // The previous attempt may have left three-way conflict markers.
            self.git.reset_baseline(workdir)?;
            let current_files = self.snapshot_targets(workdir, patch)?;

            let candidate = match self.service.regenerate(&patch.raw, &prior_error, &current_files)
            {
                Ok(diff) => diff,
                Err(WatchError::ExternalService(message)) => {
                    warn!(
                        patch = %patch.name,
                        attempt,
                        error = %message,
                        "regeneration service unavailable"
                    );
                    attempts.push(RegenerationAttempt {
                        attempt,
                        prior_error: prior_error.clone(),
                        regenerated_diff: String::new(),
                        outcome: AttemptOutcome::ServiceError,
                        diagnostics: message,
                    });
                    continue;
                }
                Err(other) => return Err(other),
            };

            match self.git.apply_patch(workdir, &candidate)? {
                ApplyOutcome::Applied { three_way } => {
                    info!(patch = %patch.name, attempt, three_way, "regenerated patch applied");
                    attempts.push(RegenerationAttempt {
                        attempt,
                        prior_error: prior_error.clone(),
                        regenerated_diff: candidate,
                        outcome: AttemptOutcome::Applied,
                        diagnostics: String::new(),
                    });
                    return Ok(ValidationResult {
                        patch: patch.name.clone(),
                        applied: true,
                        diagnostics: initial_diagnostics,
                        attempts,
                    });
                }
                ApplyOutcome::Rejected { diagnostics } => {
                    debug!(patch = %patch.name, attempt, "regenerated patch still rejected");
                    attempts.push(RegenerationAttempt {
                        attempt,
                        prior_error: prior_error.clone(),
                        regenerated_diff: candidate,
                        outcome: AttemptOutcome::Rejected,
                        diagnostics: diagnostics.clone(),
                    });
                    prior_error = diagnostics;
                }
            }
        }

        debug!(patch = %patch.name, state = ?PatchState::Exhausted, "regeneration budget spent");
        Ok(ValidationResult {
            patch: patch.name.clone(),
            applied: false,
            diagnostics: initial_diagnostics,
            attempts,
        })
    }

    fn snapshot_targets(&self, workdir: &Utf8Path, patch: &PatchFile) -> Result<Vec<TreeFile>> {
        let mut files = Vec::with_capacity(patch.target_paths.len());
        for path in &patch.target_paths {
            let content = self.git.read_file(workdir, path)?;
            files.push(TreeFile {
                path: path.clone(),
                content,
            });
        }
        Ok(files)
    }
}
