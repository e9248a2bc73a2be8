//! Clone, checkout, and per-patch apply orchestration.

use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use packwatch_types::{PatchFile, PatchState, RepoLocator, RunPhase, ValidationResult};
use tracing::{debug, info, warn};

use crate::error::{Result, WatchError};
use crate::ports::{ApplyOutcome, GitClient, RegenerationService};
use crate::regen::PatchRegenerator;

/// Validates maintained patches against one checked-out reference.
///
/// The working tree lives in a temporary directory that is discarded when
/// the run ends, success or not. Patches are tried strictly in order, each
/// against the pristine baseline.
pub struct PatchValidator<'a> {
    git: &'a dyn GitClient,
    service: Option<&'a dyn RegenerationService>,
    regen_attempts: u32,
}

impl<'a> PatchValidator<'a> {
    pub fn new(
        git: &'a dyn GitClient,
        service: Option<&'a dyn RegenerationService>,
        regen_attempts: u32,
    ) -> Self {
        Self {
            git,
            service,
            regen_attempts,
        }
    }

    /// Clone `locator`, check out `reference`, and try every patch in order.
    ///
    /// Per-patch failures land in the returned results; only infrastructure
    /// failures (workspace setup, clone, checkout, reset) are errors.
    pub fn validate(
        &self,
        locator: &RepoLocator,
        reference: &str,
        patches: &[PatchFile],
    ) -> Result<Vec<ValidationResult>> {
        let workspace = tempfile::tempdir()
            .map_err(|e| WatchError::Internal(anyhow!("create validation workspace: {e}")))?;
        let workdir = Utf8PathBuf::from_path_buf(workspace.path().join("repo"))
            .map_err(|p| WatchError::Internal(anyhow!("non-UTF-8 workspace {}", p.display())))?;

        let mut phase = RunPhase::Cloning;
        debug!(?phase, repo = %locator.slug(), "cloning into ephemeral workspace");
        self.git.clone_repo(locator, &workdir)?;

        phase = RunPhase::CheckedOut;
        self.git.checkout(&workdir, reference)?;
        debug!(?phase, reference, "checked out validation target");

        phase = RunPhase::Applying;
        debug!(?phase, patches = patches.len(), "validating patches");
        let mut results = Vec::with_capacity(patches.len());
        for patch in patches {
            results.push(self.validate_one(&workdir, patch)?);
            // Leave a clean tree for the next patch.
            self.git.reset_baseline(&workdir)?;
        }

        phase = RunPhase::Done;
        let applied = results.iter().filter(|r| r.applied).count();
        info!(
            ?phase,
            applied,
            failed = results.len() - applied,
            "validation run finished"
        );
        Ok(results)
    }

    fn validate_one(&self, workdir: &Utf8Path, patch: &PatchFile) -> Result<ValidationResult> {
        debug!(patch = %patch.name, state = ?PatchState::Applying, "applying patch");
        match self.git.apply_patch(workdir, &patch.raw)? {
            ApplyOutcome::Applied { three_way } => {
                info!(patch = %patch.name, three_way, state = ?PatchState::Applied, "patch applied");
                Ok(ValidationResult::success(&patch.name))
            }
            ApplyOutcome::Rejected { diagnostics } => {
                warn!(patch = %patch.name, "patch rejected");
                match self.service {
                    Some(service) if self.regen_attempts > 0 => {
                        PatchRegenerator::new(self.git, service, self.regen_attempts)
                            .recover(workdir, patch, diagnostics)
                    }
                    _ => {
                        debug!(
                            patch = %patch.name,
                            state = ?PatchState::Exhausted,
                            "no regeneration available"
                        );
                        Ok(ValidationResult::failure(&patch.name, diagnostics))
                    }
                }
            }
        }
    }
}
