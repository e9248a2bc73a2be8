use serde::{Deserialize, Serialize};

/// Phase of one validation run against the ephemeral working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Cloning,
    CheckedOut,
    Applying,
    Done,
}

/// Tagged per-patch state. Transitions:
///
/// `Applying -> Applied`
/// `Applying -> Regenerating(1) -> .. -> Regenerating(n) -> Applied | Exhausted`
///
/// `Applied` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchState {
    Applying,
    Applied,
    Regenerating { attempt: u32 },
    Exhausted,
}

impl PatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PatchState::Applied | PatchState::Exhausted)
    }
}

/// Outcome of a single regeneration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The regenerated diff applied cleanly.
    Applied,
    /// The regenerated diff was produced but did not apply.
    Rejected,
    /// The reasoning capability itself failed; counted as a failed attempt.
    ServiceError,
}

/// One regeneration attempt, recorded whether or not it succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerationAttempt {
    /// 1-based attempt number.
    pub attempt: u32,

    /// Diagnostic text that triggered this attempt, verbatim.
    pub prior_error: String,

    /// Candidate diff returned by the capability; empty when the call failed.
    #[serde(default)]
    pub regenerated_diff: String,

    pub outcome: AttemptOutcome,

    /// Diagnostic produced by this attempt (apply stderr or service error).
    #[serde(default)]
    pub diagnostics: String,
}

/// Terminal record for one patch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Patch identifier (its file name).
    pub patch: String,

    pub applied: bool,

    /// Diagnostic text from the first direct apply; empty when it succeeded.
    #[serde(default)]
    pub diagnostics: String,

    #[serde(default)]
    pub attempts: Vec<RegenerationAttempt>,
}

impl ValidationResult {
    pub fn success(patch: impl Into<String>) -> Self {
        Self {
            patch: patch.into(),
            applied: true,
            diagnostics: String::new(),
            attempts: vec![],
        }
    }

    pub fn failure(patch: impl Into<String>, diagnostics: impl Into<String>) -> Self {
        Self {
            patch: patch.into(),
            applied: false,
            diagnostics: diagnostics.into(),
            attempts: vec![],
        }
    }

    /// The original diagnostic plus every attempt's diagnostic, in order.
    pub fn diagnostic_chain(&self) -> Vec<&str> {
        let mut chain = Vec::with_capacity(1 + self.attempts.len());
        if !self.diagnostics.is_empty() {
            chain.push(self.diagnostics.as_str());
        }
        for attempt in &self.attempts {
            if !attempt.diagnostics.is_empty() {
                chain.push(attempt.diagnostics.as_str());
            }
        }
        chain
    }
}
