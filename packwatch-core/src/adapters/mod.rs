//! Production implementations of the port traits, plus in-memory fakes
//! for embedding and tests.

mod git;
mod github;
mod memory;
mod reasoning;

pub use git::ShellGit;
pub use github::GithubCommitSource;
pub use memory::{FixedSummarizer, StaticCommitSource};
pub use reasoning::ReasoningClient;

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, WatchError};

/// Re-run `op` on transient failures, doubling the pause between tries.
/// Only [`WatchError::ExternalService`] counts as transient; everything
/// else propagates on the first hit.
pub(crate) fn with_retries<T>(
    what: &str,
    tries: u32,
    mut op: impl FnMut() -> Result<T>,
) -> Result<T> {
    let mut delay = Duration::from_millis(500);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(WatchError::ExternalService(message)) if attempt < tries => {
                warn!(what, attempt, error = %message, "transient failure, backing off");
                thread::sleep(delay);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
