use serde::{Deserialize, Serialize};

/// The fixed machine-readable failure document.
///
/// Exactly two keys; `content` carries the multi-line human diagnostic text
/// verbatim so ticketing and alerting systems can file it unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub title: String,
    pub content: String,
}

impl IssueReport {
    /// Build the patch-failure document for a repository and ref.
    pub fn patch_failure(slug: &str, reference: &str, content: String) -> Self {
        Self {
            title: format!("Failed to apply patches {slug} for '{reference}'"),
            content,
        }
    }
}
