//! Reasoning-service client: commit summaries and diff regeneration over
//! an OpenAI-compatible chat-completions endpoint.

use packwatch_types::Commit;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::with_retries;
use crate::error::{Result, WatchError};
use crate::ports::{RegenerationService, Summarizer, TreeFile};
use crate::settings::{HttpSettings, ReasoningSettings};

const SUMMARY_SYSTEM: &str = "You review source-control commits for packaging impact. \
Reply with a single short line describing the change. No markdown, no preamble.";

const REGEN_SYSTEM: &str = "You repair unified diffs that no longer apply. \
Reply with only the corrected diff in unified format, no fences, no commentary. \
Keep the original intent of the patch.";

pub struct ReasoningClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    retries: u32,
}

impl ReasoningClient {
    /// `Ok(None)` when no endpoint is configured; the pipelines then run
    /// without summaries or regeneration.
    pub fn from_settings(
        http: &HttpSettings,
        reasoning: &ReasoningSettings,
    ) -> Result<Option<Self>> {
        let Some(endpoint) = &reasoning.endpoint else {
            return Ok(None);
        };
        let client = Client::builder()
            .user_agent(http.user_agent.clone())
            .timeout(http.timeout)
            .build()
            .map_err(|e| WatchError::Configuration(format!("build http client: {e}")))?;
        Ok(Some(Self {
            client,
            endpoint: endpoint.clone(),
            api_key: reasoning.api_key.clone(),
            model: reasoning.model.clone(),
            retries: http.retries,
        }))
    }

    fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };
        with_retries("reasoning service", self.retries, || {
            let mut request = self.client.post(&self.endpoint).json(&body);
            if let Some(key) = &self.api_key {
                request = request.header(AUTHORIZATION, format!("Bearer {key}"));
            }
            let response = request
                .send()
                .map_err(|e| WatchError::ExternalService(format!("POST {}: {e}", self.endpoint)))?;
            let status = response.status();
            if !status.is_success() {
                return Err(WatchError::ExternalService(format!(
                    "POST {}: HTTP {status}",
                    self.endpoint
                )));
            }
            let parsed: ChatResponse = response.json().map_err(|e| {
                WatchError::ExternalService(format!("decode reasoning response: {e}"))
            })?;
            let content = parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .unwrap_or_default();
            if content.trim().is_empty() {
                return Err(WatchError::ExternalService(
                    "reasoning service returned an empty completion".to_string(),
                ));
            }
            Ok(content)
        })
    }
}

impl Summarizer for ReasoningClient {
    fn summarize(&self, commit: &Commit) -> Result<String> {
        let mut prompt = format!("Commit message:\n{}\n\nChanged files:\n", commit.message);
        for file in &commit.files {
            prompt.push_str(&format!("- {} ({})\n", file.path, file.status.as_str()));
        }
        debug!(commit = commit.short_id(), "requesting summary");
        let completion = self.complete(SUMMARY_SYSTEM, &prompt)?;
        Ok(first_line(&completion))
    }
}

impl RegenerationService for ReasoningClient {
    fn regenerate(
        &self,
        original_diff: &str,
        diagnostics: &str,
        current_files: &[TreeFile],
    ) -> Result<String> {
        let prompt = regeneration_prompt(original_diff, diagnostics, current_files);
        let completion = self.complete(REGEN_SYSTEM, &prompt)?;
        let diff = strip_fences(&completion);
        if !diff.contains("--- ") || !diff.contains("+++ ") {
            return Err(WatchError::ExternalService(
                "reasoning service response does not look like a unified diff".to_string(),
            ));
        }
        let mut diff = diff.to_string();
        if !diff.ends_with('\n') {
            diff.push('\n');
        }
        Ok(diff)
    }
}

fn regeneration_prompt(
    original_diff: &str,
    diagnostics: &str,
    current_files: &[TreeFile],
) -> String {
    let mut prompt = String::from("This patch no longer applies:\n\n");
    prompt.push_str(original_diff);
    ensure_newline(&mut prompt);
    prompt.push_str("\ngit apply reported:\n\n");
    prompt.push_str(diagnostics);
    ensure_newline(&mut prompt);
    prompt.push_str("\nCurrent content of the files it touches:\n\n");
    for file in current_files {
        match &file.content {
            Some(content) => {
                prompt.push_str(&format!("==== {} ====\n", file.path));
                prompt.push_str(content);
                ensure_newline(&mut prompt);
            }
            None => {
                prompt.push_str(&format!("==== {} ==== (absent at this ref)\n", file.path));
            }
        }
    }
    prompt.push_str("\nProduce a corrected diff that applies to these files.\n");
    prompt
}

/// First non-blank line, trimmed. `complete` guarantees the text is not
/// all whitespace.
fn first_line(completion: &str) -> String {
    completion
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Models habitually wrap diffs in markdown fences despite instructions.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some((_info, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    let body = body.trim_end();
    match body.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => body,
    }
}

fn ensure_newline(text: &mut String) {
    if !text.ends_with('\n') {
        text.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_endpoint_means_no_client() {
        let client =
            ReasoningClient::from_settings(&HttpSettings::default(), &ReasoningSettings::default())
                .unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn chat_response_parses_the_first_choice() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "Pins urllib3"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Pins urllib3");
    }

    #[test]
    fn fences_are_stripped_with_and_without_info_string() {
        let fenced = "```diff\n--- a/f\n+++ b/f\n```";
        assert_eq!(strip_fences(fenced), "--- a/f\n+++ b/f");

        let bare = "```\n--- a/f\n+++ b/f\n```\n";
        assert_eq!(strip_fences(bare), "--- a/f\n+++ b/f");

        let plain = "--- a/f\n+++ b/f\n";
        assert_eq!(strip_fences(plain), "--- a/f\n+++ b/f");
    }

    #[test]
    fn unterminated_fence_still_yields_the_body() {
        let text = "```diff\n--- a/f\n+++ b/f\n";
        assert_eq!(strip_fences(text), "--- a/f\n+++ b/f");
    }

    #[test]
    fn first_line_skips_leading_blanks() {
        assert_eq!(first_line("\n\n  Pins urllib3  \nmore"), "Pins urllib3");
    }

    #[test]
    fn regeneration_prompt_marks_absent_files() {
        let files = vec![
            TreeFile {
                path: "requirements.txt".to_string(),
                content: Some("requests==2.32.0".to_string()),
            },
            TreeFile {
                path: "setup.py".to_string(),
                content: None,
            },
        ];
        let prompt = regeneration_prompt("--- a/f\n+++ b/f\n", "error: patch failed", &files);

        assert!(prompt.contains("==== requirements.txt ====\nrequests==2.32.0\n"));
        assert!(prompt.contains("==== setup.py ==== (absent at this ref)\n"));
        assert!(prompt.contains("git apply reported:\n\nerror: patch failed\n"));
    }
}
