use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{AppConfig, NarrativeEndpoint};
use crate::http_client::http_client;
use crate::persist;

const LOG_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    pub event_id: u32,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent,
    Saved,
    Failed,
}

/// Where goal prompts go: a remote text-generation endpoint, or a local file.
#[derive(Debug, Clone)]
pub enum Dispatcher {
    Remote(NarrativeEndpoint),
    Local { payloads_path: PathBuf },
}

impl Dispatcher {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.endpoint {
            Some(endpoint) => Dispatcher::Remote(endpoint.clone()),
            None => Dispatcher::Local {
                payloads_path: config.payloads_path.clone(),
            },
        }
    }

    /// Never fails: problems are logged and the caller moves on to the next goal.
    pub fn dispatch(&self, event_id: u32, prompt: &str) -> DispatchOutcome {
        match self {
            Dispatcher::Remote(endpoint) => match send_prompt(endpoint, prompt) {
                Ok(body) => {
                    info!(
                        "narrative response for event {event_id} (truncated): {}",
                        preview(&body)
                    );
                    DispatchOutcome::Sent
                }
                Err(err) => {
                    warn!("failed to call narrative endpoint for event {event_id}: {err:#}");
                    DispatchOutcome::Failed
                }
            },
            Dispatcher::Local { payloads_path } => {
                match save_prompt_payload(payloads_path, event_id, prompt) {
                    Ok(_) => {
                        info!(
                            "saved prompt for event {event_id} to {}",
                            payloads_path.display()
                        );
                        DispatchOutcome::Saved
                    }
                    Err(err) => {
                        warn!("failed to save prompt for event {event_id}: {err:#}");
                        DispatchOutcome::Failed
                    }
                }
            }
        }
    }
}

/// POSTs `{"prompt": ...}` with bearer auth and returns the raw response body.
pub fn send_prompt(endpoint: &NarrativeEndpoint, prompt: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client
        .post(&endpoint.url)
        .header(AUTHORIZATION, format!("Bearer {}", endpoint.api_key))
        .header(CONTENT_TYPE, "application/json")
        .json(&serde_json::json!({ "prompt": prompt }))
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, preview(&body)));
    }
    Ok(body)
}

/// Best-effort extraction of generated text from the endpoint's reply.
pub fn response_text(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    let candidate = value
        .pointer("/candidates/0/content/parts/0/text")
        .or_else(|| value.get("text"))
        .or_else(|| value.get("response"))
        .or_else(|| value.get("output"))
        .and_then(Value::as_str);
    match candidate {
        Some(text) => text.trim().to_string(),
        None => body.trim().to_string(),
    }
}

/// Appends to a JSON array on disk. A missing file starts a new array; an
/// unreadable one is left alone.
pub fn save_prompt_payload(path: &Path, event_id: u32, prompt: &str) -> Result<usize> {
    let mut entries: Vec<PromptPayload> = if path.exists() {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?
    } else {
        Vec::new()
    };
    entries.push(PromptPayload {
        event_id,
        prompt: prompt.to_string(),
    });
    persist::write_json_pretty(path, &entries)?;
    Ok(entries.len())
}

fn preview(body: &str) -> String {
    body.chars().take(LOG_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_dispatch_appends_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gemini_payloads.json");
        let dispatcher = Dispatcher::Local {
            payloads_path: path.clone(),
        };
        assert_eq!(dispatcher.dispatch(300, "first"), DispatchOutcome::Saved);
        assert_eq!(dispatcher.dispatch(301, "second"), DispatchOutcome::Saved);

        let saved: Vec<PromptPayload> = persist::read_json(&path).expect("read back");
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].event_id, 301);
        assert_eq!(saved[1].prompt, "second");
    }

    #[test]
    fn corrupt_payload_file_is_not_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gemini_payloads.json");
        fs::write(&path, "{not json").expect("write");
        let dispatcher = Dispatcher::Local {
            payloads_path: path.clone(),
        };
        assert_eq!(dispatcher.dispatch(300, "p"), DispatchOutcome::Failed);
        assert_eq!(fs::read_to_string(&path).expect("read"), "{not json");
    }

    #[test]
    fn unreachable_endpoint_is_reported_not_raised() {
        let dispatcher = Dispatcher::Remote(NarrativeEndpoint {
            url: "http://127.0.0.1:9/generate".to_string(),
            api_key: "test".to_string(),
        });
        assert_eq!(dispatcher.dispatch(300, "p"), DispatchOutcome::Failed);
    }

    #[test]
    fn extracts_text_from_common_reply_shapes() {
        let gemini = r#"{"candidates":[{"content":{"parts":[{"text":" Great goal. "}]}}]}"#;
        assert_eq!(response_text(gemini), "Great goal.");
        assert_eq!(response_text(r#"{"text":"a"}"#), "a");
        assert_eq!(response_text(r#"{"response":"b"}"#), "b");
        assert_eq!(response_text("plain words"), "plain words");
        assert_eq!(response_text(r#"{"other":1}"#), r#"{"other":1}"#);
    }
}
