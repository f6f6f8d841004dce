use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::session::Session;

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// The tool pages and the endpoint each one posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Summary,
    Paragraph,
    Chatbot,
    JsConverter,
}

impl Tool {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Tool::Summary => "/api/v1/openai/summary",
            Tool::Paragraph => "/api/v1/openai/paragraph",
            Tool::Chatbot => "/api/v1/openai/chatbot",
            Tool::JsConverter => "/api/v1/openai/js-converter",
        }
    }
}

/// Lifecycle of one form submission. The submit affordance should be
/// disabled while `Submitting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Success(String),
    Failed(String),
}

/// Per-form request issuer. At most one logical request is tracked: a new
/// submission aborts the prior in-flight one instead of racing it, and a
/// generation counter keeps an aborted task's late writes from clobbering
/// the state of a newer submission.
pub struct FormIssuer {
    http: reqwest::Client,
    base_url: String,
    tool: Tool,
    session: Option<Session>,
    state: Arc<Mutex<FormState>>,
    generation: Arc<AtomicU64>,
    inflight: Option<JoinHandle<()>>,
    error_display: Duration,
}

impl FormIssuer {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: String,
        tool: Tool,
        session: Option<Session>,
    ) -> Self {
        Self {
            http,
            base_url,
            tool,
            session,
            state: Arc::new(Mutex::new(FormState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            inflight: None,
            error_display: ERROR_DISPLAY_DURATION,
        }
    }

    /// How long a `Failed` message stays on screen before clearing.
    pub fn with_error_display(mut self, duration: Duration) -> Self {
        self.error_display = duration;
        self
    }

    pub fn state(&self) -> FormState {
        self.state.lock().expect("form state lock").clone()
    }

    /// Submits the form. Empty input is a no-op (the form itself enforces
    /// the required field); otherwise any prior in-flight request is
    /// cancelled and a new one starts.
    pub fn submit(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.lock().expect("form state lock") = FormState::Submitting;

        let http = self.http.clone();
        let url = format!("{}{}", self.base_url, self.tool.endpoint());
        let token = self.session.as_ref().map(|s| s.token().to_string());
        let body = json!({ "text": text });
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let error_display = self.error_display;

        self.inflight = Some(tokio::spawn(async move {
            let mut request = http.post(&url).json(&body);
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let outcome = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    let raw = response.text().await.unwrap_or_default();
                    // The relay returns a bare JSON-encoded string.
                    let payload = serde_json::from_str::<String>(&raw).unwrap_or(raw);
                    FormState::Success(payload)
                }
                Ok(response) => {
                    let status = response.status();
                    let raw = response.text().await.unwrap_or_default();
                    log::warn!("submission to {url} failed with HTTP {status}");
                    FormState::Failed(extract_error_message(&raw, status))
                }
                Err(err) => {
                    log::warn!("submission to {url} failed: {err}");
                    FormState::Failed(err.to_string())
                }
            };

            let failed = matches!(outcome, FormState::Failed(_));
            if !store_if_current(&state, &current, generation, outcome) {
                return;
            }

            if failed {
                tokio::time::sleep(error_display).await;
                store_if_current(&state, &current, generation, FormState::Idle);
            }
        }));
    }
}

/// Writes `next` only when `generation` is still the newest submission.
fn store_if_current(
    state: &Mutex<FormState>,
    current: &AtomicU64,
    generation: u64,
    next: FormState,
) -> bool {
    let mut guard = state.lock().expect("form state lock");
    if current.load(Ordering::SeqCst) != generation {
        return false;
    }
    *guard = next;
    true
}

impl Drop for FormIssuer {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

/// Pulls a human-readable message out of an error body: `message` field,
/// then `error` (string or object with `message`), then the raw body, then
/// the status line.
fn extract_error_message(raw: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
        if let Some(message) = value["message"].as_str() {
            return message.to_string();
        }
        if let Some(message) = value["error"].as_str() {
            return message.to_string();
        }
        if let Some(message) = value["error"]["message"].as_str() {
            return message.to_string();
        }
    }
    if !raw.trim().is_empty() {
        return raw.trim().to_string();
    }
    format!("HTTP {status}")
}
