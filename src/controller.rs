use std::time::Duration;

use reqwest::{Client as ReqwestClient, StatusCode};
use tokio::time::{timeout, Instant};
use tracing::warn;

use crate::api::models::{ErrorResponse, GenerationResult};
use crate::clipboard::Clipboard;
use crate::error::Error;

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK_TTL: Duration = Duration::from_millis(2_000);

/// The single per-request state value owned by the controller. Exactly one
/// variant is ever visible: a fresh result replaces an old error and a fresh
/// error replaces an old result.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    Success(GenerationResult),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request cycle ran to a terminal state.
    Completed,
    /// A request was already in flight; nothing was sent.
    IgnoredInFlight,
    /// The prompt was blank after trimming; nothing was sent.
    IgnoredEmptyPrompt,
}

/// HTTP client for the local proxy service.
pub struct ProxyClient {
    http: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: ReqwestClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<GenerationResult, Error> {
        let url = format!("{}/api/generate", self.base_url);
        let fut = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send();

        let response = timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::Transport("generation request timed out".to_string()))?
            .map_err(|err| {
                Error::Transport(format!("failed to reach generation service: {err}"))
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<GenerationResult>()
                .await
                .map_err(|err| Error::Upstream(format!("malformed generation result: {err}")));
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("generation service returned {status}"));

        if status == StatusCode::BAD_REQUEST {
            Err(Error::Validation(message))
        } else {
            Err(Error::Upstream(format!(
                "generation service returned {status}: {message}"
            )))
        }
    }
}

/// Transient "copied" acknowledgment. Deadline-based: a re-trigger simply
/// moves the deadline, so rapid repeats never overlap.
#[derive(Debug, Default)]
pub struct CopyAck {
    acked_until: Option<Instant>,
}

impl CopyAck {
    pub fn trigger(&mut self, now: Instant, ttl: Duration) {
        self.acked_until = Some(now + ttl);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.acked_until.is_some_and(|deadline| now < deadline)
    }
}

/// Drives one request/response cycle per user action against the proxy and
/// renders nothing itself; front-ends read `state()` back.
pub struct UiController {
    client: ProxyClient,
    clipboard: Box<dyn Clipboard>,
    state: SessionState,
    copy_ack: CopyAck,
    copy_ack_ttl: Duration,
}

impl UiController {
    pub fn new(client: ProxyClient, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            client,
            clipboard,
            state: SessionState::Idle,
            copy_ack: CopyAck::default(),
            copy_ack_ttl: COPY_ACK_TTL,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match &self.state {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Runs one generation cycle. Re-entry while a request is in flight and
    /// blank prompts are rejected before any network traffic happens.
    pub async fn submit(&mut self, prompt: &str) -> SubmitOutcome {
        if self.is_loading() {
            return SubmitOutcome::IgnoredInFlight;
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return SubmitOutcome::IgnoredEmptyPrompt;
        }

        self.state = SessionState::Loading;
        self.state = match self.client.generate(prompt).await {
            Ok(result) => SessionState::Success(result),
            Err(err) => SessionState::Failed(err.user_message()),
        };
        SubmitOutcome::Completed
    }

    /// Copies the current snippet to the clipboard. Failures are logged and
    /// leave the acknowledgment untouched.
    pub async fn copy_code(&mut self) {
        let SessionState::Success(result) = &self.state else {
            return;
        };
        let snippet = result.code_snippet.clone();

        match self.clipboard.copy(&snippet).await {
            Ok(()) => self.copy_ack.trigger(Instant::now(), self.copy_ack_ttl),
            Err(err) => warn!("failed to copy snippet: {err}"),
        }
    }

    pub fn copy_acknowledged(&self) -> bool {
        self.copy_ack.is_active(Instant::now())
    }

    #[cfg(test)]
    fn force_state(&mut self, state: SessionState) {
        self.state = state;
    }
}
