//! Brain module: LLM provider abstraction.
//!
//! Defines the `LlmProvider` trait for model-agnostic completions, the
//! retry policy applied on top of it, and a mock provider for tests.

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse, Message, TokenUsage};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::info;

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Perform a full completion and return the response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Return the model name.
    fn model_name(&self) -> &str;
}

/// Check if an LLM error is transient and should be retried.
pub fn is_retryable(error: &LlmError) -> bool {
    matches!(
        error,
        LlmError::RateLimited { .. } | LlmError::Timeout { .. } | LlmError::Connection { .. }
    )
}

/// Backoff before retry `attempt` (0-based): 1s, 2s, 4s, ..., capped at 32s.
/// Rate-limit hints from the provider are honored when longer.
pub fn backoff_secs(attempt: usize, error: &LlmError) -> u64 {
    let backoff = 1u64 << attempt.min(5);
    match error {
        LlmError::RateLimited { retry_after_secs } => (*retry_after_secs).max(backoff),
        _ => backoff,
    }
}

/// Send a completion request, retrying transient errors up to `max_retries` times.
///
/// Non-transient errors are returned immediately. With `max_retries == 0`
/// the first error is returned unchanged.
pub async fn complete_with_retry(
    provider: &dyn LlmProvider,
    request: CompletionRequest,
    max_retries: usize,
) -> Result<CompletionResponse, LlmError> {
    let mut attempt = 0;
    loop {
        match provider.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(e) if is_retryable(&e) && attempt < max_retries => {
                let wait = backoff_secs(attempt, &e);
                info!(
                    attempt = attempt + 1,
                    max_retries,
                    backoff_secs = wait,
                    error = %e,
                    "Retrying after transient error"
                );
                tokio::time::sleep(std::time::Duration::from_secs(wait)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A mock LLM provider for testing and development.
///
/// Returns queued outcomes in FIFO order and records every request it sees.
pub struct MockLlmProvider {
    model: String,
    outcomes: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_string(),
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that answers the given texts in order.
    pub fn with_responses<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let provider = Self::new();
        for text in texts {
            provider.queue_response(Self::text_response(text.as_ref()));
        }
        provider
    }

    /// Queue a response to be returned by the next `complete` call.
    pub fn queue_response(&self, response: CompletionResponse) {
        self.outcomes.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error to be returned by the next `complete` call.
    pub fn queue_error(&self, error: LlmError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Create a simple text response for testing.
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            message: Message::assistant(text),
            usage: TokenUsage {
                input_tokens: 100,
                output_tokens: 50,
            },
            model: "mock-model".to_string(),
            finish_reason: Some("stop".to_string()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        match self.outcomes.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(MockLlmProvider::text_response(
                "I'm a mock LLM. No queued responses available.",
            )),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
