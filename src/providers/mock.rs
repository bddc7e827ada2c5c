/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, tagging every paragraph it receives
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 *
 * Replies can also be scripted per user text with `with_reply` and `with_failure`,
 * and individual calls slowed down with `with_delay`.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{Completion, Provider};

/// Prefix the working mock puts in front of every paragraph
pub const TRANSLATED_PREFIX: &str = "[TRANSLATED] ";

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// System instruction sent with the call
    pub system_instruction: String,
    /// User text sent with the call
    pub user_text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, prefixing each paragraph of the input
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for ordering and timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Scripted outcomes keyed by exact user text
    scripted: Arc<HashMap<String, Result<String, ProviderError>>>,
    /// Extra latency in milliseconds keyed by exact user text
    delays: Arc<HashMap<String, u64>>,
    /// Calls received so far
    requests: Arc<Mutex<Vec<MockRequest>>>,
    /// User texts of finished calls, in completion order
    completed: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            scripted: Arc::new(HashMap::new()),
            delays: Arc::new(HashMap::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
            completed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a working mock provider that waits before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Answer `user_text` with `reply` regardless of behavior
    pub fn with_reply(mut self, user_text: impl Into<String>, reply: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.scripted).insert(user_text.into(), Ok(reply.into()));
        self
    }

    /// Fail calls for `user_text` regardless of behavior
    pub fn with_failure(mut self, user_text: impl Into<String>, error: ProviderError) -> Self {
        Arc::make_mut(&mut self.scripted).insert(user_text.into(), Err(error));
        self
    }

    /// Wait `delay_ms` before answering `user_text`
    pub fn with_delay(mut self, user_text: impl Into<String>, delay_ms: u64) -> Self {
        Arc::make_mut(&mut self.delays).insert(user_text.into(), delay_ms);
        self
    }

    /// Number of calls received, shared across clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Calls received, in arrival order
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// User texts of finished calls, in completion order
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Default translation: prefix each paragraph and keep the separator
    pub fn tag_paragraphs(user_text: &str) -> String {
        user_text
            .split("\n\n")
            .map(|part| format!("{}{}", TRANSLATED_PREFIX, part))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn completion(user_text: &str, text: String) -> Completion {
        Completion {
            prompt_tokens: Some(user_text.len() as u64),
            completion_tokens: Some(text.len() as u64 / 2),
            text,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, system_instruction: &str, user_text: &str) -> Result<Completion, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(MockRequest {
                system_instruction: system_instruction.to_string(),
                user_text: user_text.to_string(),
            });
        }

        let mut delay_ms = self.delays.get(user_text).copied().unwrap_or(0);
        if let MockBehavior::Slow { delay_ms: base } = self.behavior {
            delay_ms += base;
        }
        if delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
        }
        if let Ok(mut completed) = self.completed.lock() {
            completed.push(user_text.to_string());
        }

        if let Some(outcome) = self.scripted.get(user_text) {
            return outcome.clone().map(|text| Self::completion(user_text, text));
        }

        match self.behavior {
            MockBehavior::Working | MockBehavior::Slow { .. } => {
                Ok(Self::completion(user_text, Self::tag_paragraphs(user_text)))
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::completion(user_text, Self::tag_paragraphs(user_text)))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
