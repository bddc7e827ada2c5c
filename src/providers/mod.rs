/*!
 * Provider implementations for different translation backends.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: chat completions API
 * - Anthropic: messages API
 * - Ollama: local LLM server
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;

/// Text produced by a backend for one call, with token accounting when reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Generated text
    pub text: String,
    /// Prompt tokens consumed
    pub prompt_tokens: Option<u64>,
    /// Completion tokens produced
    pub completion_tokens: Option<u64>,
}

impl Completion {
    /// Completion carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Run one completion with a system instruction and the user text
    ///
    /// # Arguments
    /// * `system_instruction` - Instruction framing the call
    /// * `user_text` - Text to work on
    ///
    /// # Returns
    /// * `Result<Completion, ProviderError>` - The generated text or an error
    async fn complete(&self, system_instruction: &str, user_text: &str) -> Result<Completion, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete("Reply with the single word OK.", "Hello").await.map(|_| ())
    }

    /// Short provider identifier for logs
    fn name(&self) -> &str;

    /// Model used for completions
    fn model(&self) -> &str;
}

/// Build the HTTP client shared by the hosted providers
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Instantiate the configured provider
pub fn from_config(config: &TranslationConfig) -> Arc<dyn Provider> {
    let model = config.get_model();
    let endpoint = config.get_endpoint();
    let timeout_secs = config.get_timeout_secs();
    let temperature = config.common.temperature;

    match config.provider {
        TranslationProvider::OpenAI => Arc::new(
            openai::OpenAI::new(config.get_api_key(), endpoint, model, timeout_secs)
                .with_temperature(temperature),
        ),
        TranslationProvider::Anthropic => Arc::new(
            anthropic::Anthropic::new(config.get_api_key(), endpoint, model, timeout_secs)
                .with_temperature(temperature),
        ),
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::new(endpoint, model, timeout_secs).with_temperature(temperature),
        ),
    }
}
