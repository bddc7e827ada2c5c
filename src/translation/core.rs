/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its implementation,
 * which drives one backend call per translation unit and writes the results back
 * into the document.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::pin::pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::document::{self, Document};
use crate::errors::{AppError, TranslationError};
use crate::providers::{self, Provider};

use super::batch::{TranslationUnit, partition_units};
use super::prompts::InstructionContext;

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Total number of tokens
    pub total_tokens: u64,

    /// Start time of token tracking
    pub start_time: Instant,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl Default for TokenUsageStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenUsageStats {
    /// Create a new empty token usage stats instance
    pub fn new() -> Self {
        Self::with_provider_info(String::new(), String::new())
    }

    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            start_time: Instant::now(),
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    /// Add token usage numbers reported by one call
    pub fn add_token_usage(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>) {
        if let Some(pt) = prompt_tokens {
            self.prompt_tokens += pt;
            self.total_tokens += pt;
        }

        if let Some(ct) = completion_tokens {
            self.completion_tokens += ct;
            self.total_tokens += ct;
        }
    }

    /// Calculate tokens per minute rate
    pub fn tokens_per_minute(&self) -> f64 {
        // Use the API duration for rate calculation, with fallback to elapsed time
        let duration_minutes = if self.api_duration.as_secs_f64() > 0.0 {
            self.api_duration.as_secs_f64() / 60.0
        } else {
            self.start_time.elapsed().as_secs_f64() / 60.0
        };

        if duration_minutes > 0.0 {
            self.total_tokens as f64 / duration_minutes
        } else {
            0.0
        }
    }

    /// Generate a summary of token usage
    pub fn summary(&self) -> String {
        let elapsed_minutes = self.start_time.elapsed().as_secs_f64() / 60.0;
        let api_minutes = self.api_duration.as_secs_f64() / 60.0;

        format!(
            "Token Usage Summary:\n\
             Provider: {}\n\
             Model: {}\n\
             Prompt tokens: {}\n\
             Completion tokens: {}\n\
             Total tokens: {}\n\
             Elapsed time: {:.2} minutes\n\
             API request time: {:.2} minutes\n\
             Tokens per minute: {:.2}",
            self.provider,
            self.model,
            self.prompt_tokens,
            self.completion_tokens,
            self.total_tokens,
            elapsed_minutes,
            api_minutes,
            self.tokens_per_minute()
        )
    }
}

/// A unit whose backend call failed
#[derive(Debug, Clone, PartialEq)]
pub struct UnitFailure {
    /// Index of the unit in document order
    pub unit_index: usize,
    /// Element positions left with their source text
    pub positions: Vec<usize>,
    /// Error reported by the backend
    pub error: String,
}

/// Outcome of translating one document
#[derive(Debug, Clone, Default)]
pub struct TranslationReport {
    /// Units sent to the backend
    pub units_total: usize,
    /// Units whose text was written back
    pub units_translated: usize,
    /// Pair units left untouched because the response did not split in two
    pub split_mismatches: usize,
    /// Units whose backend call failed
    pub failures: Vec<UnitFailure>,
    /// Tokens consumed across all calls
    pub token_usage: TokenUsageStats,
}

impl TranslationReport {
    /// True when there was work to do and every backend call failed
    pub fn is_total_failure(&self) -> bool {
        self.units_total > 0 && self.failures.len() == self.units_total
    }

    /// Turn a total failure into an error
    pub fn ensure_not_total_failure(&self) -> Result<(), TranslationError> {
        if self.is_total_failure() {
            return Err(TranslationError::AllUnitsFailed { units: self.units_total });
        }
        Ok(())
    }

    /// Units left with their source text for any reason
    pub fn units_untranslated(&self) -> usize {
        self.units_total - self.units_translated
    }
}

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum number of backend calls in flight
    pub max_concurrent_requests: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 1,
        }
    }
}

/// Main translation service for document translation
#[derive(Debug, Clone)]
pub struct TranslationService {
    /// Backend every unit is sent to
    provider: Arc<dyn Provider>,

    /// Translation options
    pub options: TranslationOptions,
}

impl TranslationService {
    /// Create a new translation service around a backend
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            options: TranslationOptions::default(),
        }
    }

    /// Create a new translation service with the configured backend and concurrency
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(providers::from_config(config)).with_options(TranslationOptions {
            max_concurrent_requests: config.common.concurrent_requests,
        })
    }

    /// Replace the translation options
    pub fn with_options(mut self, options: TranslationOptions) -> Self {
        self.options = options;
        self
    }

    /// Backend used by this service
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), AppError> {
        info!("Testing connection to {} with model {}", self.provider.name(), self.provider.model());
        self.provider.test_connection().await?;
        Ok(())
    }

    /// Translate a document in place
    pub async fn translate_document(&self, document: &mut Document, context: &InstructionContext) -> TranslationReport {
        self.translate_document_with_progress(document, context, |_, _| {}).await
    }

    /// Translate a document in place, reporting `(completed, total)` units after each one
    ///
    /// Backend failures and unsplittable pair responses leave the affected
    /// paragraphs with their source text; they never abort the document.
    pub async fn translate_document_with_progress(
        &self,
        document: &mut Document,
        context: &InstructionContext,
        progress_callback: impl Fn(usize, usize),
    ) -> TranslationReport {
        let system_instruction = context.system_instruction();
        debug!("System instruction: {}", system_instruction);

        let units = partition_units(&document.translatable_positions());
        let inputs: Vec<String> = {
            let snapshot: &Document = document;
            units
                .iter()
                .map(|unit| unit.input_text(|p| snapshot.element(p).map_or("", |e| e.text())))
                .collect()
        };

        let mut report = TranslationReport {
            units_total: units.len(),
            token_usage: TokenUsageStats::with_provider_info(
                self.provider.name().to_string(),
                self.provider.model().to_string(),
            ),
            ..Default::default()
        };

        let concurrency = self.options.max_concurrent_requests.max(1);
        info!(
            "Translating {} paragraphs in {} units ({} concurrent)",
            document.translatable_positions().len(),
            units.len(),
            concurrency
        );

        let provider = &self.provider;
        let system_instruction = &system_instruction;

        // buffered() yields in unit order whatever the completion order
        let mut results = pin!(
            stream::iter(inputs.into_iter().enumerate())
                .map(|(unit_index, input)| async move {
                    let started = Instant::now();
                    let outcome = provider.complete(system_instruction, &input).await;
                    (unit_index, outcome, started.elapsed())
                })
                .buffered(concurrency)
        );

        while let Some((unit_index, outcome, elapsed)) = results.next().await {
            let unit = units[unit_index];
            report.token_usage.api_duration += elapsed;

            match outcome {
                Ok(completion) => {
                    report
                        .token_usage
                        .add_token_usage(completion.prompt_tokens, completion.completion_tokens);

                    match unit.split_response(&completion.text) {
                        Ok(parts) => {
                            write_back(document, &unit, parts);
                            report.units_translated += 1;
                        }
                        Err(e) => {
                            warn!(
                                "Unit {} (paragraphs {:?}) left untranslated: {}",
                                unit_index + 1,
                                unit.positions(),
                                e
                            );
                            report.split_mismatches += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        "Unit {} (paragraphs {:?}) failed, keeping source text: {}",
                        unit_index + 1,
                        unit.positions(),
                        e
                    );
                    report.failures.push(UnitFailure {
                        unit_index,
                        positions: unit.positions(),
                        error: e.to_string(),
                    });
                }
            }

            progress_callback(unit_index + 1, report.units_total);
        }

        info!(
            "Translated {}/{} units ({} split mismatches, {} failures, {} tokens)",
            report.units_translated,
            report.units_total,
            report.split_mismatches,
            report.failures.len(),
            report.token_usage.total_tokens
        );

        report
    }

    /// Translate a `.docx` byte stream and return the rewritten bytes
    pub async fn translate_docx(
        &self,
        raw_document_bytes: &[u8],
        context: &InstructionContext,
    ) -> Result<(Vec<u8>, TranslationReport), AppError> {
        self.translate_docx_with_progress(raw_document_bytes, context, |_, _| {}).await
    }

    /// Translate a `.docx` byte stream with progress reporting
    ///
    /// Fails when the input cannot be parsed, when the output cannot be
    /// written, or when every unit's backend call failed.
    pub async fn translate_docx_with_progress(
        &self,
        raw_document_bytes: &[u8],
        context: &InstructionContext,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<(Vec<u8>, TranslationReport), AppError> {
        let mut docx = document::extract(raw_document_bytes)?;

        let report = self
            .translate_document_with_progress(docx.document_mut(), context, progress_callback)
            .await;
        report.ensure_not_total_failure()?;

        let bytes = docx.to_bytes()?;
        Ok((bytes, report))
    }
}

/// Assign each part to its paragraph, in order
fn write_back(document: &mut Document, unit: &TranslationUnit, parts: Vec<String>) {
    for (position, text) in unit.positions().into_iter().zip(parts) {
        if let Some(element) = document.element_mut(position) {
            element.set_text(text);
        }
    }
}
