/*!
 * Translation orchestration for paragraph documents using AI providers.
 *
 * This module contains the core functionality for translating documents
 * using various AI providers. It is split into several submodules:
 *
 * - `core`: Translation service, unit scheduling and write-back
 * - `batch`: Pairing of paragraphs into translation units
 * - `prompts`: Prompt template and instruction context
 */

// Re-export main types for easier usage
pub use self::batch::{PARAGRAPH_SEPARATOR, TranslationUnit, partition_units};
pub use self::core::{
    TokenUsageStats, TranslationOptions, TranslationReport, TranslationService, UnitFailure,
};

// Re-export prompt types
pub use self::prompts::{InstructionContext, PromptTemplate};

// Submodules
pub mod batch;
pub mod core;
pub mod prompts;
