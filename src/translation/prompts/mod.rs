/*!
 * Prompt construction for document translation.
 *
 * This module provides:
 * - The system prompt template for paragraph translation
 * - The per-document instruction context the template is rendered from
 */

pub mod templates;

// Re-export main types
pub use templates::{InstructionContext, PromptTemplate};
