/*!
 * Prompt templates for document translation.
 *
 * One system instruction is rendered per document and sent unchanged with
 * every unit of that document.
 */

use crate::language_utils;

/// System prompt template for paragraph translation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for document translation.
    pub const DOCUMENT_TRANSLATOR: &'static str = "You are a professional translator with expertise in translating {doc_type} texts from {source_language} to {target_language}. {specific_instructions} Now, translate the following:";

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default document translator template.
    pub fn document_translator() -> Self {
        Self::new(Self::DOCUMENT_TRANSLATOR)
    }

    /// Render the template with the given variables.
    ///
    /// Placeholders are substituted in one pass over the template, so values
    /// are inserted as given even when they contain braces. Blank instructions
    /// drop their placeholder together with the space before it.
    pub fn render(&self, doc_type: &str, source_language: &str, target_language: &str, specific_instructions: &str) -> String {
        let template = if specific_instructions.trim().is_empty() {
            self.template.replace(" {specific_instructions}", "")
        } else {
            self.template.clone()
        };

        let mut rendered = String::with_capacity(template.len() + specific_instructions.len());
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open..];
            let Some(close) = after.find('}') else {
                rest = after;
                break;
            };
            let value = match &after[1..close] {
                "doc_type" => Some(doc_type),
                "source_language" => Some(source_language),
                "target_language" => Some(target_language),
                "specific_instructions" => Some(specific_instructions),
                _ => None,
            };
            match value {
                Some(value) => {
                    rendered.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = &after[1..];
                }
            }
        }
        rendered.push_str(rest);
        rendered
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::document_translator()
    }
}

/// Per-document framing shared by every backend call of that document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionContext {
    /// Kind of text being translated, e.g. "legal" or "medical"
    pub doc_type: String,
    /// Source language name or ISO code
    pub source_language: String,
    /// Target language name or ISO code
    pub target_language: String,
    /// Free-text guidance appended verbatim
    pub specific_instructions: String,
}

impl InstructionContext {
    /// Create a new instruction context.
    pub fn new(
        doc_type: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        specific_instructions: impl Into<String>,
    ) -> Self {
        Self {
            doc_type: doc_type.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
            specific_instructions: specific_instructions.into(),
        }
    }

    /// Render the system instruction with the default template.
    pub fn system_instruction(&self) -> String {
        self.render_with(&PromptTemplate::default())
    }

    /// Render the system instruction with a custom template.
    ///
    /// ISO language codes are expanded to English names; anything else is used as given.
    pub fn render_with(&self, template: &PromptTemplate) -> String {
        template.render(
            &self.doc_type,
            &language_utils::resolve_language_name(&self.source_language),
            &language_utils::resolve_language_name(&self.target_language),
            &self.specific_instructions,
        )
    }
}
