/*!
 * `.docx` container: extraction of body paragraphs and write-back.
 */

use std::collections::HashMap;

use log::debug;

use crate::errors::DocumentError;

use super::body::{self, ParagraphSpan};
use super::model::Document;
use super::package::DocxPackage;
use super::xml::{self, XmlEvent};

/// Name of the main document part inside the package
pub const MAIN_PART: &str = "word/document.xml";

/// A parsed `.docx` file together with its paragraph model
pub struct DocxDocument {
    package: DocxPackage,
    events: Vec<XmlEvent>,
    spans: Vec<ParagraphSpan>,
    document: Document,
}

impl DocxDocument {
    /// Parse raw `.docx` bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = DocxPackage::from_bytes(bytes)?;
        let main = package
            .part(MAIN_PART)
            .ok_or_else(|| DocumentError::MissingPart(MAIN_PART.to_string()))?;
        let events = xml::parse_events(main)?;
        let spans = body::locate_paragraphs(&events)?;
        let document = Document::from_texts(spans.iter().map(|span| body::paragraph_text(&events, *span)));

        debug!(
            "Extracted {} paragraphs ({} with text)",
            document.len(),
            document.translatable_positions().len()
        );

        Ok(Self {
            package,
            events,
            spans,
            document,
        })
    }

    /// The paragraph model
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the paragraph model for translation
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Serialize the package, rewriting only the paragraphs whose text changed
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut replacements = HashMap::new();
        if self.document.modified_count() > 0 {
            replacements.insert(MAIN_PART.to_string(), self.render_main_part()?);
        }
        self.package.to_bytes_with_replacements(&replacements)
    }

    fn render_main_part(&self) -> Result<Vec<u8>, DocumentError> {
        if self.spans.len() != self.document.len() {
            return Err(DocumentError::Serialization(format!(
                "paragraph count changed from {} to {}",
                self.spans.len(),
                self.document.len()
            )));
        }

        let mut events = Vec::with_capacity(self.events.len());
        let mut cursor = 0;
        for (span, element) in self.spans.iter().zip(self.document.elements()) {
            if !element.is_modified() {
                continue;
            }
            events.extend_from_slice(&self.events[cursor..span.start]);
            events.extend(body::rewrite_paragraph(&self.events, *span, element.text()));
            cursor = span.end + 1;
        }
        events.extend_from_slice(&self.events[cursor..]);

        xml::write_events(&events)
    }
}
