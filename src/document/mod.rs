/*!
 * Document handling.
 *
 * - `model`: ordered paragraph model mutated by translation
 * - `docx`: `.docx` container extraction and write-back
 * - `body`: locating and rewriting body paragraphs in the main part
 * - `package`: in-memory ZIP package
 * - `xml`: lossless XML event stream
 */

pub mod body;
pub mod docx;
pub mod model;
pub mod package;
pub mod xml;

pub use self::docx::DocxDocument;
pub use self::model::{Document, Element};

use crate::errors::DocumentError;

/// Parse raw container bytes into a document ready for translation
pub fn extract(raw_document_bytes: &[u8]) -> Result<DocxDocument, DocumentError> {
    DocxDocument::from_bytes(raw_document_bytes)
}
