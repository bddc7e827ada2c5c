/*!
 * Paragraph batching.
 *
 * Translatable paragraphs are grouped into units of two consecutive
 * paragraphs, sent to the backend as one text joined by a blank line, and
 * the response is split back on that same separator.
 */

use crate::errors::TranslationError;

/// Separator placed between the two paragraphs of a pair, and split on in the response
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One backend call worth of paragraphs, identified by element position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationUnit {
    /// Two consecutive translatable paragraphs
    Pair(usize, usize),
    /// Final odd paragraph
    Single(usize),
}

impl TranslationUnit {
    /// Element positions covered by this unit, in order
    pub fn positions(&self) -> Vec<usize> {
        match *self {
            Self::Pair(first, second) => vec![first, second],
            Self::Single(position) => vec![position],
        }
    }

    /// Text sent to the backend for this unit
    pub fn input_text<'a>(&self, text_at: impl Fn(usize) -> &'a str) -> String {
        match *self {
            Self::Pair(first, second) => {
                format!("{}{}{}", text_at(first), PARAGRAPH_SEPARATOR, text_at(second))
            }
            Self::Single(position) => text_at(position).to_string(),
        }
    }

    /// Map a backend response onto this unit's paragraphs
    ///
    /// A single paragraph takes the response verbatim.
    pub fn split_response(&self, response: &str) -> Result<Vec<String>, TranslationError> {
        match self {
            Self::Single(_) => Ok(vec![response.to_string()]),
            Self::Pair(..) => split_response(response, 2),
        }
    }
}

/// Group translatable positions into pairs, left to right, with an odd remainder as a single
pub fn partition_units(positions: &[usize]) -> Vec<TranslationUnit> {
    positions
        .chunks(2)
        .map(|chunk| match chunk.get(1) {
            Some(&second) => TranslationUnit::Pair(chunk[0], second),
            None => TranslationUnit::Single(chunk[0]),
        })
        .collect()
}

/// Split a response on the paragraph separator, requiring exactly `expected` parts
pub fn split_response(response: &str, expected: usize) -> Result<Vec<String>, TranslationError> {
    let parts: Vec<String> = response
        .split(PARAGRAPH_SEPARATOR)
        .map(str::to_string)
        .collect();

    if parts.len() != expected {
        return Err(TranslationError::SplitMismatch {
            expected,
            actual: parts.len(),
        });
    }

    Ok(parts)
}
