/*!
 * In-memory document model.
 *
 * A `Document` is the ordered list of paragraphs extracted from a container.
 * The list is fixed at construction: translation may replace an element's
 * text but never adds, removes or reorders elements.
 */

/// One paragraph of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Index of the element within the document
    position: usize,
    /// Text as extracted from the container
    source_text: String,
    /// Current text, replaced by translation
    text: String,
}

impl Element {
    /// Create an element holding its extracted text
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            position,
            source_text: text.clone(),
            text,
        }
    }

    /// Position of the element in the document
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current text of the element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text the element had when it was extracted
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Replace the element's text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the element carries text worth sending to a backend
    pub fn is_translatable(&self) -> bool {
        !self.source_text.trim().is_empty()
    }

    /// Whether the text differs from what was extracted
    pub fn is_modified(&self) -> bool {
        self.text != self.source_text
    }
}

/// Ordered sequence of elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    /// Build a document from paragraph texts in order
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let elements = texts
            .into_iter()
            .enumerate()
            .map(|(position, text)| Element::new(position, text))
            .collect();
        Self { elements }
    }

    /// All elements, including empty ones
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, position: usize) -> Option<&Element> {
        self.elements.get(position)
    }

    pub fn element_mut(&mut self, position: usize) -> Option<&mut Element> {
        self.elements.get_mut(position)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Positions of the elements with non-blank text, in document order
    pub fn translatable_positions(&self) -> Vec<usize> {
        self.elements
            .iter()
            .filter(|e| e.is_translatable())
            .map(|e| e.position)
            .collect()
    }

    /// Current text of every element, in order
    pub fn texts(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.text()).collect()
    }

    /// Number of elements whose text was replaced
    pub fn modified_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_modified()).count()
    }
}
