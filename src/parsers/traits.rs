use crate::types::Diagnostic;

/// Output of one scan over a document: the rows that were recognised plus a
/// diagnostic for every line that had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPass<T> {
    pub transactions: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Default for ExtractionPass<T> {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

pub trait Parser {
    type Output;

    fn parse(&self, content: &str) -> ExtractionPass<Self::Output>;

    fn is_supported(&self, filename: Option<&str>, content: &str) -> bool;
}
