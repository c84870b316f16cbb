// file: src/models/document.rs
// description: page-level document model produced by the corpus loader
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// Raw extracted text for one PDF page. Created by the loader and
/// consumed once by the chunker; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    pub text: String,

    /// Originating PDF filename, e.g. `lecture3.pdf`.
    pub source: String,

    /// 1-indexed page number.
    pub page: u32,
}

impl PageDocument {
    pub fn new(text: String, source: String, page: u32) -> Self {
        Self { text, source, page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_document_creation() {
        let doc = PageDocument::new(
            "Modus ponens: from P and P -> Q, infer Q.".to_string(),
            "lecture3.pdf".to_string(),
            7,
        );

        assert_eq!(doc.source, "lecture3.pdf");
        assert_eq!(doc.page, 7);
        assert!(doc.text.contains("Modus ponens"));
    }
}
