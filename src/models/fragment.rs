// file: src/models/fragment.rs
// description: chunk model with content-derived stable identifiers
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A bounded slice of a page's text, the unit of embedding and retrieval.
///
/// `chunk_id` is a pure function of `(source, page, content)`: two
/// fragments with identical values always hash to the same identifier,
/// regardless of build order or embedding values. This is how unchanged
/// content is recognized across full rebuilds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub content: String,
    pub source: String,
    pub page: u32,
    pub chunk_id: String,
}

impl Fragment {
    pub fn new(content: String, source: String, page: u32) -> Self {
        let chunk_id = Self::compute_chunk_id(&source, page, &content);

        Self {
            content,
            source,
            page,
            chunk_id,
        }
    }

    fn compute_chunk_id(source: &str, page: u32, content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(page.to_string().as_bytes());
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chunk_id_is_deterministic() {
        let a = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 3);
        let b = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 3);
        assert_eq!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn test_chunk_id_changes_with_content() {
        let a = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 3);
        let b = Fragment::new("An invalid argument".to_string(), "slides.pdf".to_string(), 3);
        assert_ne!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn test_chunk_id_changes_with_source() {
        let a = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 3);
        let b = Fragment::new("A valid argument".to_string(), "notes.pdf".to_string(), 3);
        assert_ne!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn test_chunk_id_changes_with_page() {
        let a = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 3);
        let b = Fragment::new("A valid argument".to_string(), "slides.pdf".to_string(), 4);
        assert_ne!(a.chunk_id, b.chunk_id);
    }

    #[test]
    fn test_chunk_id_is_hex_sha256() {
        let frag = Fragment::new("content".to_string(), "slides.pdf".to_string(), 1);
        assert_eq!(frag.chunk_id.len(), 64);
        assert!(frag.chunk_id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
