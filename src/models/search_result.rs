// file: src/models/search_result.rs
// description: retrieval result and citation models
// reference: Used for vector similarity search results

use serde::{Deserialize, Serialize};

/// One retrieved fragment with its distance score. Ephemeral, per query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub source: String,
    pub page: u32,

    /// Distance to the query vector; lower is more similar.
    pub score: f32,
}

impl RetrievedChunk {
    pub fn new(content: String, source: String, page: u32, score: f32) -> Self {
        Self {
            content,
            source,
            page,
            score,
        }
    }

    /// `[filename p.X]` tag used for inline citations.
    pub fn source_tag(&self) -> String {
        format!("[{} p.{}]", self.source, self.page)
    }
}

/// Source file and page a generated claim can be traced back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: u32,
}

impl From<&RetrievedChunk> for Citation {
    fn from(chunk: &RetrievedChunk) -> Self {
        Self {
            source: chunk.source.clone(),
            page: chunk.page,
        }
    }
}

/// Format citations for display, deduplicated in first-seen order.
pub fn format_citations(citations: &[Citation]) -> String {
    let mut seen = Vec::new();
    for citation in citations {
        if !seen.contains(citation) {
            seen.push(citation.clone());
        }
    }

    seen.iter()
        .map(|c| format!("[{} p.{}]", c.source, c.page))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_tag() {
        let chunk = RetrievedChunk::new(
            "Soundness requires validity plus true premises.".to_string(),
            "lecture2.pdf".to_string(),
            12,
            0.31,
        );

        assert_eq!(chunk.source_tag(), "[lecture2.pdf p.12]");
    }

    #[test]
    fn test_citation_from_chunk() {
        let chunk = RetrievedChunk::new("text".to_string(), "slides.pdf".to_string(), 4, 0.5);
        let citation = Citation::from(&chunk);
        assert_eq!(citation.source, "slides.pdf");
        assert_eq!(citation.page, 4);
    }

    #[test]
    fn test_format_citations_dedupes_in_order() {
        let citations = vec![
            Citation {
                source: "a.pdf".to_string(),
                page: 1,
            },
            Citation {
                source: "b.pdf".to_string(),
                page: 2,
            },
            Citation {
                source: "a.pdf".to_string(),
                page: 1,
            },
        ];

        assert_eq!(format_citations(&citations), "[a.pdf p.1], [b.pdf p.2]");
    }

    #[test]
    fn test_format_citations_empty() {
        assert_eq!(format_citations(&[]), "");
    }
}
