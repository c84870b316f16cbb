// file: src/corpus/chunker.rs
// description: recursive character splitting with overlap and stable chunk ids
// reference: internal chunking algorithm

use crate::models::{Fragment, PageDocument};
use std::collections::VecDeque;
use tracing::debug;

/// Separator priority: paragraph breaks, line breaks, sentence ends,
/// spaces. Text that none of these can split within the target size
/// falls back to arbitrary character boundaries.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split every page into fragments and assign content-derived ids.
    /// Overlap is shared only between consecutive fragments of the same
    /// page; pages never bleed into each other.
    pub fn chunk_documents(&self, documents: &[PageDocument]) -> Vec<Fragment> {
        let fragments: Vec<Fragment> = documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.text)
                    .into_iter()
                    .map(|content| Fragment::new(content, doc.source.clone(), doc.page))
            })
            .collect();

        debug!(
            "Chunked {} page(s) into {} fragment(s)",
            documents.len(),
            fragments.len()
        );

        fragments
    }

    /// Split text into chunks of at most `chunk_size` characters, with
    /// `chunk_overlap` characters of trailing context carried into the
    /// next chunk. Whitespace-only chunks are dropped.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces = self.split_recursive(text, &SEPARATORS);
        self.merge_pieces(pieces)
    }

    /// Break text into pieces no longer than `chunk_size`, preferring the
    /// finest position in the separator priority list that works. Pieces
    /// keep their trailing separator so concatenation reconstructs the
    /// input.
    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((sep, rest)) = separators.split_first() else {
            // Last resort: single-character pieces, merged back into
            // windows at exact character boundaries.
            return text.chars().map(String::from).collect();
        };

        if !text.contains(sep) {
            return self.split_recursive(text, rest);
        }

        let mut pieces = Vec::new();
        for part in text.split_inclusive(sep) {
            if char_len(part) <= self.chunk_size {
                pieces.push(part.to_string());
            } else {
                pieces.extend(self.split_recursive(part, rest));
            }
        }

        pieces
    }

    /// Greedy left-to-right merge of pieces into chunks. When a chunk
    /// fills up it is flushed and its trailing pieces (up to
    /// `chunk_overlap` characters) seed the next chunk.
    fn merge_pieces(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<(String, usize)> = VecDeque::new();
        let mut window_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);

            if window_len + piece_len > self.chunk_size && !window.is_empty() {
                push_chunk(&mut chunks, &window);

                while window_len > self.chunk_overlap
                    || (window_len + piece_len > self.chunk_size && window_len > 0)
                {
                    let (_, dropped_len) = window
                        .pop_front()
                        .expect("window is non-empty while draining");
                    window_len -= dropped_len;
                }
            }

            window_len += piece_len;
            window.push_back((piece, piece_len));
        }

        if !window.is_empty() {
            push_chunk(&mut chunks, &window);
        }

        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<(String, usize)>) {
    let chunk: String = window.iter().map(|(piece, _)| piece.as_str()).collect();
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunker = TextChunker::new(900, 150);
        let chunks = chunker.split_text("A short slide bullet.");
        assert_eq!(chunks, vec!["A short slide bullet.".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(900, 150);
        assert!(chunker.split_text("").is_empty());
        assert!(chunker.split_text("   \n\n  ").is_empty());
    }

    #[test]
    fn test_paragraph_break_is_preferred() {
        let chunker = TextChunker::new(50, 10);
        let para1 = "An argument is a set of premises and a claim";
        let para2 = "Validity concerns the form of the argument";
        let text = format!("{}\n\n{}", para1, para2);

        let chunks = chunker.split_text(&text);
        assert_eq!(chunks, vec![para1.to_string(), para2.to_string()]);
    }

    #[test]
    fn test_sentence_boundary_fallback() {
        // No paragraph or line breaks, so the splitter falls through to
        // sentence-ending periods.
        let chunker = TextChunker::new(60, 0);
        let text = "First sentence about logic. Second sentence about proofs. Third one.";

        let chunks = chunker.split_text(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 60, "oversized chunk: {:?}", chunk);
        }
        assert!(chunks[0].starts_with("First sentence"));
    }

    #[test]
    fn test_size_bound_holds() {
        let chunker = TextChunker::new(100, 20);
        let words: Vec<String> = (0..200).map(|i| format!("word{}", i)).collect();
        let text = words.join(" ");

        for chunk in chunker.split_text(&text) {
            assert!(
                chunk.chars().count() <= 100,
                "chunk exceeds size bound: {:?}",
                chunk
            );
        }
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let chunker = TextChunker::new(50, 20);
        let words: Vec<String> = (0..60).map(|i| format!("w{:02}", i)).collect();
        let text = words.join(" ");

        let chunks = chunker.split_text(&text);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let shares_suffix = (1..prev.len())
                .filter(|&i| prev.is_char_boundary(i))
                .any(|i| next.starts_with(&prev[i..]));
            assert!(
                shares_suffix,
                "no shared boundary between {:?} and {:?}",
                prev, next
            );
        }
    }

    #[test]
    fn test_character_fallback_for_unsplittable_text() {
        let chunker = TextChunker::new(100, 20);
        let text = "a".repeat(250);

        let chunks = chunker.split_text(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
        }
        assert!(chunks[1].starts_with(&"a".repeat(20)));
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let chunker = TextChunker::new(80, 15);
        let text = "Premise one.\nPremise two.\n\nConclusion follows from the premises above. Always.";

        assert_eq!(chunker.split_text(text), chunker.split_text(text));
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let chunker = TextChunker::new(40, 8);
        let text = "∀x (Px → Qx) means every P is a Q. ".repeat(6);

        for chunk in chunker.split_text(&text) {
            assert!(chunk.chars().count() <= 40);
        }
    }

    #[test]
    fn test_chunk_documents_inherits_metadata() {
        let chunker = TextChunker::new(50, 10);
        let docs = vec![PageDocument::new(
            "word ".repeat(30).trim().to_string(),
            "lecture1.pdf".to_string(),
            2,
        )];

        let fragments = chunker.chunk_documents(&docs);
        assert!(fragments.len() > 1);
        for fragment in &fragments {
            assert_eq!(fragment.source, "lecture1.pdf");
            assert_eq!(fragment.page, 2);
            assert!(!fragment.chunk_id.is_empty());
        }
    }

    #[test]
    fn test_chunk_ids_stable_across_runs() {
        let chunker = TextChunker::new(50, 10);
        let docs = vec![PageDocument::new(
            "Modus ponens. Modus tollens. Hypothetical syllogism. Disjunctive syllogism."
                .to_string(),
            "rules.pdf".to_string(),
            1,
        )];

        let first: Vec<String> = chunker
            .chunk_documents(&docs)
            .into_iter()
            .map(|f| f.chunk_id)
            .collect();
        let second: Vec<String> = chunker
            .chunk_documents(&docs)
            .into_iter()
            .map(|f| f.chunk_id)
            .collect();

        assert_eq!(first, second);
    }
}
