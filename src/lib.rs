// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod models;
pub mod ollama;
pub mod pipeline;
pub mod rag;
pub mod utils;

pub use config::Config;
pub use corpus::{PdfCorpusLoader, TextChunker};
pub use error::{Result, StudyError};
pub use index::{IndexMetadata, VectorStore};
pub use models::{Citation, Fragment, PageDocument, RetrievedChunk, format_citations};
pub use ollama::{EnvironmentCheck, EnvironmentReport, OllamaEmbeddingClient, OllamaGenerateClient};
pub use pipeline::{IngestPipeline, IngestReport};
pub use rag::{
    Answer, AnswerEngine, DEFAULT_QUIZ_QUESTIONS, Flashcard, FlashcardSet, INSUFFICIENT_CONTEXT,
    NOT_ENOUGH_MATERIAL, Quiz, Retriever, STUDY_TOP_K, StudyEngine, export_flashcards_json,
    format_context, parse_flashcards,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _config = Config::default_config();
        let _chunker = TextChunker::new(900, 150);
    }
}
