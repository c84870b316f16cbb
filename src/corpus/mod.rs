// file: src/corpus/mod.rs
// description: corpus loading and chunking module exports
// reference: internal module structure

pub mod chunker;
pub mod loader;

pub use chunker::TextChunker;
pub use loader::PdfCorpusLoader;
