// file: src/pipeline/mod.rs
// description: ingestion pipeline module exports
// reference: internal module structure

pub mod ingest;
pub mod progress;

pub use ingest::{IngestPipeline, IngestReport};
pub use progress::EmbeddingProgress;
