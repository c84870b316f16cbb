// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StudyError>;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF directory not found: {}", .0.display())]
    CorpusMissing(PathBuf),

    #[error("No PDF documents with extractable text found in {}", .0.display())]
    CorpusEmpty(PathBuf),

    #[error("PDF extraction failed for {file}: {message}")]
    PdfExtract { file: String, message: String },

    #[error("Index not found at {}. Run `slide_tutor ingest` first", .0.display())]
    IndexMissing(PathBuf),

    #[error(
        "Index was built with embedding model '{built_with}' but '{configured}' is configured. Re-run `slide_tutor ingest`"
    )]
    EmbedModelMismatch {
        built_with: String,
        configured: String,
    },

    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Generation request failed: {0}")]
    Generation(String),

    #[error("Ollama is not reachable at {0}")]
    ServiceUnavailable(String),

    #[error("Required model '{0}' is not installed in Ollama")]
    ModelNotInstalled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
