// file: src/pipeline/ingest.rs
// description: full-rebuild ingestion pipeline: load, chunk, embed, index
// reference: application orchestration

use crate::config::Config;
use crate::corpus::{PdfCorpusLoader, TextChunker};
use crate::error::{Result, StudyError};
use crate::index::{IndexMetadata, VectorStore};
use crate::ollama::OllamaEmbeddingClient;
use crate::pipeline::progress::EmbeddingProgress;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub num_documents: usize,
    pub num_chunks: usize,
    pub index_path: PathBuf,
}

/// One blocking sequence: load PDFs, chunk, embed one fragment at a
/// time, rebuild the table, write the sidecar. Rebuild is exclusive and
/// stop-the-world; there is no incremental merge and no concurrency
/// inside the pipeline.
pub struct IngestPipeline<'a> {
    config: &'a Config,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<IngestReport> {
        self.run_with_color(true).await
    }

    pub async fn run_with_color(&self, colored: bool) -> Result<IngestReport> {
        let loader = PdfCorpusLoader::new(&self.config.pdf_dir);
        let documents = loader.load()?;

        let chunker = TextChunker::new(self.config.chunk_size, self.config.chunk_overlap);
        let fragments = chunker.chunk_documents(&documents);

        if fragments.is_empty() {
            // PDFs were found but nothing survived extraction; refuse to
            // write an empty index.
            return Err(StudyError::CorpusEmpty(self.config.pdf_dir.clone()));
        }

        info!(
            "Embedding {} fragment(s) with {}",
            fragments.len(),
            self.config.embed_model
        );

        let embedder = OllamaEmbeddingClient::new(
            self.config.ollama_base_url.clone(),
            self.config.embed_model.clone(),
        );

        let progress = EmbeddingProgress::with_color(fragments.len(), colored);
        let mut embeddings = Vec::with_capacity(fragments.len());

        for fragment in &fragments {
            let embedding = embedder.embed(&fragment.content).await?;
            progress.embedded(&fragment.source, fragment.page);
            embeddings.push(embedding);
        }
        progress.finish();

        let store = VectorStore::connect(&self.config.index_dir).await?;
        store.rebuild(&fragments, &embeddings).await?;

        let metadata = IndexMetadata::new(
            fragments.len(),
            self.config.embed_model.clone(),
            self.config.chunk_size,
            self.config.chunk_overlap,
        );
        metadata.save(&self.config.index_dir)?;

        info!(
            "Ingestion complete: {} page(s), {} fragment(s)",
            documents.len(),
            fragments.len()
        );

        Ok(IngestReport {
            num_documents: documents.len(),
            num_chunks: fragments.len(),
            index_path: self.config.index_dir.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ingest_fails_on_missing_corpus() {
        let mut config = Config::default_config();
        config.pdf_dir = PathBuf::from("/nonexistent/pdfs");

        let pipeline = IngestPipeline::new(&config);
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, StudyError::CorpusMissing(_)));
    }

    #[tokio::test]
    async fn test_ingest_fails_on_empty_corpus_before_index_write() {
        let pdf_dir = tempdir().unwrap();
        let index_dir = tempdir().unwrap();

        let mut config = Config::default_config();
        config.pdf_dir = pdf_dir.path().to_path_buf();
        config.index_dir = index_dir.path().join("index");

        let pipeline = IngestPipeline::new(&config);
        let err = pipeline.run().await.unwrap_err();
        assert!(matches!(err, StudyError::CorpusEmpty(_)));

        // no partial index artifacts
        assert!(!config.index_dir.exists());
    }
}
