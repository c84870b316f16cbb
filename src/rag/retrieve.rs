// file: src/rag/retrieve.rs
// description: query-time retrieval and context block formatting
// reference: internal retrieval pipeline

use crate::config::Config;
use crate::error::{Result, StudyError};
use crate::index::{IndexMetadata, VectorStore};
use crate::models::RetrievedChunk;
use crate::ollama::OllamaEmbeddingClient;
use tracing::{debug, warn};

pub struct Retriever {
    store: VectorStore,
    embedder: OllamaEmbeddingClient,
    metadata: Option<IndexMetadata>,
}

impl Retriever {
    /// Open the persisted index for querying. Fails with `IndexMissing`
    /// when ingestion was never run, and with `EmbedModelMismatch` when
    /// the sidecar records a different embedding model than the one
    /// configured now — querying an index built by another model returns
    /// structurally valid but meaningless neighbors.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = VectorStore::open(&config.index_dir).await?;

        let metadata = IndexMetadata::load(&config.index_dir)?;
        match &metadata {
            Some(meta) if meta.embed_model != config.embed_model => {
                return Err(StudyError::EmbedModelMismatch {
                    built_with: meta.embed_model.clone(),
                    configured: config.embed_model.clone(),
                });
            }
            Some(meta) => {
                debug!(
                    "Opened index built {} with {} chunk(s)",
                    meta.last_build, meta.num_chunks
                );
            }
            None => {
                warn!(
                    "Index at {} has no metadata sidecar; cannot verify embedding model",
                    config.index_dir.display()
                );
            }
        }

        let embedder = OllamaEmbeddingClient::new(
            config.ollama_base_url.clone(),
            config.embed_model.clone(),
        );

        Ok(Self {
            store,
            embedder,
            metadata,
        })
    }

    pub fn metadata(&self) -> Option<&IndexMetadata> {
        self.metadata.as_ref()
    }

    /// Embed the query and return the `k` nearest fragments, best match
    /// first. Returns fewer than `k` only when the index holds fewer
    /// fragments; an empty index yields an empty vec, never an error.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        self.store.search(query_embedding, k).await
    }
}

/// Render retrieval results into the single context block the prompts
/// embed: one entry per chunk, 1-based ordinal plus `[source p.page]`
/// tag, entries separated by a blank line. Empty input renders empty.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "Source {} [{} p.{}]:\n{}",
                i + 1,
                chunk.source,
                chunk.page,
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
