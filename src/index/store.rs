// file: src/index/store.rs
// description: LanceDB vector store wrapper for the fragments table
// reference: https://docs.rs/lancedb

use crate::error::{Result, StudyError};
use crate::index::schema::{FRAGMENTS_TABLE, fragments_schema, to_record_batch};
use crate::models::{Fragment, RetrievedChunk};
use arrow_array::{Float32Array, RecordBatchIterator, StringArray, UInt32Array};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone)]
pub struct VectorStore {
    connection: Connection,
    index_dir: PathBuf,
}

impl VectorStore {
    /// Connect for ingestion; the index directory is created if absent.
    pub async fn connect(index_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(index_dir)?;

        let uri = index_dir.to_string_lossy().into_owned();
        info!("Connecting to LanceDB at {}", uri);

        let connection = connect(&uri)
            .execute()
            .await
            .map_err(|e| StudyError::Index(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self {
            connection,
            index_dir: index_dir.to_path_buf(),
        })
    }

    /// Connect for querying. Fails with `IndexMissing` when ingestion has
    /// never produced a fragments table at this location.
    pub async fn open(index_dir: &Path) -> Result<Self> {
        if !index_dir.is_dir() {
            return Err(StudyError::IndexMissing(index_dir.to_path_buf()));
        }

        let store = Self::connect(index_dir).await?;

        if !store.table_exists().await? {
            return Err(StudyError::IndexMissing(index_dir.to_path_buf()));
        }

        Ok(store)
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub async fn table_exists(&self) -> Result<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| StudyError::Index(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == FRAGMENTS_TABLE))
    }

    async fn get_table(&self) -> Result<Table> {
        self.connection
            .open_table(FRAGMENTS_TABLE)
            .execute()
            .await
            .map_err(|e| {
                StudyError::Index(format!("Failed to open table {}: {}", FRAGMENTS_TABLE, e))
            })
    }

    pub async fn count(&self) -> Result<usize> {
        let table = self.get_table().await?;
        table
            .count_rows(None)
            .await
            .map_err(|e| StudyError::Index(format!("Failed to count rows: {}", e)))
    }

    /// Replace the fragments table wholesale. The entire index is rebuilt
    /// from the full corpus on every ingestion run; there is no
    /// incremental merge. Callers must coordinate exclusivity with any
    /// concurrent readers.
    pub async fn rebuild(&self, fragments: &[Fragment], embeddings: &[Vec<f32>]) -> Result<()> {
        if fragments.is_empty() {
            return Err(StudyError::Index(
                "refusing to build an index with zero fragments".to_string(),
            ));
        }

        if self.table_exists().await? {
            debug!("Dropping existing {} table", FRAGMENTS_TABLE);
            self.connection
                .drop_table(FRAGMENTS_TABLE)
                .await
                .map_err(|e| StudyError::Index(format!("Failed to drop table: {}", e)))?;
        }

        let dim = embeddings
            .first()
            .map(|emb| emb.len())
            .ok_or_else(|| StudyError::Index("no embeddings to index".to_string()))?;

        let schema = fragments_schema(dim);
        let batch = to_record_batch(schema.clone(), fragments, embeddings)?;

        self.connection
            .create_table(
                FRAGMENTS_TABLE,
                RecordBatchIterator::new(vec![Ok(batch)], schema),
            )
            .execute()
            .await
            .map_err(|e| StudyError::Index(format!("Failed to create table: {}", e)))?;

        info!(
            "Built {} table with {} fragment(s), dimension {}",
            FRAGMENTS_TABLE,
            fragments.len(),
            dim
        );

        Ok(())
    }

    /// Nearest-neighbor search. Returns up to `limit` chunks ordered by
    /// non-decreasing distance; an empty table yields an empty vec.
    pub async fn search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let table = self.get_table().await?;

        debug!("Performing vector search with limit {}", limit);

        let query = table
            .vector_search(query_embedding)
            .map_err(|e| StudyError::Index(format!("Failed to create vector search: {}", e)))?
            .limit(limit);

        let mut results_stream = query
            .execute()
            .await
            .map_err(|e| StudyError::Index(format!("Vector search failed: {}", e)))?;

        let mut chunks = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| StudyError::Index(format!("Failed to read result batch: {}", e)))?;

            let num_rows = batch.num_rows();

            let sources = batch
                .column_by_name("source")
                .ok_or_else(|| StudyError::Index("Missing 'source' column".to_string()))?
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| StudyError::Index("Invalid 'source' column type".to_string()))?;

            let pages = batch
                .column_by_name("page")
                .ok_or_else(|| StudyError::Index("Missing 'page' column".to_string()))?
                .as_any()
                .downcast_ref::<UInt32Array>()
                .ok_or_else(|| StudyError::Index("Invalid 'page' column type".to_string()))?;

            let contents = batch
                .column_by_name("content")
                .ok_or_else(|| StudyError::Index("Missing 'content' column".to_string()))?
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| StudyError::Index("Invalid 'content' column type".to_string()))?;

            // LanceDB reports the distance in a reserved column
            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>());

            for i in 0..num_rows {
                let score = distances.map(|array| array.value(i)).unwrap_or(0.0);

                chunks.push(RetrievedChunk::new(
                    contents.value(i).to_string(),
                    sources.value(i).to_string(),
                    pages.value(i),
                    score,
                ));
            }
        }

        chunks.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Vector search returned {} result(s)", chunks.len());
        Ok(chunks)
    }
}
