// file: src/index/schema.rs
// description: Arrow schema and record batch construction for the fragments table
// reference: https://docs.rs/lancedb

use crate::error::{Result, StudyError};
use crate::models::Fragment;
use arrow_array::{FixedSizeListArray, Float32Array, RecordBatch, StringArray, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const FRAGMENTS_TABLE: &str = "fragments";

/// Arrow schema for the fragments table. One row per fragment, carrying
/// the embedding together with its metadata so retrieval can never
/// return a vector without source and page.
pub fn fragments_schema(embedding_dim: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("chunk_id", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
        Field::new("page", DataType::UInt32, false),
        Field::new("content", DataType::Utf8, false),
        Field::new(
            "embedding",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                embedding_dim as i32,
            ),
            false,
        ),
    ]))
}

/// Build the single RecordBatch a full rebuild writes. Fragments and
/// embeddings must be parallel slices of the same length.
pub fn to_record_batch(
    schema: Arc<Schema>,
    fragments: &[Fragment],
    embeddings: &[Vec<f32>],
) -> Result<RecordBatch> {
    if fragments.len() != embeddings.len() {
        return Err(StudyError::Index(format!(
            "fragment/embedding count mismatch: {} vs {}",
            fragments.len(),
            embeddings.len()
        )));
    }

    let chunk_ids: StringArray = fragments
        .iter()
        .map(|f| Some(f.chunk_id.clone()))
        .collect();

    let sources: StringArray = fragments.iter().map(|f| Some(f.source.clone())).collect();

    let pages: UInt32Array = fragments.iter().map(|f| Some(f.page)).collect();

    let contents: StringArray = fragments.iter().map(|f| Some(f.content.clone())).collect();

    let embedding_values: Float32Array = embeddings
        .iter()
        .flat_map(|emb| emb.iter().copied())
        .collect();

    let dim = embeddings
        .first()
        .map(|emb| emb.len())
        .ok_or_else(|| StudyError::Index("cannot build an empty record batch".to_string()))?;

    let embedding_list = FixedSizeListArray::try_new_from_values(embedding_values, dim as i32)
        .map_err(|e| StudyError::Index(format!("Failed to create embedding array: {}", e)))?;

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(chunk_ids),
            Arc::new(sources),
            Arc::new(pages),
            Arc::new(contents),
            Arc::new(embedding_list),
        ],
    )
    .map_err(|e| StudyError::Index(format!("Failed to create record batch: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_generation() {
        let schema = fragments_schema(768);
        assert_eq!(schema.fields().len(), 5);

        let embedding_field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(
            embedding_field.data_type(),
            DataType::FixedSizeList(_, 768)
        ));
    }

    #[test]
    fn test_record_batch_construction() {
        let fragments = vec![
            Fragment::new("premises".to_string(), "a.pdf".to_string(), 1),
            Fragment::new("conclusion".to_string(), "a.pdf".to_string(), 2),
        ];
        let embeddings = vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]];

        let schema = fragments_schema(3);
        let batch = to_record_batch(schema, &fragments, &embeddings).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 5);
    }

    #[test]
    fn test_record_batch_rejects_length_mismatch() {
        let fragments = vec![Fragment::new("text".to_string(), "a.pdf".to_string(), 1)];
        let embeddings: Vec<Vec<f32>> = vec![];

        let schema = fragments_schema(3);
        assert!(to_record_batch(schema, &fragments, &embeddings).is_err());
    }
}
