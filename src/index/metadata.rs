// file: src/index/metadata.rs
// description: metadata.json sidecar describing how the index was built
// reference: internal data structures

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const METADATA_FILE: &str = "metadata.json";

/// Build-time record persisted next to the vector index, for diagnostics
/// and load-time validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// ISO-8601 timestamp of the last successful build.
    pub last_build: String,
    pub num_chunks: usize,
    pub embed_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl IndexMetadata {
    pub fn new(
        num_chunks: usize,
        embed_model: String,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            last_build: Utc::now().to_rfc3339(),
            num_chunks,
            embed_model,
            chunk_size,
            chunk_overlap,
        }
    }

    /// Persist the sidecar. Written to a temp file and renamed into
    /// place so a concurrent reader never observes a torn file.
    pub fn save(&self, index_dir: &Path) -> Result<()> {
        fs::create_dir_all(index_dir)?;

        let path = index_dir.join(METADATA_FILE);
        let tmp_path = index_dir.join(format!("{}.tmp", METADATA_FILE));

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;

        debug!("Wrote index metadata to {}", path.display());
        Ok(())
    }

    /// Read the sidecar if present. A missing sidecar is not an error;
    /// it only degrades diagnostics.
    pub fn load(index_dir: &Path) -> Result<Option<Self>> {
        let path = index_dir.join(METADATA_FILE);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let metadata: IndexMetadata = serde_json::from_str(&json)?;
        Ok(Some(metadata))
    }
}
