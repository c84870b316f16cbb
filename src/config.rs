// file: src/config.rs
// description: application configuration with env and toml resolution
// reference: https://docs.rs/config

use crate::error::{Result, StudyError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub pdf_dir: PathBuf,
    pub index_dir: PathBuf,
    pub ollama_base_url: String,
    pub llm_model: String,
    pub embed_model: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Config {
    /// Resolve configuration from defaults, an optional TOML file, and
    /// environment variables (PDF_DIR, INDEX_DIR, OLLAMA_BASE_URL,
    /// LLM_MODEL, EMBED_MODEL, CHUNK_SIZE, CHUNK_OVERLAP, TOP_K).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder()
            .set_default("pdf_dir", "data/pdfs")
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("index_dir", "data/index")
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("ollama_base_url", "http://localhost:11434")
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("llm_model", "llama3.2")
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("embed_model", "nomic-embed-text")
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("chunk_size", 900)
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("chunk_overlap", 150)
            .map_err(|e| StudyError::Config(e.to_string()))?
            .set_default("top_k", 5)
            .map_err(|e| StudyError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(config::Environment::default().try_parsing(true));

        let settings = builder
            .build()
            .map_err(|e| StudyError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| StudyError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            pdf_dir: PathBuf::from("data/pdfs"),
            index_dir: PathBuf::from("data/index"),
            ollama_base_url: "http://localhost:11434".to_string(),
            llm_model: "llama3.2".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chunk_size: 900,
            chunk_overlap: 150,
            top_k: 5,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(StudyError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(StudyError::Config(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(StudyError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
