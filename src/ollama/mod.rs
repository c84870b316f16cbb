// file: src/ollama/mod.rs
// description: Ollama service boundary module exports
// reference: internal module structure

pub mod embeddings;
pub mod generate;
pub mod health;

pub use embeddings::OllamaEmbeddingClient;
pub use generate::OllamaGenerateClient;
pub use health::{EnvironmentCheck, EnvironmentReport};
