// file: src/index/mod.rs
// description: vector index module exports
// reference: internal module structure

pub mod metadata;
pub mod schema;
pub mod store;

pub use metadata::IndexMetadata;
pub use store::VectorStore;
