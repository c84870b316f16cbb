// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod fragment;
pub mod search_result;

pub use document::PageDocument;
pub use fragment::Fragment;
pub use search_result::{Citation, RetrievedChunk, format_citations};
