// file: src/rag/mod.rs
// description: retrieval-augmented generation module exports
// reference: internal module structure

pub mod answer;
pub mod retrieve;
pub mod study;

pub use answer::{Answer, AnswerEngine, INSUFFICIENT_CONTEXT};
pub use retrieve::{Retriever, format_context};
pub use study::{
    DEFAULT_QUIZ_QUESTIONS, Flashcard, FlashcardSet, NOT_ENOUGH_MATERIAL, Quiz, STUDY_TOP_K,
    StudyEngine, export_flashcards_json, parse_flashcards,
};
