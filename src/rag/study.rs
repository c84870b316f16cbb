// file: src/rag/study.rs
// description: quiz and flashcard generation with line-tagged flashcard parsing
// reference: internal prompt assembly

use crate::config::Config;
use crate::error::Result;
use crate::models::Citation;
use crate::ollama::OllamaGenerateClient;
use crate::rag::retrieve::{Retriever, format_context};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Study modes retrieve wider context than Q&A.
pub const STUDY_TOP_K: usize = 8;

pub const DEFAULT_QUIZ_QUESTIONS: usize = 5;

/// Fixed guard message when retrieval finds nothing for a topic.
pub const NOT_ENOUGH_MATERIAL: &str = "Not enough material found on this topic in the slides.";

const CARD_SEPARATOR: &str = "---";

const QUIZ_PROMPT: &str = "You are creating an exam for a lecture slide deck. Generate {num_questions} exam-style questions based ONLY on the provided context.

Rules:
- Questions must be answerable from the context
- Include a mix of definitions, applications, and conceptual questions
- Provide an answer key with explanations
- Cite slide sources for each question
- Format as numbered questions followed by answer key

Context:
{context}

Topic: {topic}

Generate {num_questions} questions:";

const FLASHCARD_PROMPT: &str = "You are creating study flashcards for a lecture slide deck. Generate flashcards based ONLY on the provided context.

Rules:
- Create clear Q/A pairs
- Focus on definitions, key concepts, and important distinctions
- Keep questions specific and answers concise
- Cite the slide source for each card
- Generate 8-10 flashcards

Context:
{context}

Topic: {topic}

Generate flashcards in this format:
Q: [question]
A: [answer]
Source: [citation]
---";

#[derive(Debug, Clone)]
pub struct Quiz {
    pub quiz: String,
    pub sources: Vec<Citation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Flashcard {
    fn with_question(question: String) -> Self {
        Self {
            question,
            answer: None,
            source: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlashcardSet {
    pub flashcards: Vec<Flashcard>,
    pub raw_text: String,
    pub sources: Vec<Citation>,
}

pub struct StudyEngine {
    retriever: Retriever,
    llm: OllamaGenerateClient,
}

impl StudyEngine {
    pub async fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            retriever: Retriever::open(config).await?,
            llm: OllamaGenerateClient::new(
                config.ollama_base_url.clone(),
                config.llm_model.clone(),
            ),
        })
    }

    pub async fn quiz(&self, topic: &str, num_questions: usize) -> Result<Quiz> {
        let chunks = self.retriever.retrieve(topic, STUDY_TOP_K).await?;

        if chunks.is_empty() {
            info!("No material retrieved for quiz topic '{}'", topic);
            return Ok(Quiz {
                quiz: NOT_ENOUGH_MATERIAL.to_string(),
                sources: Vec::new(),
            });
        }

        let context = format_context(&chunks);
        let prompt = QUIZ_PROMPT
            .replace("{num_questions}", &num_questions.to_string())
            .replace("{context}", &context)
            .replace("{topic}", topic);

        let raw = self.llm.generate(&prompt).await?;
        let sources = chunks.iter().map(Citation::from).collect();

        Ok(Quiz {
            quiz: raw.trim().to_string(),
            sources,
        })
    }

    pub async fn flashcards(&self, topic: &str) -> Result<FlashcardSet> {
        let chunks = self.retriever.retrieve(topic, STUDY_TOP_K).await?;

        if chunks.is_empty() {
            info!("No material retrieved for flashcard topic '{}'", topic);
            return Ok(FlashcardSet {
                flashcards: Vec::new(),
                raw_text: NOT_ENOUGH_MATERIAL.to_string(),
                sources: Vec::new(),
            });
        }

        let context = format_context(&chunks);
        let prompt = FLASHCARD_PROMPT
            .replace("{context}", &context)
            .replace("{topic}", topic);

        let raw = self.llm.generate(&prompt).await?;
        let flashcards = parse_flashcards(&raw);
        let sources = chunks.iter().map(Citation::from).collect();

        Ok(FlashcardSet {
            flashcards,
            raw_text: raw.trim().to_string(),
            sources,
        })
    }
}

/// Parse the line-tagged flashcard format the model is instructed to
/// emit. `Q:` opens a record (flushing the previous one), `A:` and
/// `Source:` populate the open record, and a line that is exactly `---`
/// flushes it. Lines before any `Q:` are ignored, a trailing record is
/// committed only once a question exists, and malformed lines are
/// skipped: this parser never errors.
pub fn parse_flashcards(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut current: Option<Flashcard> = None;

    for line in text.lines() {
        let line = line.trim();

        if let Some(question) = line.strip_prefix("Q:") {
            if let Some(card) = current.take() {
                cards.push(card);
            }
            current = Some(Flashcard::with_question(question.trim().to_string()));
        } else if let Some(answer) = line.strip_prefix("A:") {
            if let Some(card) = &mut current {
                card.answer = Some(answer.trim().to_string());
            }
        } else if let Some(source) = line.strip_prefix("Source:") {
            if let Some(card) = &mut current {
                card.source = Some(source.trim().to_string());
            }
        } else if line == CARD_SEPARATOR {
            if let Some(card) = current.take() {
                cards.push(card);
            }
        }
    }

    if let Some(card) = current {
        cards.push(card);
    }

    cards
}

/// Pretty-printed JSON array of `{question, answer, source}` records.
pub fn export_flashcards_json(cards: &[Flashcard]) -> Result<String> {
    Ok(serde_json::to_string_pretty(cards)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_complete_card() {
        let text = "Q: What is X?\nA: X is Y.\nSource: doc.pdf p.3\n---\n";
        let cards = parse_flashcards(text);

        assert_eq!(
            cards,
            vec![Flashcard {
                question: "What is X?".to_string(),
                answer: Some("X is Y.".to_string()),
                source: Some("doc.pdf p.3".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_multiple_cards() {
        let text = "Q: One?\nA: 1.\nSource: a.pdf p.1\n---\nQ: Two?\nA: 2.\nSource: a.pdf p.2\n---";
        let cards = parse_flashcards(text);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question, "One?");
        assert_eq!(cards[1].question, "Two?");
    }

    #[test]
    fn test_trailing_card_without_separator_is_committed() {
        let text = "Q: Last card?";
        let cards = parse_flashcards(text);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Last card?");
        assert_eq!(cards[0].answer, None);
        assert_eq!(cards[0].source, None);
    }

    #[test]
    fn test_lines_before_first_question_are_dropped() {
        let text = "A: orphan answer\nSource: nowhere.pdf\n---\nQ: Real?\nA: Yes.";
        let cards = parse_flashcards(text);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "Real?");
        assert_eq!(cards[0].answer, Some("Yes.".to_string()));
    }

    #[test]
    fn test_new_question_flushes_previous_card() {
        let text = "Q: First?\nA: 1.\nQ: Second?";
        let cards = parse_flashcards(text);

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].answer, Some("1.".to_string()));
        assert_eq!(cards[1].answer, None);
    }

    #[test]
    fn test_malformed_lines_are_ignored() {
        let text = "Q: Ok?\nnot a tag\nA: Fine.\n-- not the separator\n---";
        let cards = parse_flashcards(text);

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].answer, Some("Fine.".to_string()));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_flashcards("").is_empty());
        assert!(parse_flashcards("\n\n---\n").is_empty());
    }

    #[test]
    fn test_export_json_shape() {
        let cards = vec![Flashcard {
            question: "What is X?".to_string(),
            answer: Some("Y.".to_string()),
            source: None,
        }];

        let json = export_flashcards_json(&cards).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["question"], "What is X?");
        assert_eq!(value[0]["answer"], "Y.");
        assert!(value[0].get("source").is_none());
        // pretty-printed
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_quiz_prompt_placeholders_resolve() {
        let prompt = QUIZ_PROMPT
            .replace("{num_questions}", "5")
            .replace("{context}", "ctx")
            .replace("{topic}", "validity");

        assert!(prompt.contains("Generate 5 questions:"));
        assert!(prompt.contains("Topic: validity"));
        assert!(!prompt.contains('{'));
    }
}
