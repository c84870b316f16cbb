// file: src/rag/answer.rs
// description: grounded question answering with inline citations
// reference: internal prompt assembly

use crate::config::Config;
use crate::error::Result;
use crate::models::{Citation, RetrievedChunk};
use crate::ollama::OllamaGenerateClient;
use crate::rag::retrieve::{Retriever, format_context};
use tracing::info;

/// Fixed refusal returned without invoking the model when retrieval
/// comes back empty, and demanded from the model when the retrieved
/// context does not cover the question.
pub const INSUFFICIENT_CONTEXT: &str =
    "I don't have enough information from the slides to answer this question.";

const ANSWER_PROMPT: &str = "You are a study assistant for a lecture slide deck. Answer the question using ONLY the provided context from lecture slides.

Rules:
- Answer only using the context below
- If the context doesn't contain the answer, say \"I don't have enough information from the slides to answer this question.\"
- Cite sources inline using the format [filename p.X]
- Be concise and exam-focused
- Do not add information not present in the context

Context:
{context}

Question: {question}

Answer:";

#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,

    /// `{source, page}` for every retrieved chunk in retrieval order,
    /// regardless of whether the model actually cited it. Not
    /// deduplicated.
    pub sources: Vec<Citation>,
    pub chunks: Vec<RetrievedChunk>,
}

impl Answer {
    pub fn insufficient() -> Self {
        Self {
            answer: INSUFFICIENT_CONTEXT.to_string(),
            sources: Vec::new(),
            chunks: Vec::new(),
        }
    }
}

pub struct AnswerEngine {
    retriever: Retriever,
    llm: OllamaGenerateClient,
    top_k: usize,
}

impl AnswerEngine {
    pub async fn open(config: &Config) -> Result<Self> {
        Ok(Self {
            retriever: Retriever::open(config).await?,
            llm: OllamaGenerateClient::new(
                config.ollama_base_url.clone(),
                config.llm_model.clone(),
            ),
            top_k: config.top_k,
        })
    }

    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let chunks = self.retriever.retrieve(question, self.top_k).await?;

        if let Some(refusal) = refuse_without_context(&chunks) {
            info!("Retrieval returned nothing; answering without the model");
            return Ok(refusal);
        }

        let context = format_context(&chunks);
        let prompt = build_answer_prompt(&context, question);

        let raw = self.llm.generate(&prompt).await?;
        let sources = chunks.iter().map(Citation::from).collect();

        Ok(Answer {
            answer: raw.trim().to_string(),
            sources,
            chunks,
        })
    }
}

/// The guard that keeps answering grounded: with nothing retrieved there
/// is no context to answer from, so the fixed refusal is returned and
/// the model is never invoked.
fn refuse_without_context(chunks: &[RetrievedChunk]) -> Option<Answer> {
    chunks.is_empty().then(Answer::insufficient)
}

fn build_answer_prompt(context: &str, question: &str) -> String {
    ANSWER_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}
