// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use slide_tutor::utils::logging::{format_error, format_success, format_warning};
use slide_tutor::{
    AnswerEngine, Config, DEFAULT_QUIZ_QUESTIONS, EnvironmentCheck, IndexMetadata, IngestPipeline,
    StudyEngine, VectorStore, export_flashcards_json, format_citations,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "slide_tutor")]
#[command(version = "0.1.0")]
#[command(about = "RAG study assistant for lecture slide PDFs", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the vector index from the PDF corpus
    Ingest,

    /// Answer a question grounded in the indexed slides
    Ask {
        question: String,

        #[arg(short, long)]
        show_chunks: bool,
    },

    /// Generate an exam-style quiz on a topic
    Quiz {
        topic: String,

        #[arg(short = 'n', long, default_value_t = DEFAULT_QUIZ_QUESTIONS)]
        questions: usize,
    },

    /// Generate flashcards on a topic
    Flashcards {
        topic: String,

        /// Write the parsed cards as a JSON array to this file
        #[arg(short, long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Show index build metadata and fragment count
    Stats,

    /// Check that Ollama is reachable and the required models are installed
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    slide_tutor::utils::logging::init_logger(cli.color, cli.verbose);

    let config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Ingest => cmd_ingest(&config, cli.color).await?,
        Commands::Ask {
            question,
            show_chunks,
        } => cmd_ask(&config, &question, show_chunks).await?,
        Commands::Quiz { topic, questions } => cmd_quiz(&config, &topic, questions).await?,
        Commands::Flashcards { topic, export } => {
            cmd_flashcards(&config, &topic, export.as_deref()).await?
        }
        Commands::Stats => cmd_stats(&config).await?,
        Commands::Verify => cmd_verify(&config).await?,
    }

    Ok(())
}

/// Every pipeline-touching command probes Ollama first; nothing runs
/// against a missing service or model.
async fn require_ready(config: &Config) -> Result<()> {
    EnvironmentCheck::new(config)
        .require_ready()
        .await
        .context("Environment is not ready")?;
    Ok(())
}

async fn cmd_ingest(config: &Config, colored: bool) -> Result<()> {
    info!("Starting ingestion pipeline");
    require_ready(config).await?;

    let start_time = Instant::now();

    let report = IngestPipeline::new(config)
        .run_with_color(colored)
        .await
        .context("Ingestion failed")?;

    let elapsed = start_time.elapsed();
    info!("Ingestion complete in {:.2}s", elapsed.as_secs_f64());

    println!(
        "{}",
        format_success(&format!(
            "Ingested {} page(s) into {} fragment(s) at {}",
            report.num_documents,
            report.num_chunks,
            report.index_path.display()
        ))
    );

    Ok(())
}

async fn cmd_ask(config: &Config, question: &str, show_chunks: bool) -> Result<()> {
    require_ready(config).await?;

    let engine = AnswerEngine::open(config)
        .await
        .context("Failed to open the index")?;

    let result = engine.answer(question).await.context("Answering failed")?;

    println!("\n{}\n", result.answer);

    if !result.sources.is_empty() {
        println!("Sources: {}", format_citations(&result.sources));
    }

    if show_chunks {
        for (idx, chunk) in result.chunks.iter().enumerate() {
            println!(
                "\n{}. {} (distance {:.4})",
                idx + 1,
                chunk.source_tag(),
                chunk.score
            );
            for line in chunk.content.lines().take(5) {
                println!("   {}", line);
            }
        }
    }

    Ok(())
}

async fn cmd_quiz(config: &Config, topic: &str, questions: usize) -> Result<()> {
    require_ready(config).await?;

    let engine = StudyEngine::open(config)
        .await
        .context("Failed to open the index")?;

    let quiz = engine
        .quiz(topic, questions)
        .await
        .context("Quiz generation failed")?;

    println!("\n{}\n", quiz.quiz);

    if !quiz.sources.is_empty() {
        println!("Sources: {}", format_citations(&quiz.sources));
    }

    Ok(())
}

async fn cmd_flashcards(config: &Config, topic: &str, export: Option<&std::path::Path>) -> Result<()> {
    require_ready(config).await?;

    let engine = StudyEngine::open(config)
        .await
        .context("Failed to open the index")?;

    let set = engine
        .flashcards(topic)
        .await
        .context("Flashcard generation failed")?;

    if set.flashcards.is_empty() {
        println!("{}", format_warning(&set.raw_text));
        return Ok(());
    }

    for (idx, card) in set.flashcards.iter().enumerate() {
        println!("\nCard {}", idx + 1);
        println!("  Q: {}", card.question);
        if let Some(answer) = &card.answer {
            println!("  A: {}", answer);
        }
        if let Some(source) = &card.source {
            println!("  Source: {}", source);
        }
    }

    println!("\nSources: {}", format_citations(&set.sources));

    if let Some(path) = export {
        let json = export_flashcards_json(&set.flashcards)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{}",
            format_success(&format!(
                "Exported {} card(s) to {}",
                set.flashcards.len(),
                path.display()
            ))
        );
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let store = VectorStore::open(&config.index_dir)
        .await
        .context("Failed to open the index")?;

    let count = store.count().await?;
    println!("Indexed fragments: {}", count);

    match IndexMetadata::load(&config.index_dir)? {
        Some(metadata) => {
            println!("Last build:        {}", metadata.last_build);
            println!("Embedding model:   {}", metadata.embed_model);
            println!("Chunk size:        {}", metadata.chunk_size);
            println!("Chunk overlap:     {}", metadata.chunk_overlap);

            if metadata.num_chunks != count {
                warn!(
                    "Sidecar records {} chunk(s) but the table holds {}",
                    metadata.num_chunks, count
                );
            }
        }
        None => {
            println!("{}", format_warning("No metadata sidecar found"));
        }
    }

    Ok(())
}

async fn cmd_verify(config: &Config) -> Result<()> {
    let report = EnvironmentCheck::new(config).verify().await;

    let line = |ok: bool, msg: &str| {
        if ok {
            format_success(msg)
        } else {
            format_error(msg)
        }
    };

    println!(
        "{}",
        line(
            report.service_running,
            &format!("Ollama reachable at {}", config.ollama_base_url)
        )
    );
    println!(
        "{}",
        line(
            report.llm_available,
            &format!("Generation model '{}' installed", config.llm_model)
        )
    );
    println!(
        "{}",
        line(
            report.embed_available,
            &format!("Embedding model '{}' installed", config.embed_model)
        )
    );

    if !report.is_ready() {
        anyhow::bail!("Environment is not ready");
    }

    Ok(())
}
