//! Terminal chat for the CineQuery engine.
//!
//! A thin stand-in for the web chat UI: reads one question per line, runs
//! it through the routing core, and prints the answer. `--offline` swaps
//! the HTTP backends for a bundled in-memory catalog so the whole loop
//! works without any service running.
//!
//! Commands inside the loop: `exit`, `history`, `clear`.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cinequery_backend::{
    BackendAdapter, InMemorySemanticBackend, InMemoryStructuredBackend, SemanticHttpBackend,
    StructuredHttpBackend,
};
use cinequery_chat::{ChatEngine, Composer};
use cinequery_core::{CineError, MockGenerator, SemanticRecord, StructuredRecord, TextGenerator};
use cinequery_model::OpenAiGenerator;
use cinequery_router::{Classifier, KeywordClassifier, LlmClassifier, Orchestrator, RouterConfig};
use cinequery_session::InMemorySessionStore;

#[derive(Parser)]
#[command(name = "cinequery", about = "Chat with the movie catalog", version)]
struct Args {
    /// Endpoint of the structured (relational) query service.
    #[arg(long, default_value = "http://localhost:8001/sql")]
    structured_url: String,

    /// Endpoint of the semantic (plot-summary) retrieval service.
    #[arg(long, default_value = "http://localhost:8000/search")]
    semantic_url: String,

    /// Use the bundled in-memory catalog instead of the HTTP services.
    #[arg(long)]
    offline: bool,

    /// Route with the language model instead of keyword cues.
    #[arg(long)]
    llm_router: bool,

    /// Maximum items requested from each backend.
    #[arg(long, default_value_t = 5)]
    top_k: usize,

    /// Conversation turns retained per session.
    #[arg(long, default_value_t = 5)]
    window: usize,

    /// User id; each user gets an independent conversation history.
    #[arg(long, default_value = "default_user")]
    user: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    // -- Text generator ----------------------------------------------------
    // Without an API key the composer falls back to deterministic listings,
    // so the chat still works end to end.
    let generator: Arc<dyn TextGenerator> = match OpenAiGenerator::from_env() {
        Ok(generator) => Arc::new(generator),
        Err(_) => {
            println!("note: OPENAI_API_KEY not set; answers will be plain catalog listings\n");
            Arc::new(MockGenerator::unavailable())
        }
    };

    // -- Backends ----------------------------------------------------------
    let (structured, semantic): (Arc<dyn BackendAdapter>, Arc<dyn BackendAdapter>) =
        if args.offline {
            (
                Arc::new(InMemoryStructuredBackend::new(sample_rows())),
                Arc::new(InMemorySemanticBackend::new(sample_summaries())),
            )
        } else {
            (
                Arc::new(StructuredHttpBackend::new(args.structured_url.as_str())?),
                Arc::new(SemanticHttpBackend::new(args.semantic_url.as_str())?),
            )
        };

    // -- Routing core ------------------------------------------------------
    let classifier: Arc<dyn Classifier> = if args.llm_router {
        Arc::new(LlmClassifier::new(Arc::clone(&generator)))
    } else {
        Arc::new(KeywordClassifier::new()?)
    };

    let orchestrator = Orchestrator::builder()
        .classifier(classifier)
        .structured(structured)
        .semantic(semantic)
        .config(RouterConfig::builder().top_k(args.top_k).build()?)
        .build()?;

    let engine = ChatEngine::new(orchestrator, Composer::new(generator));
    let store = InMemorySessionStore::new(args.window);
    let mut session_id = args.user.clone();

    println!("CineQuery movie chat — user '{}'.", args.user);
    println!("Commands: 'exit' to quit, 'history' to review, 'clear' to start over.\n");

    let mut editor = DefaultEditor::new().context("failed to initialize line editor")?;
    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("readline failed"),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "history" => {
                let state = store.get_or_create(&session_id).await;
                let state = state.lock().await;
                if state.is_empty() {
                    println!("No previous messages.\n");
                } else {
                    for turn in state.recent(args.window) {
                        println!("You: {}", turn.query.text);
                        println!("CineQuery: {}\n", turn.answer);
                    }
                }
                continue;
            }
            "clear" => {
                // A fresh session id starts a new conversation; the old one
                // stays in the store until the process exits.
                session_id =
                    format!("{}-{}", args.user, chrono::Utc::now().format("%Y%m%d%H%M%S"));
                println!("Started a new conversation.\n");
                continue;
            }
            _ => {}
        }

        let state = store.get_or_create(&session_id).await;
        let mut state = state.lock().await;
        match engine.run_turn(&mut state, input).await {
            Ok(answer) => {
                info!(degraded = answer.degraded, sources = ?answer.sources, "turn complete");
                println!("\nCineQuery: {}", answer.text.trim_end());
                if answer.degraded {
                    println!("(partial answer — a data source was unavailable)");
                }
                println!();
            }
            Err(CineError::InvalidQuery(_)) => {
                println!("\nCineQuery: Please ask me something about the movie catalog.\n");
            }
            Err(err) => {
                println!("\nCineQuery: Something went wrong: {err}\n");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

// ---------------------------------------------------------------------------
// Bundled offline catalog
// ---------------------------------------------------------------------------

fn sample_rows() -> Vec<StructuredRecord> {
    let row = |title: &str, rentals: u64, rating: &str, year: i32, language: &str| {
        StructuredRecord {
            title: title.to_string(),
            rental_count: Some(rentals),
            rating: Some(rating.to_string()),
            release_year: Some(year),
            language: Some(language.to_string()),
        }
    };
    vec![
        row("Bucket Brotherhood", 34, "PG", 2006, "English"),
        row("Rocketeer Mother", 33, "PG-13", 2006, "English"),
        row("Zombie Halloween", 31, "R", 2006, "English"),
        row("Apache Divine", 31, "NC-17", 2006, "English"),
        row("Chamber Italian", 28, "PG-13", 2006, "Italian"),
        row("Outlaw Saturn", 26, "R", 2006, "English"),
        row("Graffiti Love", 25, "PG", 2006, "French"),
    ]
}

fn sample_summaries() -> Vec<SemanticRecord> {
    let rec = |title: &str, excerpt: &str, genres: &str| SemanticRecord {
        title: title.to_string(),
        excerpt: excerpt.to_string(),
        similarity_score: 0.0,
        release_year: Some(2006),
        genres: Some(genres.to_string()),
        actors: None,
    };
    vec![
        rec(
            "Zombie Halloween",
            "A small town fends off the undead during a horror-filled festival night.",
            "Horror",
        ),
        rec(
            "Chamber Italian",
            "A physicist builds a machine for time travel and unravels her own past.",
            "Drama, Sci-Fi",
        ),
        rec(
            "Outlaw Saturn",
            "A bounty hunter chases a fugitive across a lawless frontier colony.",
            "Western, Sci-Fi",
        ),
        rec(
            "Graffiti Love",
            "Two street artists fall in love while painting a dying neighborhood.",
            "Romance",
        ),
        rec(
            "Bucket Brotherhood",
            "Four estranged brothers reunite to finish their father's impossible list.",
            "Comedy, Drama",
        ),
    ]
}
