use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use docqa_core::{LLMProvider, RagConfig};
use docqa_embed::EmbedderConfig;
use docqa_groq::GroqClient;
use docqa_rag::{RagPipeline, SessionRegistry};

mod ui;

use ui::SessionStats;

const DEFAULT_SESSION: &str = "default";

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "Ask questions about a PDF, DOCX or text document", long_about = None)]
struct Cli {
    /// Document to load at startup
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Use the offline hashing embedder instead of downloading a model
    #[arg(long)]
    hash_embeddings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docqa=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let rag_config = RagConfig::from_env()?;
    let mut embedder_config = EmbedderConfig::from_env()?;
    if cli.hash_embeddings {
        embedder_config = embedder_config.hashed();
    }
    let embedder = embedder_config.build()?;
    let llm: Arc<dyn LLMProvider> =
        Arc::new(GroqClient::from_env().context("Groq client is not configured")?);

    let registry = SessionRegistry::new(move || {
        RagPipeline::with_document_extractor(&rag_config, embedder.clone(), llm.clone())
    });

    let mut session = DEFAULT_SESSION.to_string();
    let mut stats: HashMap<String, SessionStats> = HashMap::new();

    if let Some(path) = &cli.file {
        let pipeline = registry.session(&session).await?;
        let report = pipeline
            .ingest_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        ui::print_ingest(&report);
    }

    // Single question mode
    if let Some(question) = cli.question {
        let pipeline = registry.session(&session).await?;
        let answer = pipeline.ask(&question).await;
        println!("{}", answer);
        return Ok(());
    }

    ui::display_banner();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        ui::print_prompt(&session)?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, argument) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command.to_lowercase(), rest.trim()),
            None => (input.to_lowercase(), ""),
        };
        let pipeline = registry.session(&session).await?;

        match command.as_str() {
            "exit" | "quit" if argument.is_empty() => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" if argument.is_empty() => ui::print_help(),
            "reset" if argument.is_empty() => {
                pipeline.reset();
                println!("{} Document cleared", "✓".green());
            }
            "status" if argument.is_empty() => {
                let summary = pipeline.index_summary();
                let session_stats = stats.get(&session).copied().unwrap_or_default();
                ui::print_status(&session, summary.as_ref(), session_stats);
                println!("{} {}", "Sessions:".bold(), registry.keys().await.join(", "));
            }
            "load" => {
                if argument.is_empty() {
                    println!("{} Usage: load <path>", "!".yellow());
                    continue;
                }
                println!("{} Processing document...", "…".blue());
                match pipeline.ingest_file(Path::new(argument)).await {
                    Ok(report) => ui::print_ingest(&report),
                    Err(e) => ui::print_error("Could not load document", &e),
                }
            }
            "session" => {
                if argument.is_empty() {
                    println!("{} Usage: session <name>", "!".yellow());
                    continue;
                }
                session = argument.to_string();
                let state = registry.session(&session).await?.state();
                println!("{} Switched to session {} ({:?})", "✓".green(), session.bold(), state);
            }
            _ => {
                let answer = pipeline.ask(input).await;
                stats.entry(session.clone()).or_default().record(&answer);
                ui::print_answer(&answer);
            }
        }
    }

    Ok(())
}
