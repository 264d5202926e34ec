//! Terminal output for the interactive shell

use colored::*;
use std::io::{self, Write};

use docqa_core::{Answer, IngestReport};
use docqa_rag::IndexSummary;

const BANNER_WIDTH: usize = 60;

/// Questions asked in one session and how many got a grounded answer
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStats {
    pub questions: usize,
    pub answered: usize,
}

impl SessionStats {
    pub fn record(&mut self, answer: &Answer) {
        self.questions += 1;
        if !answer.is_insufficient() && !answer.is_failed() {
            self.answered += 1;
        }
    }
}

pub fn display_banner() {
    let border = "─".repeat(BANNER_WIDTH - 2);
    let lines = [
        "DocQA - Document Question Answering".to_string(),
        String::new(),
        "Load a PDF, DOCX or text file, then ask about it.".to_string(),
        format!("v{} • Answers by Groq", env!("CARGO_PKG_VERSION")),
    ];

    println!();
    println!("{}", format!("┌{}┐", border).blue());
    for line in lines {
        let padding = (BANNER_WIDTH - 4).saturating_sub(line.chars().count());
        println!("{}", format!("│ {}{} │", line, " ".repeat(padding)).blue());
    }
    println!("{}", format!("└{}┘", border).blue());
    println!();
    println!("{}", "Tip: 'load <path>' to add a document, 'help' for commands".dimmed());
    println!();
}

pub fn print_prompt(session: &str) -> io::Result<()> {
    print!("{} ", format!("docqa[{}]>", session).green().bold());
    io::stdout().flush()
}

pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Load a .pdf, .docx or .txt document", "load <path>".green());
    println!("  {} - Forget the loaded document", "reset".green());
    println!("  {} - Show the loaded document and question counts", "status".green());
    println!("  {} - Switch to another session", "session <name>".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit the application", "exit/quit".green());
    println!();
    println!("Any other input is asked as a question about the loaded document.");
}

pub fn print_ingest(report: &IngestReport) {
    if report.is_empty() {
        println!(
            "{} Document {} contains no text; nothing was indexed",
            "!".yellow(),
            report.doc_id
        );
        return;
    }
    println!(
        "{} Document processed: {} ({} chunks)",
        "✓".green(),
        report.doc_id.bold(),
        report.chunk_count
    );
}

pub fn print_answer(answer: &Answer) {
    match answer {
        Answer::Generated { text, .. } => println!("{} {}", "→".green(), text.trim()),
        Answer::Insufficient => println!("{} {}", "→".yellow(), answer.text()),
        Answer::Failed { message } => println!("{} {}", "✗".red(), message),
    }
}

pub fn print_error(context: &str, err: &dyn std::fmt::Display) {
    println!("{} {}: {}", "✗".red(), context, err);
}

pub fn print_status(session: &str, summary: Option<&IndexSummary>, stats: SessionStats) {
    println!("{} {}", "Session:".bold(), session);
    match summary {
        Some(summary) => println!(
            "{} {} ({} chunks, {}, loaded {})",
            "Document:".bold(),
            summary.doc_id,
            summary.chunk_count,
            summary.model_id,
            summary.created_at.format("%H:%M:%S")
        ),
        None => println!("{} {}", "Document:".bold(), "none".dimmed()),
    }
    println!(
        "{} {} asked, {} answered",
        "Questions:".bold(),
        stats.questions,
        stats.answered
    );
}
