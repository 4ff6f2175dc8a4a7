//! Command-line access to the documentation assistant.
//!
//! ```text
//! docs-agent ask "What payment methods does Checkout.com support?"
//! docs-agent upload ./docs --extensions md,txt
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use docs_agent::{
    logging,
    upload::{DocumentUploader, UploadOptions},
    AgentDeps, Config, DocsAgent,
};

#[derive(Parser)]
#[command(name = "docs-agent")]
#[command(about = "Ask the documentation assistant or ingest documentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question and show the context used
    Ask {
        /// The question to ask
        question: String,

        /// Print the full answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a directory of documentation files to the vector store
    Upload {
        /// Directory to scan recursively
        dir: PathBuf,

        /// Comma-separated list of file extensions to upload
        #[arg(long, value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("warn,docs_agent=info");

    let cli = Cli::parse();
    let config = Arc::new(Config::from_env().context("Failed to load configuration")?);
    let deps = AgentDeps::openai(config);

    match cli.command {
        Commands::Ask { question, json } => ask(deps, &question, json).await,
        Commands::Upload { dir, extensions } => upload(deps, &dir, extensions).await,
    }
}

async fn ask(deps: AgentDeps, question: &str, json: bool) -> Result<()> {
    let agent = DocsAgent::new(deps);

    if json {
        let answer = agent.answer(question).await;
        println!(
            "{}",
            serde_json::to_string_pretty(&answer).context("Failed to serialize answer")?
        );
        return Ok(());
    }

    println!("{}", format!("Asking: \"{}\"", question).bright_blue().bold());
    let answer = agent.answer(question).await;

    println!("\n{}", "Agent Response:".bright_green().bold());
    println!("{}", answer.response);

    if !answer.context().is_empty() {
        println!("\n{}", "Context Used:".bold());
        for result in answer.context() {
            println!("  {} {}", format!("[{:.2}]", result.score).dimmed(), result.source);
        }
    }

    if let Some(error) = answer.metadata.as_ref().and_then(|m| m.retrieval_error.as_ref()) {
        println!("\n{} {}", "Retrieval degraded:".yellow().bold(), error);
    }

    if let Some(error) = &answer.error {
        eprintln!("\n{} {}", "Agent error:".red().bold(), error);
    }

    Ok(())
}

async fn upload(deps: AgentDeps, dir: &Path, extensions: Option<Vec<String>>) -> Result<()> {
    let options = match extensions {
        Some(extensions) => UploadOptions::with_extensions(extensions),
        None => UploadOptions::default(),
    };

    println!(
        "{}",
        format!("Uploading documentation from {}...", dir.display())
            .bright_blue()
            .bold()
    );
    let report = DocumentUploader::new(&deps)
        .upload_dir(dir, &options)
        .await
        .context("Upload failed")?;

    for file in &report.uploaded {
        println!("  {} {} -> {}", "uploaded".green(), file.path.display(), file.file_id);
    }
    for (path, reason) in &report.failed {
        eprintln!("  {}   {}: {}", "failed".red(), path.display(), reason);
    }

    let summary = format!(
        "Upload completed: {} uploaded, {} failed, {} skipped.",
        report.uploaded.len(),
        report.failed.len(),
        report.skipped
    );
    println!("{}", summary.bright_green().bold());

    if !report.failed.is_empty() {
        anyhow::bail!("{} file(s) failed to upload", report.failed.len());
    }

    Ok(())
}
