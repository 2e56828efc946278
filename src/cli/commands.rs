//! CLI commands implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;

use crate::config::TriageConfig;
use crate::models::{BatchOutcome, FileOutcome, MemoryEvidenceStore, SourceImage};
use crate::ocr::{OcrBackend, TesseractBackend};
use crate::services::TriageService;

#[derive(Parser)]
#[command(name = "evitriage")]
#[command(about = "OCR-based evidence image triage")]
#[command(version)]
pub struct Cli {
    /// Config file path (default: evitriage.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single evidence image
    Process {
        /// Image file to process
        file: PathBuf,
        /// Tesseract language (overrides config)
        #[arg(short, long)]
        language: Option<String>,
        /// Emit the result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Process a batch of evidence images
    Batch {
        /// Image files to process (at most the configured batch size)
        files: Vec<PathBuf>,
        /// Number of OCR workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Emit the result as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Submit evidence with an OCR-enhanced description
    Submit {
        /// Case title
        #[arg(short, long)]
        title: String,
        /// Case description
        #[arg(short, long)]
        description: String,
        /// Submitter name
        #[arg(short, long, default_value = "anonymous")]
        submitted_by: String,
        /// Attached image files
        files: Vec<PathBuf>,
    },

    /// Check whether the OCR engine is installed
    Check,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = TriageConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            file,
            language,
            json,
        } => {
            let config = match language {
                Some(lang) => config.with_language(&lang),
                None => config,
            };
            cmd_process(config, &file, json)
        }
        Commands::Batch {
            files,
            workers,
            json,
        } => {
            let config = match workers {
                Some(workers) => config.with_workers(workers),
                None => config,
            };
            cmd_batch(config, &files, json).await
        }
        Commands::Submit {
            title,
            description,
            submitted_by,
            files,
        } => cmd_submit(config, title, description, submitted_by, &files).await,
        Commands::Check => cmd_check(config),
    }
}

fn make_service(config: TriageConfig) -> Arc<TriageService> {
    let backend = TesseractBackend::with_language(&config.tesseract_language);
    Arc::new(TriageService::new(Arc::new(backend), config))
}

fn load_images(files: &[PathBuf]) -> anyhow::Result<Vec<SourceImage>> {
    files
        .iter()
        .map(|path| {
            SourceImage::from_path(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))
        })
        .collect()
}

fn cmd_process(config: TriageConfig, file: &Path, json: bool) -> anyhow::Result<()> {
    let service = make_service(config);
    let image = load_images(&[file.to_path_buf()])?.remove(0);
    let outcome = service.process_single(&image)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    render_file_outcome(&outcome);
    Ok(())
}

async fn cmd_batch(config: TriageConfig, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    if files.is_empty() {
        anyhow::bail!("no input files given");
    }
    let service = make_service(config);
    let images = load_images(files)?;
    let batch = service.process_batch(images).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    render_batch_outcome(&batch);
    Ok(())
}

async fn cmd_submit(
    config: TriageConfig,
    title: String,
    description: String,
    submitted_by: String,
    files: &[PathBuf],
) -> anyhow::Result<()> {
    let service = make_service(config);
    let store = MemoryEvidenceStore::new();
    let images = load_images(files)?;

    let record = service
        .submit_evidence(&store, title, description, submitted_by, images)
        .await?;

    println!(
        "{} Evidence #{} submitted ({} file{})",
        style("✓").green(),
        record.id,
        record.file_count,
        if record.file_count == 1 { "" } else { "s" }
    );
    println!("\n{}", style("Stored description:").bold());
    println!("{}", record.description);
    Ok(())
}

fn cmd_check(config: TriageConfig) -> anyhow::Result<()> {
    let backend = TesseractBackend::with_language(&config.tesseract_language);

    println!("\n{}", style("OCR Tool Status").bold());
    println!("{}", "-".repeat(50));

    let status = if backend.is_available() {
        style("✓ available").green()
    } else {
        style("✗ not available").red()
    };
    println!("  {:<15} {}", backend.name(), status);
    if !backend.is_available() {
        println!("                  {}", style(backend.availability_hint()).dim());
    }
    Ok(())
}

fn render_file_outcome(outcome: &FileOutcome) {
    if outcome.success {
        println!(
            "{} {} ({} words, {:.1}% confidence)",
            style("✓").green(),
            outcome.file_name,
            outcome.word_count,
            outcome.confidence_score
        );
        if !outcome.extracted_text.is_empty() {
            println!("\n{}", style("Extracted text:").bold());
            println!("{}", outcome.extracted_text);
        }
        println!("\n{}", outcome.analysis);
    } else {
        println!(
            "{} {}: {}",
            style("✗").red(),
            outcome.file_name,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn render_batch_outcome(batch: &BatchOutcome) {
    for outcome in &batch.results {
        let mark = if outcome.success {
            style("✓").green()
        } else {
            style("✗").red()
        };
        match &outcome.error {
            Some(error) => println!("{mark} {} ({error})", outcome.file_name),
            None => println!(
                "{mark} {} ({} words, {:.1}% confidence)",
                outcome.file_name, outcome.word_count, outcome.confidence_score
            ),
        }
    }
    println!("\n{}", batch.combined_analysis);
}
