use anyhow::{anyhow, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use skel_embeddings::embedding_service_from_config;
use skel_indexer::{default_concurrency, inspect_file, render_sidecar, Analyzer, ProjectIndexer};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;

mod config;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "skelchunker")]
#[command(about = "Class skeletons and embedding-ready chunks for C# and JavaScript trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON configuration file (default: ./config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Folder to analyse, repeatable; replaces `folders` from the config
    #[arg(long = "folder", global = true)]
    folders: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every configured folder and write sidecars (default)
    Run,

    /// Analyse one file and print its sidecar JSON without writing it
    Inspect(InspectArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Source file to analyse
    file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if !cli.folders.is_empty() {
        config.folders = cli.folders;
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_index(config).await?,
        Commands::Inspect(args) => run_inspect(config, args).await?,
    }

    Ok(())
}

fn build_analyzer(config: &AppConfig) -> Result<Analyzer> {
    let registry = config.registry()?;
    let mut analyzer = Analyzer::new(Arc::new(registry));

    if let Some(service) = embedding_service_from_config(&config.embedding)
        .context("Failed to set up embedding service")?
    {
        log::info!(
            "Embeddings enabled: {} ({} dims)",
            service.model_name(),
            service.dimension()
        );
        analyzer = analyzer.with_embeddings(service, config.embedding.max_text_size);
    }

    Ok(analyzer)
}

async fn run_index(config: AppConfig) -> Result<()> {
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

    let analyzer = build_analyzer(&config)?;
    let indexer = ProjectIndexer::new(analyzer, config.scan_options())
        .with_concurrency(config.concurrency.unwrap_or_else(default_concurrency));

    let stats = indexer
        .index(&config.folders)
        .await
        .context("Failed to index folders")?;

    for error in &stats.errors {
        eprintln!("Error: {error}");
    }
    print_stdout(&serde_json::to_string_pretty(&stats)?)?;
    Ok(())
}

async fn run_inspect(config: AppConfig, args: InspectArgs) -> Result<()> {
    config
        .validate_analysis()
        .map_err(|e| anyhow!("Invalid configuration: {e}"))?;

    let analyzer = build_analyzer(&config)?;
    let analysis = inspect_file(&analyzer, &args.file)
        .await
        .with_context(|| format!("Failed to analyse {}", args.file.display()))?;

    if analysis.reused {
        log::debug!("{} is unchanged since its last sidecar", args.file.display());
    }
    print_stdout(render_sidecar(&analysis.result)?.trim_end())?;
    Ok(())
}
