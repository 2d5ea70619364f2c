use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use termscape::config::Config;
use termscape::embeddings::table::VectorTable;
use termscape::layout::umap::UmapReducer;
use termscape::output::terminal;
use termscape::pipeline::{rank_text, Pipeline};
use termscape::text::heuristic::HeuristicAnalyzer;

/// Termscape: lay out the most salient terms of a text on a 2D canvas.
///
/// Terms are ranked by TF-ICF, grouped into importance tiers and placed
/// by reducing their word vectors to two dimensions.
#[derive(Parser)]
#[command(name = "termscape", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print positioned terms
    Layout {
        /// Text to analyze (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print JSON records instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank and tier terms without laying them out (no word vectors needed)
    Rank {
        /// Text to analyze (reads stdin when neither TEXT nor --file is given)
        text: Option<String>,

        /// Read the text from a file instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Print JSON records instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8000)
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind to (default: localhost)
        #[arg(long, default_value = "localhost")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("termscape=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Layout { text, file, json } => {
            let config = Config::load()?;
            let text = read_input(text, file.as_deref())?;
            let pipeline = build_pipeline(&config)?;

            // UMAP is CPU-bound; keep it off the async workers
            let run = tokio::task::spawn_blocking(move || pipeline.run_detailed(&text))
                .await
                .context("Pipeline task panicked")??;

            if json {
                println!("{}", serde_json::to_string_pretty(&run.layouts)?);
            } else {
                terminal::display_layout(&run.layouts, &run.missing_embeddings);
            }
        }

        Commands::Rank { text, file, json } => {
            let config = Config::load()?;
            let text = read_input(text, file.as_deref())?;

            let ranked = rank_text(&HeuristicAnalyzer::new(), &config.pipeline, &text)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
            } else {
                terminal::display_ranked_terms(&ranked);
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let pipeline = build_pipeline(&config)?;

            println!("Starting termscape API on http://{bind}:{port}");
            termscape::web::run_server(pipeline, port, &bind).await?;
        }
    }

    Ok(())
}

/// Load the word vectors once and compose the default pipeline around them.
fn build_pipeline(config: &Config) -> Result<Pipeline> {
    config.require_vectors()?;

    let table = VectorTable::load(&config.vectors_path)
        .with_context(|| format!("Failed to load {}", config.vectors_path.display()))?;
    info!(
        words = table.len(),
        path = %config.vectors_path.display(),
        "Word vectors loaded"
    );

    let pipeline = Pipeline::new(
        Arc::new(HeuristicAnalyzer::new()),
        Arc::new(table),
        Arc::new(UmapReducer::with_epochs(config.epochs)),
        config.pipeline.clone(),
    )?;
    Ok(pipeline)
}

/// Take the text from the argument, the file, or stdin, in that order.
fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    eprintln!("{}", "Reading text from stdin (Ctrl-D to finish)...".dimmed());
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}
