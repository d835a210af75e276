//! CLI glue for highlight-export: argument parsing, wiring collaborators
//! from config, and user-visible output.
//!
//! All aggregation and rendering lives in `highlight-export-core`; this module
//! only picks the quote source, the store and the renderer timezone.
//!
//! For programmatic/integration use, call [`run`] with a constructed [`Cli`].
use crate::load_config::{load_config, CliConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use highlight_export_core::config::SourceConfig;
use highlight_export_core::contract::QuoteSource;
use highlight_export_core::download::{fetch_all, BookmateClient, JsonFileSource};
use highlight_export_core::export::export;
use highlight_export_core::model::Quote;
use highlight_export_core::render::DocumentRenderer;
use highlight_export_core::store::FsStore;
use std::path::{Path, PathBuf};

/// CLI for highlight-export: one Markdown document per book from your highlights.
#[derive(Parser)]
#[clap(
    name = "highlight-export",
    version,
    about = "Export highlighted quotes into one Markdown document per book"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all quotes and write one document per book using the given config file
    Export {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Also save the fetched quotes as JSON (readable again with `type: file`)
        #[clap(long)]
        dump: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Export { config, dump } => {
            let config = load_config(config)?;
            tracing::info!(command = "export", "Starting export");

            let source = build_source(&config).await?;
            let quotes = fetch_all(&*source, config.export.source.per_page()).await?;
            println!("Fetched {} quotes", quotes.len());

            if let Some(path) = dump {
                write_dump(&path, &quotes).await?;
                println!("Saved raw quotes to {}", path.display());
            }

            let store = FsStore::new(&config.export.output.dir);
            tracing::info!(dir = %store.dir().display(), "Writing documents");
            let renderer = DocumentRenderer::local();
            match export(
                &quotes,
                &renderer,
                &store,
                config.export.output.on_title_collision,
            )
            .await
            {
                Ok(report) => {
                    for doc in &report.documents {
                        println!("  {} ({} quotes)", doc.path.display(), doc.quotes);
                    }
                    println!(
                        "Exported {} quotes into {} documents",
                        report.quotes(),
                        report.documents.len()
                    );
                    tracing::debug!(command = "export", ?report, "Export report");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "export", error = %e, "Export failed");
                    Err(e.into())
                }
            }
        }
    }
}

async fn build_source(config: &CliConfig) -> Result<Box<dyn QuoteSource>> {
    match &config.export.source {
        SourceConfig::Bookmate(bookmate) => {
            let credentials = config
                .credentials
                .clone()
                .context("Bookmate source requires credentials")?;
            Ok(Box::new(BookmateClient::new(
                bookmate.base_url.clone(),
                credentials,
            )))
        }
        SourceConfig::File(file) => {
            let source = JsonFileSource::open(&file.path)
                .await
                .with_context(|| format!("Failed to open quotes file {}", file.path.display()))?;
            tracing::info!(path = %source.path().display(), "Reading quotes from file");
            Ok(Box::new(source))
        }
    }
}

async fn write_dump(path: &Path, quotes: &[Quote]) -> Result<()> {
    let json = serde_json::to_string_pretty(quotes).context("Failed to serialise quotes")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write dump {}", path.display()))?;
    tracing::info!(path = %path.display(), quotes = quotes.len(), "Wrote quotes dump");
    Ok(())
}
