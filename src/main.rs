//! # Lorebase CLI (`lore`)
//!
//! The `lore` binary drives the ingestion-and-retrieval engine.
//!
//! ## Usage
//!
//! ```bash
//! lore --config ./config/lore.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lore ingest` | Chunk and embed the configured corpora, write the index |
//! | `lore search "<query>"` | Top-k retrieval with a confidence label |
//! | `lore stats` | Index overview (counts, model, build time) |
//!
//! ## Examples
//!
//! ```bash
//! # Rebuild the index from the configured corpora
//! lore ingest --config ./config/lore.toml
//!
//! # Preview chunk counts without embedding or writing
//! lore ingest --dry-run
//!
//! # Retrieve the five nearest chunks
//! lore search "smb enumeration port 445" --k 5
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lorebase::{config, ingest, search, stats};

/// Lorebase — corpus ingestion and nearest-neighbor retrieval for a QA
/// assistant.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/lore.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "lore",
    about = "Lorebase — corpus ingestion and nearest-neighbor retrieval engine",
    version,
    long_about = "Lorebase chunks pre-extracted text corpora (books, scraped web pages, \
    walkthrough repositories) into overlapping word windows, embeds them, and serves \
    cached nearest-neighbor retrieval with an aggregate confidence label."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lore.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index from the configured corpora.
    ///
    /// Loads every configured document collection, chunks and embeds the
    /// documents, and replaces the persisted index in one transaction.
    /// Each run fully rebuilds the index. Ingestion is single-writer: do
    /// not run two ingests against the same database concurrently.
    Ingest {
        /// Show document and chunk counts without embedding or writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Retrieve the chunks nearest to a query.
    ///
    /// Fails with a "not built" error if no index exists; run `lore ingest`
    /// first. Prints ranked results with similarity scores and an aggregate
    /// HIGH/MEDIUM/LOW confidence label.
    Search {
        /// The query string.
        query: String,

        /// Number of results to return (defaults to retrieval.default_k).
        #[arg(long)]
        k: Option<usize>,
    },

    /// Show an overview of the built index.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Ingest { dry_run } => {
            ingest::run_ingest(&cfg, dry_run).await?;
        }
        Commands::Search { query, k } => {
            search::run_search(&cfg, &query, k).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
