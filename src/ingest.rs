//! Index builder.
//!
//! Consumes the corpus loader's ordered chunk sequence, embeds it in
//! batches, and replaces the persisted index in one transaction. Building is
//! a single-writer batch job: callers must not run two ingestions against
//! the same database concurrently.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::corpus;
use crate::db;
use crate::embedding::{create_embedder, Embedder};
use crate::models::{BuildReport, DocumentRecord};
use crate::store::{self, IndexMeta};

/// Embed every chunk of `docs` and replace the persisted index.
///
/// An empty chunk sequence is a no-op that reports zero chunks — nothing is
/// written, so a previous index (if any) survives and a fresh database never
/// gains an empty artifact. An embedding failure
/// fails the whole build; partially embedded corpora are never persisted.
pub async fn build_index(
    pool: &SqlitePool,
    embedder: &dyn Embedder,
    config: &Config,
    docs: &[DocumentRecord],
) -> Result<BuildReport> {
    let chunks = corpus::collect_chunks(docs, &config.chunking);

    if chunks.is_empty() {
        return Ok(BuildReport {
            documents: docs.len(),
            chunks: 0,
            vectors: 0,
        });
    }

    let mut vectors = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(config.embedding.batch_size) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let batch_vectors = embedder.encode_many(&texts).await?;
        vectors.extend(batch_vectors);
    }

    store::init_schema(pool).await?;

    let meta = IndexMeta {
        model: embedder.model_name().to_string(),
        dims: embedder.dims(),
        built_at: chrono::Utc::now().timestamp(),
    };
    store::replace_entries(pool, &chunks, &vectors, &meta).await?;

    Ok(BuildReport {
        documents: docs.len(),
        chunks: chunks.len(),
        vectors: vectors.len(),
    })
}

/// Run the `lore ingest` command: load the corpus, build the index, print a
/// report.
pub async fn run_ingest(config: &Config, dry_run: bool) -> Result<()> {
    let docs = corpus::load_corpus(&config.corpus)?;

    if dry_run {
        let chunks = corpus::collect_chunks(&docs, &config.chunking);
        println!("ingest (dry-run)");
        println!("  documents found: {}", docs.len());
        println!("  estimated chunks: {}", chunks.len());
        return Ok(());
    }

    let embedder = create_embedder(&config.embedding)?;
    let pool = db::connect(&config.db.path).await?;

    let report = build_index(&pool, embedder.as_ref(), config, &docs).await?;

    println!("ingest");
    println!("  documents: {}", report.documents);
    println!("  chunks: {}", report.chunks);
    println!("  vectors: {}", report.vectors);
    if report.chunks == 0 {
        println!("  nothing to index — no artifacts written");
    } else {
        println!("  index written to {}", config.db.path.display());
    }
    println!("ok");

    pool.close().await;
    Ok(())
}
