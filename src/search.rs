//! Retrieval engine: cached nearest-neighbor search over the built index.
//!
//! The engine loads the persisted index once at startup and serves top-k
//! queries for the lifetime of the process. Loading fails fast if the index
//! has not been built — retrieval never runs against a partial or absent
//! artifact. Picking up a rebuilt index requires a fresh process.
//!
//! Concurrency: the entries are read-only after load and shared freely; the
//! query cache is the only mutable state and sits behind an async mutex so
//! lookup → encode → insert is one mutual-exclusion region.

use anyhow::{bail, Result};
use tokio::sync::Mutex;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::confidence::classify_confidence;
use crate::db;
use crate::embedding::{create_embedder, l2_distance, Embedder};
use crate::models::ScoredChunk;
use crate::store::{self, IndexEntry, IndexMeta};

pub struct RetrievalEngine {
    entries: Vec<IndexEntry>,
    meta: IndexMeta,
    embedder: Box<dyn Embedder>,
    cache: Mutex<QueryCache>,
}

impl std::fmt::Debug for RetrievalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalEngine")
            .field("entries", &self.entries)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl RetrievalEngine {
    /// Load the persisted index and enter the serving state.
    ///
    /// Fails if the database file does not exist or holds no entries; the
    /// caller must run `lore ingest` first. After a successful load the
    /// engine treats the index as immutable.
    pub async fn load(config: &Config) -> Result<Self> {
        if !config.db.path.exists() {
            bail!(
                "Index not built at {}. Run `lore ingest` first.",
                config.db.path.display()
            );
        }

        let pool = db::connect(&config.db.path).await?;

        if !store::is_built(&pool).await? {
            pool.close().await;
            bail!(
                "Index at {} is empty. Run `lore ingest` first.",
                config.db.path.display()
            );
        }

        let entries = store::load_entries(&pool).await?;
        let meta = store::load_meta(&pool).await?;
        pool.close().await;

        let meta = match meta {
            Some(m) => m,
            None => bail!("Index metadata missing — rebuild with `lore ingest`."),
        };

        let embedder = create_embedder(&config.embedding)?;
        if embedder.dims() != 0 && embedder.dims() != meta.dims {
            bail!(
                "Index was built with {} dimensions but provider '{}' produces {}. Rebuild with `lore ingest`.",
                meta.dims,
                embedder.model_name(),
                embedder.dims()
            );
        }

        Ok(Self::from_parts(
            entries,
            meta,
            embedder,
            config.retrieval.cache_capacity,
        ))
    }

    /// Assemble an engine from already-loaded parts. Library entry point;
    /// `load` is the checked path the CLI uses.
    pub fn from_parts(
        entries: Vec<IndexEntry>,
        meta: IndexMeta,
        embedder: Box<dyn Embedder>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            entries,
            meta,
            embedder,
            cache: Mutex::new(QueryCache::new(cache_capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    /// Query embedding via the cache: a hit returns the stored vector
    /// without touching the embedder; a miss encodes once and stores the
    /// result, evicting the least-recently-used entry at capacity.
    async fn query_embedding(&self, query: &str) -> Result<Vec<f32>> {
        let mut cache = self.cache.lock().await;

        if let Some(vector) = cache.get(query) {
            return Ok(vector);
        }

        let vector = self.embedder.encode(query).await?;
        cache.insert(query.to_string(), vector.clone());
        Ok(vector)
    }

    /// Top-k nearest neighbors of `query` by L2 distance, nearest first.
    ///
    /// Returns up to `k` chunks with similarity `1 / (1 + distance)`,
    /// sorted by non-increasing score. Fewer than `k` entries in the index
    /// returns all of them; an empty index returns an empty result.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.query_embedding(query).await?;

        let mut hits: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|entry| (l2_distance(&query_vec, &entry.vector), entry))
            .collect();

        hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);

        Ok(hits
            .into_iter()
            .map(|(distance, entry)| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: 1.0 / (1.0 + distance),
            })
            .collect())
    }
}

/// Run the `lore search` command: load the engine, retrieve, and print the
/// ranked results with an aggregate confidence label.
pub async fn run_search(config: &Config, query: &str, k: Option<usize>) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    let engine = RetrievalEngine::load(config).await?;
    let k = k.unwrap_or(config.retrieval.default_k);

    let results = engine.retrieve(query, k).await?;
    let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
    let confidence = classify_confidence(&scores);

    if results.is_empty() {
        println!("No results.");
        println!("confidence: {}", confidence);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        let excerpt: String = result.chunk.text.chars().take(240).collect();
        println!(
            "{}. [{:.3}] {} / {}",
            i + 1,
            result.score,
            result.chunk.kind,
            result.chunk.origin
        );
        println!("    excerpt: \"{}\"", excerpt.replace('\n', " "));
        println!();
    }

    println!("confidence: {}", confidence);
    Ok(())
}
