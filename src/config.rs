use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

/// Locations of the pre-extracted document collections. Every collection is
/// optional; ingestion processes whichever are configured and present.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorpusConfig {
    /// JSONL file of extracted book text, one record per line.
    pub books_file: Option<PathBuf>,
    /// Directory of scraped-page JSON files.
    pub web_dir: Option<PathBuf>,
    /// Directory tree of walkthrough Markdown files.
    pub walkthroughs_dir: Option<PathBuf>,
    /// Glob patterns selecting walkthrough files within `walkthroughs_dir`.
    #[serde(default = "default_walkthrough_globs")]
    pub walkthrough_globs: Vec<String>,
}

fn default_walkthrough_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Words per chunk window.
    #[serde(default = "default_window_words")]
    pub window_words: usize,
    /// Words shared between consecutive windows.
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,
    /// Windows shorter than this many characters are discarded.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_words: default_window_words(),
            overlap_words: default_overlap_words(),
            min_chars: default_min_chars(),
        }
    }
}

fn default_window_words() -> usize {
    500
}
fn default_overlap_words() -> usize {
    50
}
fn default_min_chars() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Result count when the caller does not specify `k`.
    #[serde(default = "default_k")]
    pub default_k: usize,
    /// Bound on the query-embedding cache (LRU eviction beyond this).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_k() -> usize {
    3
}
fn default_cache_capacity() -> usize {
    100
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            dims: None,
            batch_size: 64,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate chunking
    if config.chunking.window_words == 0 {
        anyhow::bail!("chunking.window_words must be > 0");
    }
    if config.chunking.overlap_words >= config.chunking.window_words {
        anyhow::bail!("chunking.overlap_words must be < chunking.window_words");
    }

    // Validate retrieval
    if config.retrieval.default_k == 0 {
        anyhow::bail!("retrieval.default_k must be >= 1");
    }
    if config.retrieval.cache_capacity == 0 {
        anyhow::bail!("retrieval.cache_capacity must be >= 1");
    }

    // Validate embedding
    if config.embedding.is_enabled() {
        if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                config.embedding.provider
            );
        }
    }

    match config.embedding.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    Ok(config)
}
