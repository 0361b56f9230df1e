//! # Lorebase
//!
//! Corpus ingestion and nearest-neighbor retrieval engine for a downstream
//! question-answering assistant.
//!
//! Lorebase converts heterogeneous pre-extracted text corpora (books,
//! scraped web pages, mirrored walkthrough repositories) into overlapping
//! word-window chunks, embeds each chunk, persists a composite vector index
//! in SQLite, and serves cached top-k nearest-neighbor retrieval with an
//! aggregate HIGH/MEDIUM/LOW confidence label.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ Corpus Loader │──▶│ Chunk + Embed │──▶│   SQLite     │
//! │ book/web/wt   │   │  (ingest)     │   │ entries+meta │
//! └──────────────┘   └──────────────┘   └──────┬──────┘
//!                                              │ load once
//!                                              ▼
//!                                   ┌─────────────────────┐
//!                                   │  RetrievalEngine     │
//!                                   │  k-NN + query cache  │
//!                                   └─────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```bash
//! lore ingest                     # chunk + embed + write the index
//! lore search "smb port 445" --k 3
//! lore stats                      # what's in the index
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`corpus`] | Document collection loading |
//! | [`chunk`] | Overlapping word-window chunking |
//! | [`embedding`] | Embedder collaborator boundary |
//! | [`store`] | Composite index persistence |
//! | [`ingest`] | Index building |
//! | [`search`] | Retrieval engine |
//! | [`cache`] | LRU query-embedding cache |
//! | [`confidence`] | Aggregate confidence classification |

pub mod cache;
pub mod chunk;
pub mod config;
pub mod confidence;
pub mod corpus;
pub mod db;
pub mod embedding;
pub mod ingest;
pub mod models;
pub mod search;
pub mod stats;
pub mod store;
