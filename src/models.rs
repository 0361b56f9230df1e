//! Core data types that flow through the ingestion and retrieval pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance category of a document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Pre-extracted book text (from PDFs and Markdown books).
    Book,
    /// Scraped web pages.
    Web,
    /// Machine walkthrough write-ups from mirrored repositories.
    Walkthrough,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Book => "book",
            SourceKind::Web => "web",
            SourceKind::Walkthrough => "walkthrough",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(SourceKind::Book),
            "web" => Ok(SourceKind::Web),
            "walkthrough" => Ok(SourceKind::Walkthrough),
            other => anyhow::bail!("Unknown source kind: {}", other),
        }
    }
}

/// A pre-extracted document as produced by the external extraction tooling.
///
/// The engine never parses PDFs or HTML itself; it consumes plain text plus
/// provenance.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub kind: SourceKind,
    /// File name, URL, or relative path depending on `kind`.
    pub origin: String,
    pub text: String,
}

/// A bounded overlapping word window of a document — the atomic unit of
/// retrieval. Chunk order is the order of production during ingestion and is
/// stable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub kind: SourceKind,
    pub origin: String,
    pub text: String,
}

/// A chunk paired with its query similarity, as returned by
/// [`crate::search::RetrievalEngine::retrieve`].
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// `1 / (1 + d)` for L2 distance `d`; in `(0, 1]`, higher is closer.
    pub score: f32,
}

/// Summary of one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
    pub chunks: usize,
    pub vectors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_roundtrip() {
        for kind in [SourceKind::Book, SourceKind::Web, SourceKind::Walkthrough] {
            let parsed: SourceKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_source_kind_rejects_unknown() {
        assert!("podcast".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_chunk_serializes_lowercase_kind() {
        let chunk = Chunk {
            kind: SourceKind::Walkthrough,
            origin: "htb/lame.md".to_string(),
            text: "smb exploit".to_string(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("\"walkthrough\""));
    }
}
