//! Overlapping word-window chunker.
//!
//! Splits a document's normalized text into fixed-size windows of
//! `window_words` words that overlap by `overlap_words`, so no passage is
//! lost at a window boundary. Windows whose joined text falls below
//! `min_chars` are discarded (near-empty trailing windows carry no signal).
//!
//! Chunking is stateless per document and order-preserving: the emitted
//! sequence follows word order, and every chunk carries its document's
//! provenance unchanged.

use crate::config::ChunkingConfig;
use crate::models::{Chunk, SourceKind};

/// Split one document into overlapping word-window chunks.
///
/// The window advances by `window_words - overlap_words` each step (config
/// validation guarantees this is positive). Documents shorter than one
/// window yield at most one chunk; empty or all-whitespace text yields none.
pub fn chunk_document(
    text: &str,
    kind: SourceKind,
    origin: &str,
    config: &ChunkingConfig,
) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let step = config.window_words - config.overlap_words;
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < words.len() {
        let end = (start + config.window_words).min(words.len());
        let window = words[start..end].join(" ");

        if window.len() >= config.min_chars {
            chunks.push(Chunk {
                kind,
                origin: origin.to_string(),
                text: window,
            });
        }

        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(window: usize, overlap: usize, min_chars: usize) -> ChunkingConfig {
        ChunkingConfig {
            window_words: window,
            overlap_words: overlap,
            min_chars,
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{:04}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_document_single_chunk() {
        let text = words(10);
        let chunks = chunk_document(&text, SourceKind::Book, "intro.pdf", &config(500, 50, 5));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].origin, "intro.pdf");
    }

    #[test]
    fn test_empty_document_no_chunks() {
        let chunks = chunk_document("", SourceKind::Web, "http://x", &config(500, 50, 5));
        assert!(chunks.is_empty());
        let chunks = chunk_document("   \n\t ", SourceKind::Web, "http://x", &config(500, 50, 5));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_window_step_arithmetic() {
        // 25 words, window 10, overlap 3 => step 7 => starts 0,7,14,21
        let text = words(25);
        let chunks = chunk_document(&text, SourceKind::Book, "b", &config(10, 3, 1));
        assert_eq!(chunks.len(), 4);
        assert!(chunks[0].text.starts_with("word0000"));
        assert!(chunks[1].text.starts_with("word0007"));
        assert!(chunks[2].text.starts_with("word0014"));
        assert!(chunks[3].text.starts_with("word0021"));
        // Last window is the 4-word tail.
        assert_eq!(chunks[3].text, "word0021 word0022 word0023 word0024");
    }

    #[test]
    fn test_consecutive_windows_share_overlap() {
        let text = words(30);
        let chunks = chunk_document(&text, SourceKind::Book, "b", &config(10, 4, 1));
        let first: Vec<&str> = chunks[0].text.split(' ').collect();
        let second: Vec<&str> = chunks[1].text.split(' ').collect();
        assert_eq!(&first[first.len() - 4..], &second[..4]);
    }

    #[test]
    fn test_full_word_coverage() {
        // Every word index must land in at least one window.
        let n = 97;
        let text = words(n);
        let cfg = config(10, 3, 1);
        let chunks = chunk_document(&text, SourceKind::Walkthrough, "w", &cfg);

        let mut covered = vec![false; n];
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * (cfg.window_words - cfg.overlap_words);
            for offset in 0..chunk.text.split(' ').count() {
                covered[start + offset] = true;
            }
        }
        assert!(covered.iter().all(|&c| c), "some word index was skipped");
    }

    #[test]
    fn test_min_chars_floor_discards_tiny_windows() {
        // 21 words, window 10, overlap 0: windows of 10, 10, and 1 word.
        // The one-word tail ("word0020", 8 chars) is below a 20-char floor.
        let text = words(21);
        let chunks = chunk_document(&text, SourceKind::Book, "b", &config(10, 0, 20));
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_below_floor_short_document_yields_nothing() {
        let chunks = chunk_document("tiny", SourceKind::Book, "b", &config(500, 50, 50));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_words_joined_with_single_spaces() {
        let chunks = chunk_document(
            "alpha\n\nbeta\t gamma   delta",
            SourceKind::Web,
            "u",
            &config(500, 50, 1),
        );
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "alpha beta gamma delta");
    }

    #[test]
    fn test_deterministic() {
        let text = words(120);
        let cfg = config(30, 5, 10);
        let a = chunk_document(&text, SourceKind::Book, "b", &cfg);
        let b = chunk_document(&text, SourceKind::Book, "b", &cfg);
        assert_eq!(a, b);
    }
}
