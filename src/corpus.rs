//! Corpus loader.
//!
//! Walks the configured document collections — pre-extracted book text,
//! scraped web pages, and mirrored walkthrough repositories — and produces
//! the full ordered sequence of [`DocumentRecord`]s, then chunks. The order
//! established here is the canonical chunk order the index builder persists.
//!
//! Partial-failure isolation: a malformed line, an unparseable JSON file, or
//! an unreadable path is skipped with a warning and never aborts the run.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::Path;
use walkdir::WalkDir;

use crate::chunk::chunk_document;
use crate::config::{ChunkingConfig, CorpusConfig};
use crate::models::{Chunk, DocumentRecord, SourceKind};

/// One line of the extracted-books JSONL file.
#[derive(Debug, Deserialize)]
struct BookRecord {
    #[serde(default)]
    book: Option<String>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    text: String,
}

/// One scraped-page JSON file.
#[derive(Debug, Deserialize)]
struct WebRecord {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    text: String,
}

/// Load every document from every configured collection, in fixed
/// collection order (books, web, walkthroughs).
pub fn load_corpus(config: &CorpusConfig) -> Result<Vec<DocumentRecord>> {
    let mut docs = Vec::new();

    if let Some(ref books_file) = config.books_file {
        if books_file.exists() {
            load_books(books_file, &mut docs)?;
        } else {
            eprintln!("Warning: books file not found, skipping: {}", books_file.display());
        }
    }

    if let Some(ref web_dir) = config.web_dir {
        if web_dir.exists() {
            load_web(web_dir, &mut docs)?;
        } else {
            eprintln!("Warning: web directory not found, skipping: {}", web_dir.display());
        }
    }

    if let Some(ref walkthroughs_dir) = config.walkthroughs_dir {
        if walkthroughs_dir.exists() {
            load_walkthroughs(walkthroughs_dir, &config.walkthrough_globs, &mut docs)?;
        } else {
            eprintln!(
                "Warning: walkthroughs directory not found, skipping: {}",
                walkthroughs_dir.display()
            );
        }
    }

    Ok(docs)
}

/// Chunk every document in corpus order, concatenating per-document chunk
/// sequences into the one canonical total order.
pub fn collect_chunks(docs: &[DocumentRecord], chunking: &ChunkingConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for doc in docs {
        chunks.extend(chunk_document(&doc.text, doc.kind, &doc.origin, chunking));
    }
    chunks
}

fn load_books(path: &Path, docs: &mut Vec<DocumentRecord>) -> Result<()> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: could not read {}: {}", path.display(), e);
            return Ok(());
        }
    };

    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<BookRecord>(line) {
            Ok(record) => {
                let origin = record
                    .file
                    .or(record.book)
                    .unwrap_or_else(|| "unknown".to_string());
                docs.push(DocumentRecord {
                    kind: SourceKind::Book,
                    origin,
                    text: record.text,
                });
            }
            Err(e) => {
                eprintln!(
                    "Warning: skipping malformed book record at {}:{}: {}",
                    path.display(),
                    line_no + 1,
                    e
                );
            }
        }
    }

    Ok(())
}

fn load_web(dir: &Path, docs: &mut Vec<DocumentRecord>) -> Result<()> {
    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
        .collect();

    // Sort for deterministic ordering across runs
    paths.sort();

    for path in paths {
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: could not read {}: {}", path.display(), e);
                continue;
            }
        };

        match serde_json::from_str::<WebRecord>(&content) {
            Ok(record) => {
                let origin = record
                    .url
                    .unwrap_or_else(|| path.to_string_lossy().to_string());
                docs.push(DocumentRecord {
                    kind: SourceKind::Web,
                    origin,
                    text: record.text,
                });
            }
            Err(e) => {
                eprintln!("Warning: skipping malformed page {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}

fn load_walkthroughs(dir: &Path, globs: &[String], docs: &mut Vec<DocumentRecord>) -> Result<()> {
    let include_set = build_globset(globs)?;

    let mut paths: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    paths.sort();

    for path in paths {
        let relative = path.strip_prefix(dir).unwrap_or(&path);
        let rel_str = relative.to_string_lossy().to_string();

        if !include_set.is_match(&rel_str) {
            continue;
        }

        match std::fs::read_to_string(&path) {
            Ok(text) => {
                docs.push(DocumentRecord {
                    kind: SourceKind::Walkthrough,
                    origin: rel_str,
                    text,
                });
            }
            Err(e) => {
                eprintln!("Warning: could not read {}: {}", path.display(), e);
            }
        }
    }

    Ok(())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorpusConfig;
    use std::fs;

    fn corpus_config(root: &Path) -> CorpusConfig {
        CorpusConfig {
            books_file: Some(root.join("book_raw.jsonl")),
            web_dir: Some(root.join("web")),
            walkthroughs_dir: Some(root.join("walkthroughs")),
            walkthrough_globs: vec!["**/*.md".to_string()],
        }
    }

    #[test]
    fn test_malformed_book_lines_are_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(
            tmp.path().join("book_raw.jsonl"),
            concat!(
                "{\"book\": \"nmap-guide\", \"file\": \"ch1.pdf\", \"text\": \"port scanning basics\"}\n",
                "this line is not json\n",
                "{\"book\": \"nmap-guide\", \"file\": \"ch2.pdf\", \"text\": \"service detection\"}\n",
            ),
        )
        .unwrap();

        let config = corpus_config(tmp.path());
        let docs = load_corpus(&config).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind, SourceKind::Book);
        assert_eq!(docs[0].origin, "ch1.pdf");
        assert_eq!(docs[1].origin, "ch2.pdf");
    }

    #[test]
    fn test_web_pages_load_in_sorted_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let web = tmp.path().join("web");
        fs::create_dir_all(&web).unwrap();
        fs::write(
            web.join("b.json"),
            "{\"url\": \"https://example.com/b\", \"text\": \"second page\"}",
        )
        .unwrap();
        fs::write(
            web.join("a.json"),
            "{\"url\": \"https://example.com/a\", \"text\": \"first page\"}",
        )
        .unwrap();
        fs::write(web.join("broken.json"), "{not json").unwrap();
        fs::write(web.join("notes.txt"), "ignored, not json").unwrap();

        let config = corpus_config(tmp.path());
        let docs = load_corpus(&config).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].origin, "https://example.com/a");
        assert_eq!(docs[1].origin, "https://example.com/b");
    }

    #[test]
    fn test_walkthroughs_filtered_by_glob_with_relative_origin() {
        let tmp = tempfile::TempDir::new().unwrap();
        let wt = tmp.path().join("walkthroughs").join("htb");
        fs::create_dir_all(&wt).unwrap();
        fs::write(wt.join("lame.md"), "exploit smb on port 445").unwrap();
        fs::write(wt.join("README.txt"), "not a walkthrough").unwrap();

        let config = corpus_config(tmp.path());
        let docs = load_corpus(&config).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].kind, SourceKind::Walkthrough);
        assert_eq!(docs[0].origin, format!("htb{}lame.md", std::path::MAIN_SEPARATOR));
    }

    #[test]
    fn test_missing_collections_are_not_fatal() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = corpus_config(tmp.path());
        let docs = load_corpus(&config).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_collect_chunks_preserves_document_order() {
        let chunking = ChunkingConfig {
            window_words: 5,
            overlap_words: 0,
            min_chars: 1,
        };
        let docs = vec![
            DocumentRecord {
                kind: SourceKind::Book,
                origin: "a".to_string(),
                text: "one two three".to_string(),
            },
            DocumentRecord {
                kind: SourceKind::Web,
                origin: "b".to_string(),
                text: "four five six".to_string(),
            },
        ];
        let chunks = collect_chunks(&docs, &chunking);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].origin, "a");
        assert_eq!(chunks[1].origin, "b");
    }
}
