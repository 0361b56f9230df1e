//! Persisted composite index.
//!
//! The index is a single SQLite table in which each row carries both a
//! chunk's metadata and its embedding vector. The original design this
//! replaces kept two parallel artifacts (a chunk list and a vector index)
//! whose row orders had to match; storing vector and metadata in one row
//! makes that misalignment unrepresentable.
//!
//! `entries` is replaced wholesale inside one transaction on every build —
//! there is no incremental update path. `index_meta` is a single row
//! recording which model produced the vectors and when.

use anyhow::{bail, Result};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::embedding::{blob_to_vec, vec_to_blob};
use crate::models::{Chunk, SourceKind};

/// One loaded index row: a chunk and the vector that indexes it.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// Provenance of the built index.
#[derive(Debug, Clone)]
pub struct IndexMeta {
    pub model: String,
    pub dims: usize,
    pub built_at: i64,
}

/// Create the index tables if they do not exist. Idempotent.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            position INTEGER PRIMARY KEY,
            kind TEXT NOT NULL,
            origin TEXT NOT NULL,
            text TEXT NOT NULL,
            embedding BLOB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS index_meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            model TEXT NOT NULL,
            dims INTEGER NOT NULL,
            built_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_kind ON entries(kind)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Replace the entire index with `chunks` and their `vectors`, in chunk
/// order, inside a single transaction. Positions are assigned 0..n.
pub async fn replace_entries(
    pool: &SqlitePool,
    chunks: &[Chunk],
    vectors: &[Vec<f32>],
    meta: &IndexMeta,
) -> Result<()> {
    if chunks.len() != vectors.len() {
        bail!(
            "Chunk/vector count mismatch: {} chunks, {} vectors",
            chunks.len(),
            vectors.len()
        );
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM entries").execute(&mut *tx).await?;

    for (position, (chunk, vector)) in chunks.iter().zip(vectors.iter()).enumerate() {
        let blob = vec_to_blob(vector);
        sqlx::query(
            "INSERT INTO entries (position, kind, origin, text, embedding) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(position as i64)
        .bind(chunk.kind.as_str())
        .bind(&chunk.origin)
        .bind(&chunk.text)
        .bind(&blob)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO index_meta (id, model, dims, built_at) VALUES (1, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            model = excluded.model,
            dims = excluded.dims,
            built_at = excluded.built_at
        "#,
    )
    .bind(&meta.model)
    .bind(meta.dims as i64)
    .bind(meta.built_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Load every index entry in position order.
///
/// Rows with an unknown source kind are skipped with a warning rather than
/// failing the load; they can only appear if the file was written by a newer
/// version or tampered with.
pub async fn load_entries(pool: &SqlitePool) -> Result<Vec<IndexEntry>> {
    let rows = sqlx::query("SELECT kind, origin, text, embedding FROM entries ORDER BY position")
        .fetch_all(pool)
        .await?;

    let mut entries = Vec::with_capacity(rows.len());

    for row in &rows {
        let kind_str: String = row.get("kind");
        let kind = match SourceKind::from_str(&kind_str) {
            Ok(k) => k,
            Err(_) => {
                eprintln!("Warning: skipping index entry with unknown kind '{}'", kind_str);
                continue;
            }
        };

        let blob: Vec<u8> = row.get("embedding");
        entries.push(IndexEntry {
            chunk: Chunk {
                kind,
                origin: row.get("origin"),
                text: row.get("text"),
            },
            vector: blob_to_vec(&blob),
        });
    }

    Ok(entries)
}

pub async fn load_meta(pool: &SqlitePool) -> Result<Option<IndexMeta>> {
    let row = sqlx::query("SELECT model, dims, built_at FROM index_meta WHERE id = 1")
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| IndexMeta {
        model: r.get("model"),
        dims: r.get::<i64, _>("dims") as usize,
        built_at: r.get("built_at"),
    }))
}

pub async fn count_entries(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Entry counts grouped by source kind, largest first. Used by `lore stats`.
pub async fn count_by_kind(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query(
        "SELECT kind, COUNT(*) AS entry_count FROM entries GROUP BY kind ORDER BY entry_count DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("kind"), row.get("entry_count")))
        .collect())
}

/// True if the database already has a built index: the `entries` table
/// exists and holds at least one row.
pub async fn is_built(pool: &SqlitePool) -> Result<bool> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'entries'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(false);
    }

    Ok(count_entries(pool).await? > 0)
}
