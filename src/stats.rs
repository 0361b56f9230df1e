//! Index statistics overview.
//!
//! Quick summary of the built index: entry counts per source kind, the
//! embedding model and dimensions the vectors came from, build time, and
//! database size. Used by `lore stats` to confirm an ingestion run produced
//! what was expected.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

/// Run the stats command: query the index and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    if !config.db.path.exists() {
        println!("No index at {}. Run `lore ingest` first.", config.db.path.display());
        return Ok(());
    }

    let pool = db::connect(&config.db.path).await?;

    if !store::is_built(&pool).await? {
        println!("Index at {} is empty. Run `lore ingest` first.", config.db.path.display());
        pool.close().await;
        return Ok(());
    }

    let total = store::count_entries(&pool).await?;
    let by_kind = store::count_by_kind(&pool).await?;
    let meta = store::load_meta(&pool).await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("Lorebase — Index Stats");
    println!("======================");
    println!();
    println!("  Database:  {}", config.db.path.display());
    println!("  Size:      {}", format_bytes(db_size));
    println!("  Entries:   {}", total);

    if let Some(meta) = meta {
        println!("  Model:     {} ({} dims)", meta.model, meta.dims);
        println!("  Built:     {}", format_ts_iso(meta.built_at));
    }

    if !by_kind.is_empty() {
        println!();
        println!("  By source:");
        println!("  {:<16} {:>8}", "KIND", "ENTRIES");
        println!("  {}", "-".repeat(26));
        for (kind, count) in &by_kind {
            println!("  {:<16} {:>8}", kind, count);
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
