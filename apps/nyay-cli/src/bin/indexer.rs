use std::{env, fs, path::PathBuf};

use nyay_cli::{init_tracing, load_settings};
use nyay_core::corpus::load_chunks;
use nyay_core::Error;
use nyay_embed::get_default_embedder;
use nyay_vector::build_index;
use tracing::info;

const DEFAULT_CORPUS: &str = "data/chunks/sections_chunks.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = load_settings()?;
    let corpus_path = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS));

    println!("Nyay Sathi Indexer\n==================");
    println!("Corpus: {}", corpus_path.display());
    let chunks = load_chunks(&corpus_path)?;
    if chunks.is_empty() {
        return Err(Error::Initialization(format!("no chunks found in {}", corpus_path.display())).into());
    }
    info!(chunks = chunks.len(), corpus = %corpus_path.display(), "corpus loaded");
    println!("📊 Loaded {} chunks", chunks.len());

    let db_path = settings.index.db_path();
    if db_path.exists() {
        info!(dir = %db_path.display(), "removing existing index");
        fs::remove_dir_all(&db_path)?;
    }
    fs::create_dir_all(&db_path)?;

    let embedder = get_default_embedder(&settings.embedding)?;
    println!("Embedder: {}", embedder.embedder_id());
    let manifest = build_index(
        &db_path,
        &settings.index.table,
        &settings.index.meta_table,
        &chunks,
        embedder.as_ref(),
        settings.embedding.batch_size,
    )
    .await?;

    println!("\n✅ Indexed {} chunks (dimension {}, metric {})", manifest.count, manifest.dimension, manifest.metric);
    println!("Index directory: {}", db_path.display());
    println!("\n💡 To search, use: cargo run --bin nyay-search '<query>'");
    Ok(())
}
