//! Startup loading of the persisted index into memory.
//!
//! Everything that can be wrong with an index on disk is reported here, once,
//! before the process serves: missing tables, an incomplete manifest, a
//! metric other than inner product, vectors of the wrong dimension or not
//! unit length, rows with blank text or repeated ids, and row counts that
//! disagree with the manifest.

use arrow_array::cast::AsArray;
use arrow_array::{Array, FixedSizeListArray, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use std::collections::HashSet;
use lancedb::query::ExecutableQuery;
use std::path::Path;
use tracing::info;

use nyay_core::config::IndexSettings;
use nyay_core::corpus::validate_chunk;
use nyay_core::store::MetadataStore;
use nyay_core::types::{Chunk, Metric};
use nyay_core::{Error, Result};

use crate::flat::FlatIpIndex;
use crate::table::{open_db, read_manifest, table_exists, IndexManifest};

/// Tolerated deviation of a stored vector's L2 norm from 1.
pub const NORM_TOLERANCE: f32 = 1e-2;

pub struct LoadedCorpus {
    pub index: FlatIpIndex,
    pub metadata: MetadataStore,
    pub manifest: IndexManifest,
}

fn init_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Initialization(format!("{}: {}", context, e))
}

pub async fn load_corpus(db_path: &Path, settings: &IndexSettings) -> Result<LoadedCorpus> {
    if !db_path.exists() {
        return Err(Error::Initialization(format!(
            "index directory {} not found; build it with nyay-indexer",
            db_path.display()
        )));
    }
    let conn = open_db(db_path.to_string_lossy().as_ref()).await.map_err(|e| init_err("opening index", e))?;
    let manifest = read_manifest(&conn, &settings.meta_table)
        .await
        .map_err(|e| init_err("reading index manifest", e))?
        .ok_or_else(|| Error::Initialization(format!("index manifest table '{}' is missing", settings.meta_table)))?;
    if manifest.metric != Metric::InnerProduct {
        return Err(Error::mismatch("metric", Metric::InnerProduct, manifest.metric));
    }

    let mut index = FlatIpIndex::new(manifest.dimension);
    let mut chunks = Vec::with_capacity(manifest.count);
    let mut seen = HashSet::with_capacity(manifest.count);
    let has_table = table_exists(&conn, &settings.table).await.map_err(|e| init_err("listing tables", e))?;
    if has_table {
        let table = conn.open_table(&settings.table).execute().await.map_err(|e| init_err("opening sections table", e))?;
        let mut stream = table.query().execute().await.map_err(|e| init_err("scanning sections table", e))?;
        while let Some(batch) = stream.try_next().await.map_err(|e| init_err("reading sections batch", e))? {
            read_batch(&batch, manifest.dimension, &mut index, &mut chunks, &mut seen)?;
        }
    }

    if chunks.len() != manifest.count {
        return Err(Error::mismatch("row count", manifest.count, chunks.len()));
    }
    if chunks.is_empty() && !settings.allow_empty {
        return Err(Error::Initialization(format!("index table '{}' holds no chunks", settings.table)));
    }
    info!(chunks = chunks.len(), dimension = manifest.dimension, embedder_id = %manifest.embedder_id, "index loaded");
    Ok(LoadedCorpus { index, metadata: MetadataStore::new(chunks), manifest })
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| Error::Initialization(format!("sections.{} column missing or not utf8", name)))
}

fn read_batch(
    batch: &RecordBatch,
    dim: usize,
    index: &mut FlatIpIndex,
    chunks: &mut Vec<Chunk>,
    seen: &mut HashSet<String>,
) -> Result<()> {
    let ids = string_col(batch, "id")?;
    let act_names = string_col(batch, "act_name")?;
    let categories = string_col(batch, "category")?;
    let sections = string_col(batch, "section_number")?;
    let texts = string_col(batch, "text")?;
    let sources = string_col(batch, "source")?;
    let years = batch
        .column_by_name("act_year")
        .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
        .ok_or_else(|| Error::Initialization("sections.act_year column missing or not int32".to_string()))?;
    let vectors = batch
        .column_by_name("vector")
        .and_then(|c| c.as_any().downcast_ref::<FixedSizeListArray>())
        .ok_or_else(|| Error::Initialization("sections.vector column missing".to_string()))?;
    let width = usize::try_from(vectors.value_length()).unwrap_or(0);
    if width != dim {
        return Err(Error::mismatch("dimension", dim, width));
    }

    for i in 0..batch.num_rows() {
        let id = ids.value(i).to_string();
        if vectors.is_null(i) {
            return Err(Error::Initialization(format!("chunk '{}' has no vector", id)));
        }
        let list = vectors.value(i);
        let row: Vec<f32> = list
            .as_primitive_opt::<arrow_array::types::Float32Type>()
            .ok_or_else(|| Error::Initialization("sections.vector items are not float32".to_string()))?
            .values()
            .iter()
            .copied()
            .collect();
        let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(Error::mismatch("normalization", "unit vectors", format!("norm {:.4} for chunk '{}'", norm, id)));
        }
        let chunk = Chunk {
            id,
            act_name: act_names.value(i).to_string(),
            act_year: years.value(i),
            category: categories.value(i).to_string(),
            section_number: sections.value(i).to_string(),
            text: texts.value(i).to_string(),
            source: sources.value(i).to_string(),
        };
        validate_chunk(&chunk, seen)?;
        index.add(&row).map_err(|e| init_err("adding vector", e))?;
        chunks.push(chunk);
    }
    Ok(())
}
