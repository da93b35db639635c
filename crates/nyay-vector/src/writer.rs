use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use arrow_array::{RecordBatch, RecordBatchIterator, Int32Array, FixedSizeListArray, StringArray};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use nyay_core::traits::Embedder;
use nyay_core::types::{Chunk, Metric};

use crate::schema::build_sections_schema;
use crate::table::{open_db, table_exists, write_manifest, IndexManifest};

/// Rows per Arrow batch handed to LanceDB.
const WRITE_BATCH: usize = 1000;

pub struct IndexWriter { pub(crate) db: Connection, pub(crate) table_name: String, pub(crate) meta_table: String }

impl IndexWriter {
	pub async fn new(db_path: &Path, table_name: &str, meta_table: &str) -> Result<Self> {
		let db = open_db(db_path.to_string_lossy().as_ref()).await?;
		Ok(Self { db, table_name: table_name.to_string(), meta_table: meta_table.to_string() })
	}

	/// Write `chunks` and their vectors in order, then record the manifest.
	/// Row `i` of the table becomes index position `i`.
	pub async fn write(&self, chunks: &[Chunk], embeddings: &[Vec<f32>], embedder_id: &str) -> Result<IndexManifest> {
		if chunks.is_empty() { bail!("refusing to write an empty index"); }
		if chunks.len() != embeddings.len() { bail!("{} chunks but {} embeddings", chunks.len(), embeddings.len()); }
		if table_exists(&self.db, &self.table_name).await? { bail!("table '{}' already exists; remove the index directory first", self.table_name); }
		let dim = embeddings[0].len();
		if let Some(bad) = embeddings.iter().position(|e| e.len() != dim) { bail!("embedding {} has dimension {}, expected {}", bad, embeddings[bad].len(), dim); }

		info!(rows = chunks.len(), table = %self.table_name, "writing index rows");
		for (chunk_batch, emb_batch) in chunks.chunks(WRITE_BATCH).zip(embeddings.chunks(WRITE_BATCH)) {
			self.insert_batch(chunk_batch, emb_batch, dim).await?;
		}
		let manifest = IndexManifest { metric: Metric::InnerProduct, dimension: dim, embedder_id: embedder_id.to_string(), count: chunks.len() };
		write_manifest(&self.db, &self.meta_table, &manifest).await?;
		info!(?manifest, "index manifest written");
		Ok(manifest)
	}

	async fn insert_batch(&self, chunks: &[Chunk], embeddings: &[Vec<f32>], dim: usize) -> Result<()> {
		let record_batch = to_record_batch(chunks, embeddings, dim)?; let schema = record_batch.schema();
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
		if table_exists(&self.db, &self.table_name).await? {
			self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
		} else {
			self.db.create_table(&self.table_name, reader).execute().await?;
		}
		Ok(())
	}
}

fn to_record_batch(chunks: &[Chunk], embeddings: &[Vec<f32>], dim: usize) -> Result<RecordBatch> {
	let dim = i32::try_from(dim)?;
	let vectors = embeddings.iter().map(|v| Some(v.iter().map(|&x| Some(x)).collect::<Vec<_>>()));
	let record_batch = RecordBatch::try_new(build_sections_schema(dim), vec![
		Arc::new(StringArray::from(chunks.iter().map(|c| c.id.clone()).collect::<Vec<_>>())),
		Arc::new(StringArray::from(chunks.iter().map(|c| c.act_name.clone()).collect::<Vec<_>>())),
		Arc::new(Int32Array::from(chunks.iter().map(|c| c.act_year).collect::<Vec<_>>())),
		Arc::new(StringArray::from(chunks.iter().map(|c| c.category.clone()).collect::<Vec<_>>())),
		Arc::new(StringArray::from(chunks.iter().map(|c| c.section_number.clone()).collect::<Vec<_>>())),
		Arc::new(StringArray::from(chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>())),
		Arc::new(StringArray::from(chunks.iter().map(|c| c.source.clone()).collect::<Vec<_>>())),
		Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors, dim)),
	])?;
	Ok(record_batch)
}

/// Embed every chunk with a progress bar and write a fresh index.
pub async fn build_index(db_path: &Path, table_name: &str, meta_table: &str, chunks: &[Chunk], embedder: &dyn Embedder, batch_size: usize) -> Result<IndexManifest> {
	if chunks.is_empty() { bail!("no chunks to index"); }
	let pb = ProgressBar::new(chunks.len() as u64);
	pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?.progress_chars("#>-"));
	let mut embeddings = Vec::with_capacity(chunks.len());
	for batch in chunks.chunks(batch_size.max(1)) {
		let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
		let vecs = embedder.embed_batch(&texts)?;
		if vecs.len() != texts.len() { bail!("embedder returned {} vectors for {} texts", vecs.len(), texts.len()); }
		if let Some(v) = vecs.iter().find(|v| v.len() != embedder.dim()) { bail!("embedder returned dimension {}, declared {}", v.len(), embedder.dim()); }
		embeddings.extend(vecs);
		pb.inc(batch.len() as u64);
	}
	pb.finish_with_message("embedded");
	let writer = IndexWriter::new(db_path, table_name, meta_table).await?;
	writer.write(chunks, &embeddings, embedder.embedder_id()).await
}
