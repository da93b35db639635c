//! LanceDB connection and housekeeping helpers.
//!
//! Provides the database open function, ensure-* helpers for tables, and a
//! key/value metadata table holding the [`IndexManifest`] the serving side
//! checks before it trusts the stored vectors.

use anyhow::{Result, anyhow};
use lancedb::{connect, Connection};
use lancedb::query::ExecutableQuery;

use arrow_array::{RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;

use nyay_core::types::Metric;

use crate::schema::build_meta_schema;

pub const META_METRIC: &str = "metric";
pub const META_DIMENSION: &str = "dimension";
pub const META_EMBEDDER_ID: &str = "embedder_id";
pub const META_COUNT: &str = "count";

/// Build-time facts about a persisted index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexManifest {
    pub metric: Metric,
    pub dimension: usize,
    pub embedder_id: String,
    pub count: usize,
}

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

pub async fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    Ok(conn.table_names().execute().await?.iter().any(|n| n == name))
}

pub async fn ensure_table(conn: &Connection, name: &str, schema: Arc<arrow_schema::Schema>) -> Result<()> {
    if table_exists(conn, name).await? {
        return Ok(());
    }
    // create empty table with 0 rows
    let iter = RecordBatchIterator::new(vec![].into_iter(), schema.clone());
    conn.create_table(name, Box::new(iter)).execute().await?;
    Ok(())
}

pub async fn ensure_meta_table(conn: &Connection, name: &str) -> Result<()> {
    ensure_table(conn, name, build_meta_schema()).await
}

/// Upsert key/value pairs; `key` is unique.
pub async fn set_meta(conn: &Connection, table: &str, entries: &[(&str, String)]) -> Result<()> {
    if entries.is_empty() { return Ok(()); }
    ensure_meta_table(conn, table).await?;
    let t = conn.open_table(table).execute().await?;
    let now = Utc::now().timestamp_millis();
    let rb = RecordBatch::try_new(
        build_meta_schema(),
        vec![
            Arc::new(StringArray::from(entries.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>())),
            Arc::new(StringArray::from(entries.iter().map(|(_, v)| v.clone()).collect::<Vec<_>>())),
            Arc::new(TimestampMillisecondArray::from(vec![now; entries.len()])),
        ],
    )?;
    let reader = Box::new(RecordBatchIterator::new(vec![Ok(rb)].into_iter(), build_meta_schema()));
    let mut mi = t.merge_insert(&["key"]);
    mi.when_matched_update_all(None).when_not_matched_insert_all();
    let _ = mi.execute(reader).await?;
    Ok(())
}

pub async fn get_all_meta(conn: &Connection, table: &str) -> Result<HashMap<String, String>> {
    let mut out = HashMap::new();
    if !table_exists(conn, table).await? { return Ok(out); }
    let t = conn.open_table(table).execute().await?;
    let mut stream = t.query().execute().await?;
    while let Some(batch) = futures::TryStreamExt::try_next(&mut stream).await? {
        let keys = batch.column_by_name("key").and_then(|c| c.as_any().downcast_ref::<StringArray>()).ok_or_else(|| anyhow!("meta.key column missing"))?;
        let vals = batch.column_by_name("value").and_then(|c| c.as_any().downcast_ref::<StringArray>()).ok_or_else(|| anyhow!("meta.value column missing"))?;
        for i in 0..batch.num_rows() {
            out.insert(keys.value(i).to_string(), vals.value(i).to_string());
        }
    }
    Ok(out)
}

pub async fn write_manifest(conn: &Connection, table: &str, manifest: &IndexManifest) -> Result<()> {
    set_meta(conn, table, &[
        (META_METRIC, manifest.metric.as_str().to_string()),
        (META_DIMENSION, manifest.dimension.to_string()),
        (META_EMBEDDER_ID, manifest.embedder_id.clone()),
        (META_COUNT, manifest.count.to_string()),
    ]).await
}

/// `Ok(None)` when the meta table is absent; an error when it exists but is incomplete.
pub async fn read_manifest(conn: &Connection, table: &str) -> Result<Option<IndexManifest>> {
    let meta = get_all_meta(conn, table).await?;
    if meta.is_empty() { return Ok(None); }
    let field = |key: &str| meta.get(key).ok_or_else(|| anyhow!("index manifest is missing '{}'", key));
    let metric_raw = field(META_METRIC)?;
    let metric = Metric::parse(metric_raw).ok_or_else(|| anyhow!("unknown metric '{}'", metric_raw))?;
    Ok(Some(IndexManifest {
        metric,
        dimension: field(META_DIMENSION)?.parse()?,
        embedder_id: field(META_EMBEDDER_ID)?.clone(),
        count: field(META_COUNT)?.parse()?,
    }))
}
