//! Loading of chunked statute records into the fixed [`Chunk`] schema.
//!
//! Ingestion scripts have written two record shapes over time: the current
//! one keyed by `chunk_id` with a `text` field, and an older one keyed by
//! `id` with `section_text`. Both are accepted; fields missing from older
//! records receive the ingestion-time defaults below.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Chunk;

pub const DEFAULT_ACT_NAME: &str = "Unknown";
pub const DEFAULT_SECTION_NUMBER: &str = "Unknown";
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_SOURCE: &str = "India Code";

/// On-disk record as produced by the chunking scripts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkRecord {
    #[serde(alias = "chunk_id")]
    pub id: Option<String>,
    pub act_name: Option<String>,
    pub act_year: Option<i32>,
    pub category: Option<String>,
    pub section_number: Option<SectionNumber>,
    #[serde(alias = "section_text")]
    pub text: Option<String>,
    pub source: Option<String>,
}

/// Section numbers appear both as strings ("302A") and bare integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SectionNumber {
    Text(String),
    Number(i64),
}

impl SectionNumber {
    fn into_string(self) -> String {
        match self {
            SectionNumber::Text(s) => s,
            SectionNumber::Number(n) => n.to_string(),
        }
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ChunkRecord {
    pub fn into_chunk(self) -> Result<Chunk> {
        let id = non_blank(self.id).ok_or_else(|| Error::InvalidRecord {
            id: "<missing>".to_string(),
            reason: "record has no id".to_string(),
        })?;
        let text = non_blank(self.text).ok_or_else(|| Error::InvalidRecord {
            id: id.clone(),
            reason: "text is empty".to_string(),
        })?;
        Ok(Chunk {
            act_name: non_blank(self.act_name).unwrap_or_else(|| DEFAULT_ACT_NAME.to_string()),
            act_year: self.act_year.unwrap_or(0),
            category: non_blank(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            section_number: non_blank(self.section_number.map(SectionNumber::into_string))
                .unwrap_or_else(|| DEFAULT_SECTION_NUMBER.to_string()),
            source: non_blank(self.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            id,
            text,
        })
    }
}

/// Read records from a JSON file holding an array, or from every `*.json`
/// file below a directory (sorted by path).
pub fn load_records(path: &Path) -> Result<Vec<ChunkRecord>> {
    if path.is_dir() {
        let files = list_json_files(path);
        info!(dir = %path.display(), files = files.len(), "loading chunk records");
        let mut all = Vec::new();
        for file in &files {
            all.extend(read_record_file(file)?);
        }
        Ok(all)
    } else if path.is_file() {
        read_record_file(path)
    } else {
        Err(Error::Initialization(format!("chunk data not found at {}", path.display())))
    }
}

/// Check the per-chunk invariants: non-blank id and text, id not already in `seen`.
pub fn validate_chunk(chunk: &Chunk, seen: &mut HashSet<String>) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidRecord { id: chunk.id.clone(), reason: reason.to_string() };
    if chunk.id.trim().is_empty() {
        return Err(invalid("record has no id"));
    }
    if chunk.text.trim().is_empty() {
        return Err(invalid("text is empty"));
    }
    if !seen.insert(chunk.id.clone()) {
        return Err(invalid("duplicate id"));
    }
    Ok(())
}

/// Convert records into chunks, rejecting blank text and duplicate ids.
pub fn normalize(records: Vec<ChunkRecord>) -> Result<Vec<Chunk>> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut chunks = Vec::with_capacity(records.len());
    for record in records {
        let chunk = record.into_chunk()?;
        validate_chunk(&chunk, &mut seen)?;
        chunks.push(chunk);
    }
    debug!(chunks = chunks.len(), "normalized corpus");
    Ok(chunks)
}

pub fn load_chunks(path: &Path) -> Result<Vec<Chunk>> {
    normalize(load_records(path)?)
}

fn read_record_file(path: &Path) -> Result<Vec<ChunkRecord>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Initialization(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Initialization(format!("failed to parse {}: {}", path.display(), e)))
}

fn list_json_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}
