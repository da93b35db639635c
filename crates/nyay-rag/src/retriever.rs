use std::sync::Arc;
use tracing::warn;

use nyay_core::store::MetadataStore;
use nyay_core::traits::{Embedder, VectorIndex};
use nyay_core::types::{RetrievedCandidate, NO_MATCH};
use nyay_core::{Error, Result};

/// Embeds a query and resolves the nearest index rows to chunks.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    metadata: Arc<MetadataStore>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, metadata: Arc<MetadataStore>) -> Self {
        Self { embedder, index, metadata }
    }

    /// Up to `k` candidates in index ranking order.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery);
        }
        if k == 0 {
            return Err(Error::InvalidArgument("k must be at least 1".into()));
        }
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(Error::Retrieval)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Retrieval(anyhow::anyhow!("embedder returned no vector")))?;
        let neighbors = self.index.search(&query_vec, k).map_err(Error::Retrieval)?;

        let mut out = Vec::with_capacity(k);
        for (score, position) in neighbors.iter().take(k) {
            if position == NO_MATCH {
                continue;
            }
            match self.metadata.get(position) {
                Some(chunk) => out.push(RetrievedCandidate { chunk: chunk.clone(), score }),
                None => warn!(position, "index position has no metadata record; skipping"),
            }
        }
        Ok(out)
    }
}
