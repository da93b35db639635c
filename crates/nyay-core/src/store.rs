use crate::types::Chunk;

/// Chunk records addressed by index position.
///
/// Row `i` of the vector index resolves to `get(i)`. The store is built
/// once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    chunks: Vec<Chunk>,
}

impl MetadataStore {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// `None` for negative sentinels and out-of-range positions.
    pub fn get(&self, position: i64) -> Option<&Chunk> {
        usize::try_from(position).ok().and_then(|i| self.chunks.get(i))
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
