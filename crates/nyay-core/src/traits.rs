use async_trait::async_trait;

use crate::types::{Metric, Neighbors};

pub trait Embedder: Send + Sync {
    /// Stable identifier for the model and its normalization (e.g. `fake:xxhash:d384`).
    fn embedder_id(&self) -> &str;
    fn dim(&self) -> usize;
    /// Unit-normalized embeddings, one per input, in input order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn metric(&self) -> Metric;
    fn search(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Neighbors>;
}

/// Single-turn completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model_name(&self) -> &str;
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
