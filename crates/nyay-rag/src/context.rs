use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use nyay_core::config::{RetrievalSettings, Settings};
use nyay_core::store::MetadataStore;
use nyay_core::traits::{Embedder, VectorIndex};
use nyay_core::types::{Answer, Metric, RetrievedCandidate};
use nyay_core::{Error, Result};
use nyay_embed::get_default_embedder;
use nyay_llm::ChatCompletionsClient;
use nyay_vector::load_corpus;

use crate::assembler::assemble;
use crate::generator::Generator;
use crate::prompt;
use crate::retriever::Retriever;
use crate::router::route;

/// Loaded, immutable serving state. Share it behind an `Arc`.
pub struct RagContext {
    retriever: Retriever,
    generator: Generator,
    top_k: usize,
    status: ContextStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextStatus {
    pub chunks: usize,
    pub dimension: usize,
    pub embedder_id: String,
    pub model: String,
}

impl RagContext {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        metadata: Arc<MetadataStore>,
        generator: Generator,
        settings: &RetrievalSettings,
    ) -> Result<Self> {
        if embedder.dim() != index.dim() {
            return Err(Error::mismatch("dimension", index.dim(), embedder.dim()));
        }
        if index.metric() != Metric::InnerProduct {
            return Err(Error::mismatch("metric", Metric::InnerProduct, index.metric()));
        }
        if index.len() != metadata.len() {
            return Err(Error::mismatch("row count", index.len(), metadata.len()));
        }
        if settings.top_k == 0 {
            return Err(Error::InvalidArgument("retrieval.top_k must be at least 1".into()));
        }
        let status = ContextStatus {
            chunks: metadata.len(),
            dimension: index.dim(),
            embedder_id: embedder.embedder_id().to_string(),
            model: generator.model_name().to_string(),
        };
        Ok(Self {
            retriever: Retriever::new(embedder, index, metadata),
            generator,
            top_k: settings.top_k,
            status,
        })
    }

    /// Load the persisted index, the configured embedder and the LLM client.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let corpus = load_corpus(&settings.index.db_path(), &settings.index).await?;
        let embedder: Arc<dyn Embedder> = Arc::from(
            get_default_embedder(&settings.embedding).map_err(|e| Error::Initialization(format!("embedder: {:#}", e)))?,
        );
        if corpus.manifest.embedder_id != embedder.embedder_id() {
            return Err(Error::mismatch("embedder id", &corpus.manifest.embedder_id, embedder.embedder_id()));
        }
        if corpus.manifest.dimension != embedder.dim() {
            return Err(Error::mismatch("dimension", corpus.manifest.dimension, embedder.dim()));
        }

        if settings.llm.api_key().is_none() {
            warn!(env = %settings.llm.api_key_env, "no LLM API key set; answers will use the static fallback");
        }
        let client = ChatCompletionsClient::from_settings(&settings.llm)
            .map_err(|e| Error::Initialization(format!("LLM client: {:#}", e)))?;
        let generator = Generator::new(Arc::new(client), &settings.llm);

        let context = Self::new(
            embedder,
            Arc::new(corpus.index),
            Arc::new(corpus.metadata),
            generator,
            &settings.retrieval,
        )?;
        info!(status = ?context.status, "RAG context ready");
        Ok(context)
    }

    pub async fn answer(&self, question: &str) -> Result<Answer> {
        let candidates = self.retriever.retrieve(question, self.top_k)?;
        let decision = route(&candidates);
        debug!(mode = ?decision.mode, top_score = decision.top_score, "routed question");
        let prompt = prompt::build(question.trim(), decision.mode, &candidates);
        let explanation = self.generator.generate(&prompt.system_instructions, &prompt.user_content).await;
        Ok(assemble(decision.mode, decision.top_score, explanation, candidates))
    }

    /// Retrieval only; no model call.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedCandidate>> {
        self.retriever.retrieve(query, k)
    }

    pub fn status(&self) -> &ContextStatus {
        &self.status
    }
}
