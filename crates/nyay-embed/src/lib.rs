//! Sentence embeddings for statute chunks and user questions.
//!
//! [`SentenceEmbedder`] runs a sentence-transformers BERT checkpoint
//! (all-MiniLM-L6-v2 by default) with candle and applies masked mean pooling
//! plus L2 normalization, the convention the index is built with.
//! [`HashEmbedder`] is a weight-free stand-in selected by
//! `embedding.use_fake`.

use anyhow::{Result, anyhow, bail};
use std::path::Path;
use tracing::info;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;

use nyay_core::config::EmbeddingSettings;
use nyay_core::traits::Embedder;

mod device;
mod fake;
mod pool;
mod tokenize;

pub use device::select_device;
pub use fake::HashEmbedder;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

/// Rows pushed through the model per forward pass.
const FORWARD_BATCH: usize = 16;

pub struct SentenceEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, id: String, dim: usize, max_len: usize }

impl SentenceEmbedder {
    /// Load `config.json`, `tokenizer.json` and `model.safetensors` (or
    /// `pytorch_model.bin`) from `model_dir`.
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        if !model_dir.is_dir() { bail!("Could not locate embedding model directory {}", model_dir.display()); }
        let device = select_device();
        info!(dir = %model_dir.display(), "loading sentence embedding model");
        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let safetensors = model_dir.join("model.safetensors");
        let pickle = model_dir.join("pytorch_model.bin");
        let vb = if safetensors.exists() {
            VarBuilder::from_buffered_safetensors(std::fs::read(&safetensors)?, DTYPE, &device)?
        } else if pickle.exists() {
            let weights: std::collections::HashMap<String, Tensor> = candle_core::pickle::read_all(&pickle)?.into_iter().collect();
            VarBuilder::from_tensors(weights, DTYPE, &device)
        } else {
            bail!("No model weights (model.safetensors or pytorch_model.bin) in {}", model_dir.display());
        };
        let model = BertModel::load(vb, &config)?;
        let dim = config.hidden_size;
        let name = model_dir.file_name().and_then(|s| s.to_str()).unwrap_or("bert");
        let id = format!("st:{}:mean-l2:d{}", name, dim);
        info!(embedder_id = %id, "sentence embedding model loaded");
        Ok(Self { model, tokenizer, device, id, dim, max_len })
    }

    fn embed_rows(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) = tokenize_batch(&self.tokenizer, texts, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

impl Embedder for SentenceEmbedder {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(FORWARD_BATCH) { out.extend(self.embed_rows(batch)?); }
        Ok(out)
    }
}

pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if settings.dimension == 0 { bail!("embedding.dimension must be positive"); }
    if settings.use_fake {
        info!(dim = settings.dimension, "using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(settings.dimension)));
    }
    let embedder = SentenceEmbedder::load(&settings.model_path(), settings.max_len)?;
    if embedder.dim() != settings.dimension {
        bail!("model dimension {} does not match embedding.dimension {}", embedder.dim(), settings.dimension);
    }
    Ok(Box::new(embedder))
}
