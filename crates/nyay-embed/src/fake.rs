use anyhow::Result;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use nyay_core::traits::Embedder;

/// Deterministic bag-of-tokens embedder for tests and development.
///
/// Tokens are lowercased and stripped of punctuation, hashed into `dim`
/// buckets and the result is L2-normalized, so identical texts score 1.0
/// and texts without shared tokens score close to 0.
pub struct HashEmbedder { dim: usize, id: String }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("fake:xxhash:d{}", dim) } }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        if self.dim == 0 { return Vec::new(); }
        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let token: String = token.chars().filter(|c| c.is_alphanumeric()).flat_map(char::to_lowercase).collect();
            if token.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = 0.5 + (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashEmbedder {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
