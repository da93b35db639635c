//! Domain types shared by the index, the embedder and the answer pipeline.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Index position marking an empty result slot.
pub const NO_MATCH: i64 = -1;

/// One retrievable unit of statute text with its citation metadata.
///
/// Created once by the index build and never mutated while serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub act_name: String,
    pub act_year: i32,
    pub category: String,
    pub section_number: String,
    pub text: String,
    pub source: String,
}

/// A chunk paired with its similarity to the current query.
///
/// `score` is a cosine similarity in `[-1, 1]`; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedCandidate {
    pub chunk: Chunk,
    pub score: f32,
}

/// Similarity metric declared by a vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Inner product over unit vectors. Higher is better.
    InnerProduct,
    /// Euclidean distance. Lower is better.
    L2,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::InnerProduct => "inner_product",
            Metric::L2 => "l2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner_product" | "ip" | "dot" | "cosine" => Some(Metric::InnerProduct),
            "l2" | "euclidean" => Some(Metric::L2),
            _ => None,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw top-k output of a vector index.
///
/// Always holds exactly `k` slots ordered by descending similarity. Slots
/// beyond the corpus size carry [`NO_MATCH`] and `f32::NEG_INFINITY`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighbors {
    pub scores: Vec<f32>,
    pub positions: Vec<i64>,
}

impl Neighbors {
    pub fn iter(&self) -> impl Iterator<Item = (f32, i64)> + '_ {
        self.scores.iter().copied().zip(self.positions.iter().copied())
    }
}

/// Which prompting strategy produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Allowed to cite the retrieved excerpts.
    Grounded,
    /// General explanation only; no citations.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    High,
    Low,
}

/// Terminal output of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub mode: Mode,
    pub confidence_label: ConfidenceLabel,
    pub explanation: String,
    pub sources: Vec<RetrievedCandidate>,
    pub disclaimer: String,
}

/// A source entry formatted for display or an API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub act: String,
    pub section: String,
    pub text: String,
    pub score: f32,
}

impl From<&RetrievedCandidate> for SourceCitation {
    fn from(c: &RetrievedCandidate) -> Self {
        Self {
            act: c.chunk.act_name.clone(),
            section: c.chunk.section_number.clone(),
            text: c.chunk.text.clone(),
            score: c.score,
        }
    }
}

/// Wire shape of an answer as served to API clients: `mode` is `rag` or
/// `fallback`, `confidence` is `high` or `low`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerView {
    pub mode: String,
    pub confidence: String,
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    pub disclaimer: String,
}

impl Answer {
    pub fn citations(&self) -> Vec<SourceCitation> {
        self.sources.iter().map(SourceCitation::from).collect()
    }

    pub fn to_view(&self) -> AnswerView {
        AnswerView {
            mode: match self.mode {
                Mode::Grounded => "rag".to_string(),
                Mode::Fallback => "fallback".to_string(),
            },
            confidence: match self.confidence_label {
                ConfidenceLabel::High => "high".to_string(),
                ConfidenceLabel::Low => "low".to_string(),
            },
            answer: self.explanation.clone(),
            sources: self.citations(),
            disclaimer: self.disclaimer.clone(),
        }
    }
}
