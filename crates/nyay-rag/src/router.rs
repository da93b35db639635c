use nyay_core::types::{Mode, RetrievedCandidate};

/// Minimum top-1 cosine similarity for a grounded answer.
pub const CONFIDENCE_THRESHOLD: f32 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub mode: Mode,
    pub top_score: f32,
}

/// Decide on the top-ranked candidate only. Candidates must be in
/// descending score order, as the retriever returns them.
pub fn route(candidates: &[RetrievedCandidate]) -> Route {
    match candidates.first() {
        None => Route { mode: Mode::Fallback, top_score: 0.0 },
        Some(top) => {
            let mode = if top.score >= CONFIDENCE_THRESHOLD { Mode::Grounded } else { Mode::Fallback };
            Route { mode, top_score: top.score }
        }
    }
}
