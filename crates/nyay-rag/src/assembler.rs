use tracing::debug;

use nyay_core::types::{Answer, ConfidenceLabel, Mode, RetrievedCandidate};

use crate::prompt::DISCLAIMER;

/// Sources are kept only for grounded answers; the label follows the mode.
pub fn assemble(mode: Mode, top_score: f32, explanation: String, candidates: Vec<RetrievedCandidate>) -> Answer {
    debug!(?mode, top_score, candidates = candidates.len(), "assembling answer");
    let (confidence_label, sources) = match mode {
        Mode::Grounded => (ConfidenceLabel::High, candidates),
        Mode::Fallback => (ConfidenceLabel::Low, Vec::new()),
    };
    Answer { mode, confidence_label, explanation, sources, disclaimer: DISCLAIMER.to_string() }
}
