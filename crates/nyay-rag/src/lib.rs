//! Retrieval-augmented answering over the statute corpus.
//!
//! A question flows through [`Retriever`] → [`router::route`] →
//! [`prompt::build`] → [`Generator`] → [`assembler::assemble`];
//! [`RagContext`] wires the stages together and owns the loaded state.

macro_rules! disclaimer_text {
    () => {
        "Disclaimer: This information is for educational purposes only and does not constitute legal advice."
    };
}

pub mod assembler;
pub mod context;
pub mod generator;
pub mod prompt;
pub mod retriever;
pub mod router;

pub use context::{ContextStatus, RagContext};
pub use generator::Generator;
pub use prompt::{Prompt, DISCLAIMER};
pub use retriever::Retriever;
pub use router::{Route, CONFIDENCE_THRESHOLD};
