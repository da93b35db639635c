//! System instructions and user content for the two answering modes.

use std::fmt::Write;

use nyay_core::types::{Mode, RetrievedCandidate};

pub const DISCLAIMER: &str = disclaimer_text!();

pub const GROUNDED_INSTRUCTIONS: &str = concat!(r#"You are Nyay Sathi, a helpful Indian legal assistant.
MODE: RAG-BACKED (HIGH CONFIDENCE).

INSTRUCTIONS:
1. You are provided with retrieved legal sections from Indian laws.
2. Answer the USER QUESTION using ONLY the provided LEGAL TEXT.
3. Explicitly mention the Act Name and Section Number if available.
4. Explain the provision in simple English for a layperson.
5. If the text does not answer the question, clearly state so.
6. DO NOT invent laws, punishments, or procedures.
7. DO NOT give legal advice.

MANDATORY DISCLAIMER:
End your response with:
"#, "\"", disclaimer_text!(), "\"\n");

pub const FALLBACK_INSTRUCTIONS: &str = concat!(r#"You are Nyay Sathi, a helpful Indian legal assistant.
MODE: GENERAL FALLBACK (LOW CONFIDENCE).

INSTRUCTIONS:
1. No specific legal sections matched the query.
2. Do NOT cite Acts or Sections.
3. Do NOT invent punishments or procedures.
4. Provide a high-level educational explanation.
5. Encourage the user to rephrase if needed.
6. DO NOT give legal advice.

MANDATORY DISCLAIMER:
End your response with:
"#, "\"", disclaimer_text!(), "\"\n");

pub const NO_MATCH_NOTE: &str = "(No high-confidence legal sections matched)";

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system_instructions: String,
    pub user_content: String,
}

/// Pure: the same inputs always give the same prompt.
pub fn build(query: &str, mode: Mode, candidates: &[RetrievedCandidate]) -> Prompt {
    match mode {
        Mode::Grounded => {
            let mut context = String::new();
            for c in candidates {
                // writing to a String cannot fail
                let _ = write!(
                    context,
                    "--- ITEM ---\nAct: {}\nSection: {}\nText: {}\nConfidence: {:.2}\n",
                    c.chunk.act_name, c.chunk.section_number, c.chunk.text, c.score
                );
            }
            Prompt {
                system_instructions: GROUNDED_INSTRUCTIONS.to_string(),
                user_content: format!("USER QUESTION: {}\n\nLEGAL TEXT FOUND:\n{}", query, context),
            }
        }
        Mode::Fallback => Prompt {
            system_instructions: FALLBACK_INSTRUCTIONS.to_string(),
            user_content: format!("USER QUESTION: {}\n\n{}", query, NO_MATCH_NOTE),
        },
    }
}
