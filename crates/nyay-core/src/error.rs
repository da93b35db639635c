use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Index, metadata or model could not be loaded. The process must not serve.
    #[error("System not initialized: {0}")]
    Initialization(String),

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The loaded index does not match the running embedder or metadata.
    #[error("Index mismatch on {what}: expected {expected}, found {found}")]
    IndexMismatch {
        what: &'static str,
        expected: String,
        found: String,
    },

    #[error("Invalid record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[source] anyhow::Error),
}

impl Error {
    pub fn mismatch(what: &'static str, expected: impl ToString, found: impl ToString) -> Self {
        Self::IndexMismatch {
            what,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
