use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use nyay_core::config::LlmSettings;
use nyay_core::traits::{CompletionRequest, LanguageModel};
use nyay_core::Error;

use crate::prompt::DISCLAIMER;

/// Returned whenever the model cannot produce an answer.
pub const UNAVAILABLE_MESSAGE: &str = concat!("System is temporarily unavailable. ", disclaimer_text!());

/// Wraps a [`LanguageModel`] so that generation never fails and never
/// returns empty text. One attempt per call, bounded by `timeout`.
pub struct Generator {
    llm: Arc<dyn LanguageModel>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl Generator {
    pub fn new(llm: Arc<dyn LanguageModel>, settings: &LlmSettings) -> Self {
        Self {
            llm,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout: settings.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    pub async fn generate(&self, system: &str, user: &str) -> String {
        let request = CompletionRequest {
            system: system.to_string(),
            user: user.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        match self.try_generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(model = %self.llm.model_name(), error = %e, "generation failed; returning static fallback");
                UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    async fn try_generate(&self, request: &CompletionRequest) -> Result<String, Error> {
        let text = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| Error::Generation(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| Error::Generation(e.to_string()))?;
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Generation("model returned an empty response".into()));
        }
        debug!(chars = text.len(), "generation succeeded");
        Ok(ensure_disclaimer(text))
    }
}

/// Trim and append the disclaimer unless the text already carries it.
pub fn ensure_disclaimer(text: &str) -> String {
    let text = text.trim();
    if text.contains(DISCLAIMER) {
        text.to_string()
    } else {
        format!("{}\n\n{}", text, DISCLAIMER)
    }
}
