//! Raw-text generator over chat completions

use crate::chat::ChatClient;
use crate::endpoint::LlmEndpoint;
use appforge_core::{CollaboratorError, RawTextGenerator};

const SYSTEM_PROMPT: &str = "You are a senior software engineer. You write complete, production-ready source files \
and follow the requested output format exactly.";

/// [`RawTextGenerator`] backed by an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    client: ChatClient,
}

impl HttpTextGenerator {
    /// Create generator for an endpoint
    #[must_use]
    pub fn new(endpoint: LlmEndpoint) -> Self {
        Self {
            client: ChatClient::new(endpoint),
        }
    }

    /// Create generator from `APPFORGE_LLM_*` variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LlmEndpoint::from_env())
    }
}

#[async_trait::async_trait]
impl RawTextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.client.complete(SYSTEM_PROMPT, prompt).await
    }
}
