//! Prompt analyzer over chat completions
//!
//! The model is asked for a JSON object. Replies are parsed leniently:
//! surrounding prose and code fences are ignored and only the outermost
//! object is read.

use crate::chat::ChatClient;
use crate::endpoint::LlmEndpoint;
use appforge_core::{CollaboratorError, PromptAnalysis, PromptAnalyzer};

const SYSTEM_PROMPT: &str = "You classify software requests. Reply with one JSON object and nothing else: \
{\"intentType\": one of CREATE_COMPONENT, CREATE_API, CREATE_APP, CREATE_FULLSTACK_APP, MODIFY_CODE, UNKNOWN, \
\"confidence\": number between 0 and 1, \"domain\": short lowercase word, \
\"complexity\": one of MINIMAL, MODERATE, COMPLEX, \"entities\": array of technologies mentioned}";

/// Read a [`PromptAnalysis`] out of a model reply
///
/// # Errors
/// [`CollaboratorError::InvalidResponse`] when no usable object is found
pub fn parse_analysis(reply: &str) -> Result<PromptAnalysis, CollaboratorError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let object = match (start, end) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(CollaboratorError::InvalidResponse("reply contains no JSON object".into())),
    };

    let mut analysis: PromptAnalysis =
        serde_json::from_str(object).map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
    analysis.confidence = if analysis.confidence.is_finite() {
        analysis.confidence.clamp(0.0, 1.0)
    } else {
        0.0
    };
    analysis.domain = analysis.domain.trim().to_lowercase();
    if analysis.domain.is_empty() {
        analysis.domain = "general".to_string();
    }
    Ok(analysis)
}

/// [`PromptAnalyzer`] backed by an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct HttpPromptAnalyzer {
    client: ChatClient,
}

impl HttpPromptAnalyzer {
    /// Create analyzer for an endpoint
    #[must_use]
    pub fn new(endpoint: LlmEndpoint) -> Self {
        Self {
            client: ChatClient::new(endpoint),
        }
    }
}

#[async_trait::async_trait]
impl PromptAnalyzer for HttpPromptAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, CollaboratorError> {
        let reply = self.client.complete(SYSTEM_PROMPT, prompt).await?;
        parse_analysis(&reply)
    }
}
