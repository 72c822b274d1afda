//! Chat completions client

use crate::endpoint::LlmEndpoint;
use appforge_core::CollaboratorError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// First choice's content from a chat completions body
///
/// # Errors
/// [`CollaboratorError::InvalidResponse`] when the body is not a completion
/// or carries no content
pub fn parse_completion(body: &str) -> Result<String, CollaboratorError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| CollaboratorError::InvalidResponse("completion has no content".into()))
}

/// Thin OpenAI-compatible chat client
#[derive(Debug, Clone)]
pub struct ChatClient {
    endpoint: LlmEndpoint,
    http: reqwest::Client,
}

impl ChatClient {
    /// Create client for an endpoint
    #[must_use]
    pub fn new(endpoint: LlmEndpoint) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    /// Endpoint in use
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &LlmEndpoint {
        &self.endpoint
    }

    /// Send one system + user exchange and return the reply text
    ///
    /// # Errors
    /// Maps transport failures, non-success statuses and malformed bodies to
    /// [`CollaboratorError`]
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CollaboratorError> {
        let request = ChatRequest {
            model: &self.endpoint.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.endpoint.temperature,
        };

        let mut builder = self
            .http
            .post(self.endpoint.completions_url())
            .timeout(self.endpoint.timeout)
            .json(&request);
        if let Some(key) = &self.endpoint.api_key {
            builder = builder.bearer_auth(key);
        }

        tracing::debug!(model = %self.endpoint.model, prompt_chars = user.len(), "sending chat completion");
        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;
        if !status.is_success() {
            return Err(CollaboratorError::Failed(format!("HTTP {status}: {}", truncate(&body, 200))));
        }
        parse_completion(&body)
    }

    fn transport_error(&self, error: &reqwest::Error) -> CollaboratorError {
        if error.is_timeout() {
            CollaboratorError::Timeout {
                duration_secs: self.endpoint.timeout.as_secs(),
            }
        } else if error.is_connect() {
            CollaboratorError::Unavailable(error.to_string())
        } else {
            CollaboratorError::Failed(error.to_string())
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "hello");
    }

    #[test]
    fn rejects_empty_or_malformed() {
        assert!(matches!(
            parse_completion(r#"{"choices":[]}"#),
            Err(CollaboratorError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(CollaboratorError::InvalidResponse(_))
        ));
        assert!(matches!(parse_completion("<html>"), Err(CollaboratorError::InvalidResponse(_))));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }
}
