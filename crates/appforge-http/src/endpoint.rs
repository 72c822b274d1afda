//! Endpoint configuration read from the environment

use std::time::Duration;

/// Base URL variable
pub const URL_VAR: &str = "APPFORGE_LLM_URL";
/// API key variable
pub const API_KEY_VAR: &str = "APPFORGE_LLM_API_KEY";
/// Model variable
pub const MODEL_VAR: &str = "APPFORGE_LLM_MODEL";
/// Request timeout variable, in seconds
pub const TIMEOUT_VAR: &str = "APPFORGE_LLM_TIMEOUT_SECS";

const DEFAULT_URL: &str = "http://localhost:11434/v1";
const DEFAULT_MODEL: &str = "qwen2.5-coder";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI-compatible endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct LlmEndpoint {
    /// Base URL (without `/chat/completions`)
    pub base_url: String,
    /// Bearer token, if the endpoint needs one
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmEndpoint {
    /// Create endpoint with defaults for everything but the URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: 0.2,
        }
    }

    /// Read `APPFORGE_LLM_*` variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut endpoint = Self::new(get(URL_VAR).unwrap_or_else(|| DEFAULT_URL.to_string()));
        endpoint.api_key = get(API_KEY_VAR);
        if let Some(model) = get(MODEL_VAR) {
            endpoint.model = model;
        }
        if let Some(secs) = get(TIMEOUT_VAR).and_then(|v| v.parse::<u64>().ok()) {
            endpoint.timeout = Duration::from_secs(secs.max(1));
        }
        endpoint
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With model
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Chat completions URL
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
