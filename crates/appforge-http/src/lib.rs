//! appforge HTTP collaborators
//!
//! OpenAI-compatible implementations of the pipeline's text-generation
//! seams. The endpoint comes from `APPFORGE_LLM_URL`, `APPFORGE_LLM_API_KEY`
//! and `APPFORGE_LLM_MODEL`.

#![warn(unreachable_pub)]

mod analyzer;
mod chat;
mod endpoint;
mod generator;

pub use analyzer::{parse_analysis, HttpPromptAnalyzer};
pub use chat::{parse_completion, ChatClient};
pub use endpoint::{LlmEndpoint, API_KEY_VAR, MODEL_VAR, TIMEOUT_VAR, URL_VAR};
pub use generator::HttpTextGenerator;
