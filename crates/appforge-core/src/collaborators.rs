//! External collaborator seams
//!
//! The pipeline depends on these traits only. Implementations are injected
//! into [`crate::GenerationOrchestrator`] as `Arc<dyn Trait>`; HTTP-backed
//! versions live in `appforge-http` and offline heuristics in [`crate::builtin`].

use crate::analysis::PromptAnalysis;
use crate::error::CollaboratorError;
use crate::spec::TechnicalSpec;
use appforge_artifact::{GeneratedFile, Language};
use appforge_extract::{derive_name, files_from_json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stored project template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category (e.g. `fullstack`, `component`)
    #[serde(default)]
    pub category: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Short description
    #[serde(default)]
    pub description: String,
}

/// Template search parameters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateQuery {
    /// Main keyword
    pub keyword: String,
    /// Category filter
    pub category: Option<String>,
    /// Tag filter
    pub tags: Vec<String>,
}

/// Static validation outcome for one source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the source passed
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// Score (0-100)
    pub score: f64,
    /// Problems found
    #[serde(default)]
    pub issues: Vec<String>,
}

/// Quality analysis outcome for one source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Overall score (0-100)
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    /// Individual metric values
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

/// Per-call optimizer flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    /// Source language of the text
    pub language: Language,
    /// Normalize whitespace
    pub format: bool,
    /// Strip `console.log` calls
    pub remove_console: bool,
    /// Strip whole-line comments
    pub remove_comments: bool,
}

/// Code optimizer outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    /// Rewritten source
    #[serde(rename = "optimizedCode")]
    pub optimized_code: String,
    /// Human-readable list of applied changes
    #[serde(default)]
    pub changes: Vec<String>,
}

/// Component emitted by a multi-generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentOutput {
    /// Component name
    pub name: String,
    /// Source code
    pub code: String,
    /// Explicit path
    #[serde(default)]
    pub path: Option<String>,
}

/// Output shapes a multi-generator may return
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum MultiOutput {
    /// Files with paths already assigned
    Files(Vec<GeneratedFile>),
    /// Known object shape (`server`, `routes`, `controllers`, ...)
    Structured(Value),
    /// Named components without a folder layout
    Components(Vec<ComponentOutput>),
}

impl MultiOutput {
    /// Convert any shape into files
    #[must_use]
    pub fn into_files(self) -> Vec<GeneratedFile> {
        match self {
            MultiOutput::Files(files) => files,
            MultiOutput::Structured(value) => files_from_json(&value),
            MultiOutput::Components(components) => components
                .into_iter()
                .filter(|c| !c.code.trim().is_empty())
                .filter_map(|c| {
                    let name = if c.name.trim().is_empty() {
                        derive_name(&c.code, c.path.as_deref())
                    } else {
                        c.name
                    };
                    let path = c
                        .path
                        .unwrap_or_else(|| format!("src/components/{name}.tsx"));
                    GeneratedFile::new(&path, c.code).ok().map(|f| f.with_name(name))
                })
                .collect(),
        }
    }
}

/// Multi-generator reply: output plus non-fatal notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiResponse {
    /// Generated output
    pub output: MultiOutput,
    /// Partial failures worth surfacing
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl From<MultiOutput> for MultiResponse {
    fn from(output: MultiOutput) -> Self {
        Self {
            output,
            warnings: Vec::new(),
        }
    }
}

/// Structured analysis of a prompt
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PromptAnalyzer: Send + Sync {
    /// Analyze prompt text
    async fn analyze(&self, prompt: &str) -> Result<PromptAnalysis, CollaboratorError>;
}

/// Template library lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TemplateSearch: Send + Sync {
    /// Find templates matching the query
    async fn search(&self, query: &TemplateQuery) -> Result<Vec<Template>, CollaboratorError>;
}

/// Structured project generator used for full-stack scope
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MultiGenerator: Send + Sync {
    /// Generate a project from its technical specification
    async fn generate(&self, spec: &TechnicalSpec) -> Result<MultiResponse, CollaboratorError>;
}

/// Unstructured text generator
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RawTextGenerator: Send + Sync {
    /// Produce source text for an enriched prompt
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

/// Static validator
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StaticValidator: Send + Sync {
    /// Validate one source text
    async fn validate(&self, source: &str, language: Language) -> Result<ValidationReport, CollaboratorError>;
}

/// Quality analyzer
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait QualityAnalyzer: Send + Sync {
    /// Score one source text
    async fn analyze(&self, source: &str, language: Language) -> Result<QualityReport, CollaboratorError>;
}

/// Code optimizer
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CodeOptimizer: Send + Sync {
    /// Rewrite one source text
    async fn optimize(&self, source: &str, options: &OptimizeOptions) -> Result<Optimization, CollaboratorError>;
}
