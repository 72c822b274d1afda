//! Core pipeline types
//!
//! - Requests and their option flags
//! - Stage identifiers and per-stage diagnostics
//! - The final [`GenerationResult`]

use crate::analysis::Intent;
use crate::error::StageWarning;
use crate::scope::Scope;
use appforge_artifact::{GeneratedFile, ProjectStructure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// Unique request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Analysis, scope and specification
    Prepare,
    /// Text generation and extraction
    Generate,
    /// Per-file static validation
    Validate,
    /// Per-file quality analysis and rewriting
    Optimize,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [Stage::Prepare, Stage::Generate, Stage::Validate, Stage::Optimize];

    /// Stage name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Generate => "generate",
            Stage::Validate => "validate",
            Stage::Optimize => "optimize",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-selected technology flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// UI framework (e.g. `react`)
    pub framework: Option<String>,
    /// Source language (e.g. `typescript`)
    pub language: Option<String>,
    /// Styling approach (e.g. `tailwind`)
    pub style: Option<String>,
}

/// One generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Request identifier
    #[serde(default)]
    pub id: RequestId,
    /// Free-text prompt
    pub prompt: String,
    /// Structured specification supplied by the caller
    #[serde(default)]
    pub specification: Option<Value>,
    /// Technology flags
    #[serde(default)]
    pub options: GenerationOptions,
    /// Intent determined upstream, if any
    #[serde(default)]
    pub intent: Option<Intent>,
    /// Cache key supplied by the caller
    #[serde(default)]
    pub cache_key: Option<String>,
}

impl GenerationRequest {
    /// Create a request for a prompt
    #[inline]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            prompt: prompt.into(),
            specification: None,
            options: GenerationOptions::default(),
            intent: None,
            cache_key: None,
        }
    }

    /// With technology flags
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// With a caller-supplied specification
    #[inline]
    #[must_use]
    pub fn with_specification(mut self, specification: Value) -> Self {
        self.specification = Some(specification);
        self
    }

    /// With an upstream intent
    #[inline]
    #[must_use]
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = Some(intent);
        self
    }

    /// With a cache key
    #[inline]
    #[must_use]
    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    /// Content-derived cache key over prompt, options and specification
    #[must_use]
    pub fn content_key(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.prompt.trim().as_bytes());
        for flag in [&self.options.framework, &self.options.language, &self.options.style] {
            hasher.update(&[0]);
            hasher.update(flag.as_deref().unwrap_or("").as_bytes());
        }
        if let Some(spec) = &self.specification {
            hasher.update(&[1]);
            hasher.update(spec.to_string().as_bytes());
        }
        format!("gen:{}", hasher.finalize().to_hex())
    }
}

/// Diagnostics for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    /// Stage
    pub stage: Stage,
    /// Whether the stage completed
    pub success: bool,
    /// Stage-specific JSON summary
    pub output: Value,
    /// Wall time
    pub duration_ms: u64,
    /// Failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    /// Successful stage
    #[inline]
    #[must_use]
    pub fn ok(stage: Stage, output: Value, duration_ms: u64) -> Self {
        Self {
            stage,
            success: true,
            output,
            duration_ms,
            error: None,
        }
    }

    /// Failed stage
    #[inline]
    pub fn failed(stage: Stage, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            stage,
            success: false,
            output: Value::Null,
            duration_ms,
            error: Some(error.into()),
        }
    }
}

/// Final pipeline output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Request this result answers
    pub request_id: RequestId,
    /// Whether every fatal stage succeeded
    pub success: bool,
    /// Final files (never empty on success)
    pub files: Vec<GeneratedFile>,
    /// Folder/file tree
    pub structure: ProjectStructure,
    /// Mean per-file quality score (0-100)
    pub quality_score: f64,
    /// De-duplicated, sorted package dependencies
    pub dependencies: Vec<String>,
    /// `package.json` text
    pub manifest: String,
    /// `README.md` text
    pub readme: String,
    /// Scope computed in Prepare
    pub scope: Option<Scope>,
    /// Per-stage diagnostics
    pub stages: Vec<StageResult>,
    /// Degraded, non-blocking failures
    pub warnings: Vec<StageWarning>,
    /// Failure reason
    pub error: Option<String>,
    /// Total wall time
    pub duration_ms: u64,
    /// Served from the result cache
    pub cached: bool,
}

impl GenerationResult {
    /// Well-formed failure: empty collections, zeroed metrics, populated error
    #[must_use]
    pub fn failure(
        request_id: RequestId,
        error: impl Into<String>,
        stages: Vec<StageResult>,
        warnings: Vec<StageWarning>,
    ) -> Self {
        Self {
            request_id,
            success: false,
            files: Vec::new(),
            structure: ProjectStructure::new(),
            quality_score: 0.0,
            dependencies: Vec::new(),
            manifest: String::new(),
            readme: String::new(),
            scope: None,
            stages,
            warnings,
            error: Some(error.into()),
            duration_ms: 0,
            cached: false,
        }
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Look up a file by path
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Diagnostics for one stage
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.iter().find(|s| s.stage == stage)
    }
}
