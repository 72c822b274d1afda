//! Technical specification built during Prepare
//!
//! The specification is the structured project description handed to the
//! multi-generator and folded into the enriched prompt.

use crate::analysis::{PromptAnalysis, FEATURE_TERMS};
use crate::collaborators::Template;
use crate::scope::{FileCountRange, Scope, ScopeType};
use crate::types::{GenerationOptions, GenerationRequest};
use appforge_extract::prompt_noun;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured project description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSpec {
    /// Kebab-case project name
    pub project_name: String,
    /// What to build
    pub description: String,
    /// Scope type
    pub scope_type: ScopeType,
    /// UI framework
    pub framework: String,
    /// Source language
    pub language: String,
    /// Styling approach
    pub style: String,
    /// Application domain
    pub domain: String,
    /// Requested features (auth, payments, ...)
    pub features: Vec<String>,
    /// Technologies and nouns from analysis
    pub entities: Vec<String>,
    /// Names of templates found during Prepare
    pub templates: Vec<String>,
    /// Expected file-count range
    pub expected_files: FileCountRange,
    /// Caller-supplied specification, reused verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

impl TechnicalSpec {
    /// Build the specification for a request
    ///
    /// `options` must already have defaults resolved.
    #[must_use]
    pub fn build(
        request: &GenerationRequest,
        options: &GenerationOptions,
        analysis: &PromptAnalysis,
        scope: &Scope,
        templates: &[Template],
    ) -> Self {
        let custom = request.specification.clone();
        let custom_str = |key: &str| {
            custom
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let project_name = custom_str("projectName")
            .or_else(|| custom_str("name"))
            .unwrap_or_else(|| derive_project_name(&request.prompt, &analysis.domain, scope.scope_type));
        let description = custom_str("description").unwrap_or_else(|| request.prompt.trim().to_string());

        Self {
            project_name,
            description,
            scope_type: scope.scope_type,
            framework: options.framework.clone().unwrap_or_default(),
            language: options.language.clone().unwrap_or_default(),
            style: options.style.clone().unwrap_or_default(),
            domain: analysis.domain.clone(),
            features: FEATURE_TERMS.found(&request.prompt.to_lowercase()),
            entities: analysis.entities.clone(),
            templates: templates.iter().map(|t| t.name.clone()).collect(),
            expected_files: scope.expected_file_count,
            custom,
        }
    }

    /// Whether the target language is TypeScript
    #[inline]
    #[must_use]
    pub fn is_typescript(&self) -> bool {
        matches!(self.language.to_ascii_lowercase().as_str(), "typescript" | "ts")
    }

    /// Extension for UI files
    #[inline]
    #[must_use]
    pub fn ui_extension(&self) -> &'static str {
        if self.is_typescript() {
            "tsx"
        } else {
            "jsx"
        }
    }

    /// Extension for non-UI modules
    #[inline]
    #[must_use]
    pub fn module_extension(&self) -> &'static str {
        if self.is_typescript() {
            "ts"
        } else {
            "js"
        }
    }
}

fn derive_project_name(prompt: &str, domain: &str, scope_type: ScopeType) -> String {
    let prefix = if domain == "general" {
        prompt_noun(prompt).map_or_else(|| "generated".to_string(), |n| n.to_lowercase())
    } else {
        domain.to_string()
    };
    let suffix = match scope_type {
        ScopeType::SingleComponent => "component",
        ScopeType::Feature => "feature",
        ScopeType::Page => "page",
        ScopeType::Backend => "api",
        ScopeType::Fullstack => "app",
        ScopeType::LandingPage => "landing",
    };
    format!("{prefix}-{suffix}")
}
