//! Enriched prompt construction
//!
//! The raw-text generator receives a deterministic instruction block: a
//! project summary, a scope-specific file plan, the expected file count and
//! the fenced-block output contract the header extraction strategy parses.

use crate::scope::{Scope, ScopeType};
use crate::spec::TechnicalSpec;
use crate::types::GenerationRequest;

/// Build the prompt sent to the raw-text generator
#[must_use]
pub fn build_enriched_prompt(request: &GenerationRequest, spec: &TechnicalSpec, scope: &Scope) -> String {
    let ui = spec.ui_extension();
    let module = spec.module_extension();

    let mut lines = vec![
        format!("Generate a {} for the request below.", describe(scope.scope_type)),
        String::new(),
        format!("Request: {}", request.prompt.trim()),
        String::new(),
        format!("Project: {}", spec.project_name),
        format!("Stack: {} + {} with {} styling", spec.framework, spec.language, spec.style),
    ];
    if spec.domain != "general" {
        lines.push(format!("Domain: {}", spec.domain));
    }
    if !spec.features.is_empty() {
        lines.push(format!("Features: {}", spec.features.join(", ")));
    }
    if !spec.entities.is_empty() {
        lines.push(format!("Mentioned technologies: {}", spec.entities.join(", ")));
    }
    if !spec.templates.is_empty() {
        lines.push(format!("Reference templates: {}", spec.templates.join(", ")));
    }
    if let Some(custom) = &spec.custom {
        lines.push(format!("Specification: {custom}"));
    }

    lines.push(String::new());
    lines.push("File plan:".to_string());
    lines.extend(file_plan(scope, ui, module).into_iter().map(|l| format!("- {l}")));

    let range = scope.expected_file_count;
    lines.extend([
        String::new(),
        format!("Produce between {} and {} files.", range.min, range.max),
        String::new(),
        "Output format:".to_string(),
        "Return every file in its own fenced code block whose info string is type:Name:lang:path, for example:"
            .to_string(),
        String::new(),
        format!("```component:Button:{ui}:src/components/Button.{ui}"),
        "export default function Button() { return <button>Click</button>; }".to_string(),
        "```".to_string(),
        String::new(),
        "Write complete file contents with no placeholders and no prose between blocks.".to_string(),
    ]);
    lines.join("\n")
}

fn describe(scope_type: ScopeType) -> &'static str {
    match scope_type {
        ScopeType::SingleComponent => "single reusable UI component",
        ScopeType::Feature => "self-contained feature",
        ScopeType::Page => "complete page",
        ScopeType::Backend => "backend API service",
        ScopeType::Fullstack => "full-stack application",
        ScopeType::LandingPage => "marketing landing page",
    }
}

fn file_plan(scope: &Scope, ui: &str, module: &str) -> Vec<String> {
    match scope.scope_type {
        ScopeType::SingleComponent => vec![
            format!("src/components/<Name>.{ui}: the component"),
            "src/components/<Name>.css or utility classes for styling".to_string(),
            format!("src/components/<Name>.test.{ui}: a focused test"),
        ],
        ScopeType::Feature => vec![
            format!("src/components/: feature components (.{ui})"),
            format!("src/hooks/: state and data hooks (.{module})"),
            format!("src/types/ or src/lib/: shared types and helpers (.{module})"),
            format!("src/App.{ui}: wiring the feature together"),
        ],
        ScopeType::Page => vec![
            format!("src/pages/<Page>.{ui}: the page"),
            format!("src/components/: page sections (.{ui})"),
            format!("src/hooks/: data loading (.{module})"),
            format!("src/App.{ui}: routing or mounting"),
        ],
        ScopeType::LandingPage => vec![
            format!("src/pages/Landing.{ui}: page composition"),
            format!("src/components/sections/: Hero, Features, Pricing, Testimonials, CallToAction, Footer (.{ui})"),
            "src/index.css: global styles".to_string(),
        ],
        ScopeType::Backend => {
            let mut plan = vec![
                format!("src/server.{module}: process entry point"),
                format!("src/app.{module}: application setup and middleware"),
                format!("src/routes/: one router per resource (.{module})"),
                format!("src/controllers/: request handlers (.{module})"),
                format!("src/middleware/: error handling and validation (.{module})"),
                format!("src/config/index.{module}: environment configuration"),
            ];
            if scope.database {
                plan.push(format!("src/models/: data models (.{module})"));
            }
            plan
        }
        ScopeType::Fullstack => {
            let mut plan = vec![
                format!("client/src/App.{ui}: frontend root"),
                format!("client/src/components/: UI components (.{ui})"),
                format!("client/src/pages/: routed pages (.{ui})"),
                format!("client/src/api/: HTTP client for the backend (.{module})"),
                format!("server/src/server.{module}: backend entry point"),
                format!("server/src/routes/ and server/src/controllers/: REST API (.{module})"),
                format!("server/src/middleware/: auth, validation, errors (.{module})"),
            ];
            if scope.database {
                plan.push(format!("server/src/models/ and server/src/db.{module}: database layer"));
            }
            plan.push("package.json files for client and server".to_string());
            plan
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PromptAnalysis;
    use crate::scope::ScopeClassifier;
    use crate::types::GenerationOptions;
    use appforge_extract::strategies::FenceHeader;

    fn prompt_for(text: &str, language: &str) -> String {
        let request = GenerationRequest::new(text);
        let options = GenerationOptions {
            framework: Some("react".into()),
            language: Some(language.into()),
            style: Some("tailwind".into()),
        };
        let analysis = PromptAnalysis::fallback(text);
        let scope = ScopeClassifier::new().classify(text, None);
        let spec = TechnicalSpec::build(&request, &options, &analysis, &scope, &[]);
        build_enriched_prompt(&request, &spec, &scope)
    }

    #[test]
    fn deterministic() {
        let text = "Create a full-stack todo app with React and Express";
        assert_eq!(prompt_for(text, "typescript"), prompt_for(text, "typescript"));
    }

    #[test]
    fn fullstack_plan_and_range() {
        let prompt = prompt_for("Create a full-stack todo app with React and Express", "typescript");
        assert!(prompt.contains("full-stack application"));
        assert!(prompt.contains("client/src/App.tsx"));
        assert!(prompt.contains("server/src/models/"));
        assert!(prompt.contains("between 20 and 30 files"));
    }

    #[test]
    fn example_header_is_parseable() {
        let prompt = prompt_for("Create a simple button component", "javascript");
        let header_line = prompt
            .lines()
            .find(|l| l.starts_with("```component:"))
            .unwrap();
        let header = FenceHeader::parse(header_line.trim_start_matches('`')).unwrap();
        assert_eq!(header.path, "src/components/Button.jsx");
        assert!(prompt.contains("between 2 and 4 files"));
    }
}
