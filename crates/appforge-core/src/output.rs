//! Derived project documents
//!
//! `package.json` and `README.md` text rendered from the final file list.
//! Both are pure functions of their inputs.

use crate::scope::ScopeType;
use crate::spec::TechnicalSpec;
use appforge_artifact::{GeneratedFile, ProjectStructure};
use serde_json::{json, Map, Value};

/// Render `package.json`
#[must_use]
pub fn render_manifest(spec: &TechnicalSpec, dependencies: &[String]) -> String {
    let deps: Map<String, Value> = dependencies
        .iter()
        .map(|d| (d.clone(), Value::String("latest".to_string())))
        .collect();

    let mut dev = Map::new();
    if spec.is_typescript() {
        dev.insert("typescript".to_string(), json!("latest"));
    }
    let scripts = match spec.scope_type {
        ScopeType::Backend => json!({
            "start": format!("node src/server.{}", spec.module_extension()),
            "dev": format!("nodemon src/server.{}", spec.module_extension()),
        }),
        ScopeType::Fullstack => json!({
            "dev": "npm run dev --prefix server & npm run dev --prefix client",
            "build": "npm run build --prefix client",
        }),
        _ => {
            dev.insert("vite".to_string(), json!("latest"));
            json!({ "dev": "vite", "build": "vite build", "preview": "vite preview" })
        }
    };

    let manifest = json!({
        "name": spec.project_name,
        "version": "0.1.0",
        "private": true,
        "description": spec.description,
        "scripts": scripts,
        "dependencies": deps,
        "devDependencies": dev,
    });
    format!("{manifest:#}\n")
}

/// Render `README.md`
#[must_use]
pub fn render_readme(
    spec: &TechnicalSpec,
    files: &[GeneratedFile],
    structure: &ProjectStructure,
    dependencies: &[String],
) -> String {
    let mut lines = vec![
        format!("# {}", spec.project_name),
        String::new(),
        spec.description.clone(),
        String::new(),
        "## Stack".to_string(),
        String::new(),
        format!("- Framework: {}", spec.framework),
        format!("- Language: {}", spec.language),
        format!("- Styling: {}", spec.style),
        String::new(),
        format!("## Files ({})", files.len()),
        String::new(),
        "```text".to_string(),
        structure.render().trim_end().to_string(),
        "```".to_string(),
    ];

    if !dependencies.is_empty() {
        lines.extend([String::new(), "## Dependencies".to_string(), String::new()]);
        lines.extend(dependencies.iter().map(|d| format!("- `{d}`")));
    }

    lines.extend([
        String::new(),
        "## Getting started".to_string(),
        String::new(),
        "```sh".to_string(),
        "npm install".to_string(),
        "npm run dev".to_string(),
        "```".to_string(),
    ]);
    let mut readme = lines.join("\n");
    readme.push('\n');
    readme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PromptAnalysis;
    use crate::scope::ScopeClassifier;
    use crate::types::{GenerationOptions, GenerationRequest};

    fn spec(prompt: &str) -> TechnicalSpec {
        let request = GenerationRequest::new(prompt);
        let options = GenerationOptions {
            framework: Some("react".into()),
            language: Some("typescript".into()),
            style: Some("tailwind".into()),
        };
        let analysis = PromptAnalysis::fallback(prompt);
        let scope = ScopeClassifier::new().classify(prompt, None);
        TechnicalSpec::build(&request, &options, &analysis, &scope, &[])
    }

    #[test]
    fn manifest_lists_dependencies() {
        let spec = spec("Create a simple button component");
        let manifest: Value =
            serde_json::from_str(&render_manifest(&spec, &["clsx".into(), "react".into()])).unwrap();

        assert_eq!(manifest["name"], "button-component");
        assert_eq!(manifest["dependencies"]["react"], "latest");
        assert_eq!(manifest["devDependencies"]["typescript"], "latest");
        assert_eq!(manifest["scripts"]["dev"], "vite");
    }

    #[test]
    fn backend_manifest_scripts() {
        let spec = spec("Build a REST API for orders with Express and MongoDB");
        let manifest: Value = serde_json::from_str(&render_manifest(&spec, &[])).unwrap();
        assert_eq!(manifest["scripts"]["start"], "node src/server.ts");
        assert!(manifest["dependencies"].as_object().unwrap().is_empty());
    }

    #[test]
    fn readme_renders_tree() {
        let spec = spec("Create a simple button component");
        let files = vec![
            GeneratedFile::new("src/components/Button.tsx", "export default function Button() {}").unwrap(),
        ];
        let structure = ProjectStructure::from_paths(["src/components/Button.tsx"]);
        let readme = render_readme(&spec, &files, &structure, &["react".into()]);

        assert!(readme.starts_with("# button-component\n"));
        assert!(readme.contains("## Files (1)"));
        assert!(readme.contains("Button.tsx"));
        assert!(readme.contains("- `react`"));
        assert_eq!(readme, render_readme(&spec, &files, &structure, &["react".into()]));
    }
}
