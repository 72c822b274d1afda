//! End-to-end pipeline behavior with scripted collaborators.

use appforge_core::{
    GenerationOrchestrator, GenerationRequest, MokaResultCache, PipelineConfig, ScopeType, Stage,
};
use appforge_test_utils::{failing_orchestrator, fixtures, setup_orchestrator, FailingCollaborator, FixedTemplates, ScriptedGenerator};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FULLSTACK_PROMPT: &str = "Create a full-stack todo app with React and Express";

#[tokio::test]
async fn every_collaborator_failing_yields_well_formed_failure() {
    let failing = Arc::new(FailingCollaborator::new());
    let orchestrator = failing_orchestrator(&failing);

    let result = orchestrator.generate(GenerationRequest::new(FULLSTACK_PROMPT)).await;

    assert!(!result.success);
    assert!(result.files.is_empty());
    assert!(result.dependencies.is_empty());
    assert!(result.structure.is_empty());
    assert_eq!(result.quality_score, 0.0);
    assert!(result.error.as_deref().unwrap().starts_with("generate stage failed"));

    // analyzer, template search, multi-generator, raw generator
    assert_eq!(failing.calls(), 4);
    assert_eq!(result.warnings.len(), 3);
    let stages: Vec<_> = result.stages.iter().map(|s| (s.stage, s.success)).collect();
    assert_eq!(stages, vec![(Stage::Prepare, true), (Stage::Generate, false)]);
}

#[tokio::test]
async fn failing_gates_never_abort() {
    let failing = Arc::new(FailingCollaborator::new());
    let orchestrator = GenerationOrchestrator::new(Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE)))
        .with_validator(failing.clone())
        .with_quality(failing.clone())
        .with_optimizer(failing.clone());

    let result = orchestrator.execute(GenerationRequest::new("Create a greeting component")).await;

    assert!(result.success);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.quality_score, 0.0);
    assert_eq!(failing.calls(), 3);
    assert_eq!(result.warnings.len(), 3);
    assert!(result
        .warnings
        .iter()
        .all(|w| w.path.as_deref() == Some("src/Greeting.tsx")));
    assert!(result.stage(Stage::Validate).unwrap().success);
    assert!(result.stage(Stage::Optimize).unwrap().success);
}

#[tokio::test]
async fn greeting_runs_through_every_stage() {
    let generator = Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE));
    let orchestrator = setup_orchestrator(generator.clone());

    let result = orchestrator.execute(GenerationRequest::new("Create a greeting component")).await;

    assert!(result.success, "{:?}", result.error);
    let file = result.file("src/Greeting.tsx").unwrap();
    assert_eq!(file.name, "Greeting");
    assert_eq!(file.metadata.validated, Some(true));
    assert_eq!(file.metadata.quality_score, Some(100.0));
    assert_eq!(result.quality_score, 100.0);
    assert_eq!(result.stages.len(), 4);
    assert!(result.readme.contains("Greeting.tsx"));
    assert_eq!(result.scope.unwrap().scope_type, ScopeType::SingleComponent);

    let prompts = generator.prompts().await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Request: Create a greeting component"));
}

#[tokio::test]
async fn fullstack_tree_and_dependencies() {
    let orchestrator = setup_orchestrator(Arc::new(ScriptedGenerator::always(fixtures::FULLSTACK_HEADERS)));

    let result = orchestrator.execute(GenerationRequest::new(FULLSTACK_PROMPT)).await;

    assert!(result.success);
    assert_eq!(result.files.len(), 3);
    assert_eq!(
        result.dependencies,
        vec!["axios".to_string(), "express".to_string(), "react".to_string()]
    );
    assert!(result.structure.folder(&["server", "src", "routes"]).unwrap().has_file("todos.js"));
    assert!(result.structure.folder(&["client", "src"]).unwrap().has_file("App.tsx"));

    let scope = result.scope.unwrap();
    assert_eq!(scope.scope_type, ScopeType::Fullstack);
    assert!(scope.frontend && scope.backend);
    assert!(result.manifest.contains("\"name\": \"todo-app\""));
}

#[tokio::test]
async fn unstructured_reply_still_produces_a_file() {
    let orchestrator = setup_orchestrator(Arc::new(ScriptedGenerator::always(fixtures::PROSE)));

    let result = orchestrator.execute(GenerationRequest::new("Create a simple button component")).await;

    assert!(result.success);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, "src/App.tsx");
    assert_eq!(result.stage(Stage::Generate).unwrap().output["strategy"], "fallback");
}

#[tokio::test]
async fn invalid_files_are_annotated_not_removed() {
    let reply = "```script:Broken:ts:src/broken.ts\nexport const broken = (value: number => value;\n```";
    let orchestrator = setup_orchestrator(Arc::new(ScriptedGenerator::always(reply)));

    let result = orchestrator.execute(GenerationRequest::new("Create a helper")).await;

    assert!(result.success);
    let file = result.file("src/broken.ts").unwrap();
    assert_eq!(file.metadata.validated, Some(false));
    assert_eq!(file.metadata.validation_issues.len(), 1);
    assert_eq!(result.stage(Stage::Validate).unwrap().output["rejected"], 1);
}

#[tokio::test]
async fn disabled_stages_are_skipped() {
    let orchestrator = setup_orchestrator(Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE)))
        .with_config(PipelineConfig::new().with_validation(false).with_optimization(false));

    let result = orchestrator.execute(GenerationRequest::new("Create a greeting component")).await;

    assert!(result.success);
    assert_eq!(result.stage(Stage::Validate).unwrap().output["skipped"], "disabled");
    assert_eq!(result.stage(Stage::Optimize).unwrap().output["skipped"], "disabled");
    assert!(result.files[0].metadata.validated.is_none());
}

#[tokio::test]
async fn templates_flow_into_the_prompt() {
    let generator = Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE));
    let templates = Arc::new(FixedTemplates::new(&["MERN starter"]));
    let orchestrator = setup_orchestrator(generator.clone()).with_templates(templates.clone());

    orchestrator.execute(GenerationRequest::new(FULLSTACK_PROMPT)).await;

    let queries = templates.queries().await;
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].keyword, "todo");
    assert_eq!(queries[0].category.as_deref(), Some("fullstack"));
    assert!(generator.prompts().await[0].contains("Reference templates: MERN starter"));
}

#[tokio::test]
async fn successful_results_are_cached_by_key() {
    let generator = Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE));
    let orchestrator = setup_orchestrator(generator.clone()).with_cache(Arc::new(MokaResultCache::new(16)));

    let first = orchestrator
        .generate(GenerationRequest::new("Create a greeting component").with_cache_key("greeting"))
        .await;
    let repeat = GenerationRequest::new("Create a greeting component").with_cache_key("greeting");
    let repeat_id = repeat.id;
    let second = orchestrator.generate(repeat).await;

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(second.request_id, repeat_id);
    assert_ne!(second.request_id, first.request_id);
    assert_eq!(second.files.len(), first.files.len());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let failing = Arc::new(FailingCollaborator::new());
    let orchestrator = GenerationOrchestrator::new(failing.clone()).with_cache(Arc::new(MokaResultCache::new(16)));

    for _ in 0..2 {
        let result = orchestrator
            .generate(GenerationRequest::new("Create a greeting component").with_cache_key("k"))
            .await;
        assert!(!result.success && !result.cached);
    }
    assert_eq!(failing.calls(), 2);
}

#[tokio::test]
async fn derived_keys_need_opt_in() {
    let generator = Arc::new(ScriptedGenerator::always(fixtures::HEADER_FENCE));
    let cache = Arc::new(MokaResultCache::new(16));
    let plain = setup_orchestrator(generator.clone()).with_cache(cache.clone());

    plain.generate(GenerationRequest::new("Create a greeting component")).await;
    plain.generate(GenerationRequest::new("Create a greeting component")).await;
    assert_eq!(generator.calls(), 2);

    let mut config = PipelineConfig::new();
    config.cache.derive_keys = true;
    let deriving = setup_orchestrator(generator.clone()).with_cache(cache).with_config(config);

    deriving.generate(GenerationRequest::new("Create a greeting component")).await;
    let again = deriving.generate(GenerationRequest::new("  Create a greeting component ")).await;
    assert!(again.cached);
    assert_eq!(generator.calls(), 3);
}
