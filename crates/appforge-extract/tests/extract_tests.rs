//! Cascade behavior of the source extractor.

use appforge_artifact::GeneratedFile;
use appforge_extract::strategies::{
    BoundaryStrategy, CommentMarkerStrategy, GenericFenceStrategy, HeaderFenceStrategy,
    JsonPayloadStrategy, FALLBACK_PATH,
};
use appforge_extract::{ExtractionStrategy, SourceExtractor, StrategyKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Wraps a strategy and counts how often it runs
#[derive(Debug)]
struct Counting {
    inner: Box<dyn ExtractionStrategy>,
    calls: Arc<AtomicUsize>,
}

impl ExtractionStrategy for Counting {
    fn kind(&self) -> StrategyKind {
        self.inner.kind()
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.extract(text)
    }
}

fn counted_extractor() -> (SourceExtractor, Vec<Arc<AtomicUsize>>) {
    let inner: Vec<Box<dyn ExtractionStrategy>> = vec![
        Box::new(HeaderFenceStrategy),
        Box::new(CommentMarkerStrategy),
        Box::new(GenericFenceStrategy),
        Box::new(BoundaryStrategy),
        Box::new(JsonPayloadStrategy),
    ];
    let counters: Vec<_> = inner.iter().map(|_| Arc::new(AtomicUsize::new(0))).collect();
    let strategies = inner
        .into_iter()
        .zip(&counters)
        .map(|(inner, calls)| {
            Box::new(Counting {
                inner,
                calls: Arc::clone(calls),
            }) as Box<dyn ExtractionStrategy>
        })
        .collect();
    (SourceExtractor::from_strategies(strategies), counters)
}

fn summary(files: &[GeneratedFile]) -> Vec<(String, String, String)> {
    files
        .iter()
        .map(|f| (f.path.clone(), f.name.clone(), f.content.clone()))
        .collect()
}

const GREETING: &str =
    "```component:Greeting:tsx:src/Greeting.tsx\nexport const Greeting = () => <div>Hi</div>;\n```";

#[test]
fn greeting_scenario() {
    let files = SourceExtractor::new().extract(GREETING);

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "Greeting");
    assert_eq!(files[0].path, "src/Greeting.tsx");
}

#[test]
fn header_match_short_circuits_cascade() {
    let (extractor, counters) = counted_extractor();
    let report = extractor.extract_with_report(GREETING, None);

    assert_eq!(report.strategy, StrategyKind::HeaderFence);
    let calls: Vec<usize> = counters.iter().map(|c| c.load(Ordering::SeqCst)).collect();
    assert_eq!(calls, vec![1, 0, 0, 0, 0]);
}

#[test]
fn empty_object_falls_through_to_fallback() {
    let (extractor, counters) = counted_extractor();
    let report = extractor.extract_with_report("{}", None);

    assert!(report.is_fallback());
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, FALLBACK_PATH);
    assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
}

#[test]
fn liveness_on_degenerate_input() {
    let extractor = SourceExtractor::new();
    assert_eq!(extractor.extract("").len(), 1);
    assert_eq!(extractor.extract("not code at all").len(), 1);
}

#[test]
fn marker_output_beats_generic_fences() {
    let text = "// src/App.tsx\n```tsx\nimport React from 'react';\n\nexport default function App() {\n  return <main>Welcome to the app</main>;\n}\n```\n";
    let report = SourceExtractor::new().extract_with_report(text, None);

    assert_eq!(report.strategy, StrategyKind::CommentMarkers);
    assert_eq!(report.files[0].path, "src/App.tsx");
    assert_eq!(report.files[0].metadata.generator, "extract:comment_markers");
}

#[test]
fn bare_json_payload() {
    let text = r#"{"server": "const app = require('./app');\napp.listen(process.env.PORT || 3000);", "routes": [{"name": "todos", "content": "const router = require('express').Router();\nmodule.exports = router;"}]}"#;
    let report = SourceExtractor::new().extract_with_report(text, None);

    assert_eq!(report.strategy, StrategyKind::JsonPayload);
    let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/server.js", "src/routes/todos.js"]);
}

proptest! {
    #[test]
    fn prop_extract_never_empty(text in ".{0,400}") {
        prop_assert!(!SourceExtractor::new().extract(&text).is_empty());
    }

    #[test]
    fn prop_extract_is_idempotent(
        name in "[A-Z][a-z]{2,8}",
        body in "[a-z ]{60,120}",
        fenced in any::<bool>(),
    ) {
        let code = format!("export function {name}() {{\n  return '{body}';\n}}\n");
        let text = if fenced { format!("```tsx\n{code}```\n") } else { code };

        let extractor = SourceExtractor::new();
        let first = summary(&extractor.extract(&text));
        let second = summary(&extractor.extract(&text));
        prop_assert_eq!(first, second);
    }
}
