//! Scope classification properties and scenarios.

use appforge_core::{Complexity, FileCountRange, Intent, ScopeClassifier, ScopeType};
use proptest::prelude::*;

fn classify(text: &str) -> appforge_core::Scope {
    ScopeClassifier::new().classify(text, None)
}

#[test]
fn fullstack_scenario() {
    let scope = classify("Create a full-stack todo app with React and Express");
    assert_eq!(scope.scope_type, ScopeType::Fullstack);
    assert_eq!(scope.complexity, Complexity::Complex);
    assert!(scope.expected_file_count.min >= 20);
    assert!(scope.frontend && scope.backend);
}

#[test]
fn single_component_scenario() {
    let scope = classify("Create a simple button component");
    assert_eq!(scope.scope_type, ScopeType::SingleComponent);
    assert_eq!(scope.expected_file_count, FileCountRange::new(2, 4));
}

#[test]
fn co_occurrence_decides_fullstack() {
    assert_eq!(classify("Build an api and a react component that calls it").scope_type, ScopeType::Fullstack);
    assert_eq!(classify("Build an api for orders").scope_type, ScopeType::Backend);
}

#[test]
fn rule_order_beats_match_count() {
    // page vocabulary outnumbers landing vocabulary, landing still wins
    let scope = classify("a landing page with a hero section for my dashboard pages portal");
    assert_eq!(scope.scope_type, ScopeType::LandingPage);
    assert!(!scope.keywords.is_empty());
}

#[test]
fn intent_applies_only_without_lexical_match() {
    let classifier = ScopeClassifier::new();
    assert_eq!(
        classifier.classify("something nice", Some(Intent::CreateComponent)).scope_type,
        ScopeType::SingleComponent
    );
    assert_eq!(
        classifier.classify("Build an api for orders", Some(Intent::CreateComponent)).scope_type,
        ScopeType::Backend
    );
    assert_eq!(classifier.classify("something nice", Some(Intent::ModifyCode)).scope_type, ScopeType::Feature);
}

#[test]
fn default_is_feature() {
    let scope = classify("something nice");
    assert_eq!(scope.scope_type, ScopeType::Feature);
    assert_eq!(scope.confidence, 0.5);
    assert_eq!(scope.expected_file_count, FileCountRange::new(6, 12));
}

proptest! {
    #[test]
    fn prop_range_is_ordered(text in "\\PC{1,200}") {
        let scope = classify(&text);
        prop_assert!(scope.expected_file_count.min <= scope.expected_file_count.max);
        prop_assert!((0.0..=1.0).contains(&scope.confidence));
        prop_assert!(matches!(
            scope.scope_type,
            ScopeType::SingleComponent
                | ScopeType::Feature
                | ScopeType::Page
                | ScopeType::Backend
                | ScopeType::Fullstack
                | ScopeType::LandingPage
        ));
    }

    #[test]
    fn prop_classify_is_deterministic(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "create", "api", "react", "component", "button", "dashboard", "landing", "hero",
                "pricing", "express", "todo", "full-stack", "database", "page", "nice",
            ]),
            1..12,
        )
    ) {
        let text = words.join(" ");
        prop_assert_eq!(classify(&text), classify(&text));
    }
}
