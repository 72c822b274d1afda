//! Request scope classification
//!
//! A pure, deterministic classifier over lower-cased prompt text. Rules are
//! evaluated in a fixed order and the first match wins; match counts never
//! break ties.
//!
//! | # | Rule | Scope | Files |
//! |---|------|-------|-------|
//! | 1 | explicit full-stack phrase, or frontend + backend vocabulary | `FULLSTACK` | 20-30 |
//! | 2 | backend vocabulary without frontend (or "backend only") | `BACKEND` | 8-12 |
//! | 3 | "landing page" or two landing-section words | `LANDING_PAGE` | 10-15 |
//! | 4 | dashboard / page vocabulary | `PAGE` | 6-12 |
//! | 5 | imperative verb + component noun, no app/api words | `SINGLE_COMPONENT` | 2-4 |
//! | 6 | upstream intent | mapped | mapped |
//! | 7 | default | `FEATURE` | 6-12 |

use crate::analysis::Intent;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Breadth of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    /// One UI component
    SingleComponent,
    /// A feature spanning a few files
    Feature,
    /// A page or dashboard
    Page,
    /// Server-side only
    Backend,
    /// Frontend, backend and usually a database
    Fullstack,
    /// Marketing landing page
    LandingPage,
}

impl ScopeType {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::SingleComponent => "SINGLE_COMPONENT",
            ScopeType::Feature => "FEATURE",
            ScopeType::Page => "PAGE",
            ScopeType::Backend => "BACKEND",
            ScopeType::Fullstack => "FULLSTACK",
            ScopeType::LandingPage => "LANDING_PAGE",
        }
    }
}

impl std::fmt::Display for ScopeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    /// A handful of files
    Minimal,
    /// Typical feature work
    Moderate,
    /// Multi-subsystem project
    Complex,
}

/// Inclusive expected file-count range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileCountRange {
    /// Lower bound
    pub min: usize,
    /// Upper bound (always `>= min`)
    pub max: usize,
}

impl FileCountRange {
    /// Create a range, swapping bounds if given in the wrong order
    #[inline]
    #[must_use]
    pub fn new(min: usize, max: usize) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Check whether a count falls inside the range
    #[inline]
    #[must_use]
    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// Scope descriptor, computed once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    /// Scope type
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
    /// Expected effort
    pub complexity: Complexity,
    /// Classifier confidence (0-1)
    pub confidence: f64,
    /// Expected number of files
    pub expected_file_count: FileCountRange,
    /// Needs a frontend
    pub frontend: bool,
    /// Needs a backend
    pub backend: bool,
    /// Needs a database
    pub database: bool,
    /// Terms that triggered the rule
    pub keywords: Vec<String>,
}

impl Scope {
    fn new(scope_type: ScopeType, confidence: f64, keywords: Vec<String>) -> Self {
        let (complexity, min, max) = match scope_type {
            ScopeType::SingleComponent => (Complexity::Minimal, 2, 4),
            ScopeType::Feature => (Complexity::Moderate, 6, 12),
            ScopeType::Page => (Complexity::Moderate, 6, 12),
            ScopeType::Backend => (Complexity::Moderate, 8, 12),
            ScopeType::Fullstack => (Complexity::Complex, 20, 30),
            ScopeType::LandingPage => (Complexity::Moderate, 10, 15),
        };
        Self {
            scope_type,
            complexity,
            confidence,
            expected_file_count: FileCountRange::new(min, max),
            frontend: scope_type != ScopeType::Backend,
            backend: matches!(scope_type, ScopeType::Backend | ScopeType::Fullstack),
            database: false,
            keywords,
        }
    }

    fn with_database(mut self, database: bool) -> Self {
        self.database = database;
        self
    }

    /// Whether the structured multi-generator applies
    #[inline]
    #[must_use]
    pub fn is_fullstack(&self) -> bool {
        self.scope_type == ScopeType::Fullstack
    }
}

/// Word-boundary vocabulary matcher
#[derive(Debug)]
pub(crate) struct Vocabulary {
    pattern: Regex,
}

impl Vocabulary {
    pub(crate) fn new(terms: &[&str]) -> Self {
        let mut sorted: Vec<&str> = terms.to_vec();
        // longest first so multi-word terms win over their prefixes
        sorted.sort_by_key(|t| std::cmp::Reverse(t.len()));
        let alternation = sorted
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Self {
            pattern: Regex::new(&format!(r"\b(?:{alternation})\b")).expect("valid vocabulary regex"),
        }
    }

    /// Whether any term occurs
    pub(crate) fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Distinct matched terms in order of first appearance
    pub(crate) fn found(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for m in self.pattern.find_iter(text) {
            if !out.iter().any(|t| t == m.as_str()) {
                out.push(m.as_str().to_string());
            }
        }
        out
    }
}

pub(crate) static FULLSTACK_PHRASES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "full-stack", "full stack", "fullstack", "complete app", "complete application",
        "end-to-end app", "end-to-end application", "entire application", "mern", "mean stack",
    ])
});

pub(crate) static FRONTEND_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "frontend", "front-end", "front end", "ui", "user interface", "react", "vue", "angular",
        "svelte", "next.js", "nextjs", "component", "components", "tailwind", "css", "client-side",
        "client side", "browser", "spa",
    ])
});

pub(crate) static BACKEND_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "api", "apis", "backend", "back-end", "back end", "server", "express", "fastify",
        "nestjs", "koa", "node.js", "nodejs", "endpoint", "endpoints", "rest api", "restful",
        "graphql", "crud", "microservice", "microservices", "database", "mongodb", "postgres",
        "postgresql", "mysql", "prisma",
    ])
});

static BACKEND_ONLY_PHRASES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "backend only", "back-end only", "api only", "server only", "only backend",
        "only the backend", "only an api", "just the api", "just an api", "no frontend",
        "without frontend", "without a frontend", "headless",
    ])
});

pub(crate) static DATABASE_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "database", "db", "mongodb", "mongo", "mongoose", "postgres", "postgresql", "mysql",
        "sqlite", "prisma", "sql", "redis", "orm", "persistence", "persist",
    ])
});

static LANDING_PHRASES: Lazy<Vocabulary> = Lazy::new(|| Vocabulary::new(&["landing page", "landing"]));

static LANDING_SECTIONS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "hero", "cta", "call to action", "call-to-action", "pricing", "testimonial",
        "testimonials", "features section", "feature section", "newsletter", "faq",
    ])
});

static PAGE_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "dashboard", "page", "pages", "admin panel", "portal", "website", "homepage",
        "home page", "screen", "layout",
    ])
});

static IMPERATIVE_VERBS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "create", "make", "build", "generate", "write", "design", "add", "implement", "give me",
    ])
});

pub(crate) static COMPONENT_NOUNS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "component", "button", "card", "modal", "navbar", "nav bar", "form", "input", "widget",
        "header", "footer", "sidebar", "dropdown", "table", "list", "tooltip", "menu", "toggle",
        "badge", "avatar", "spinner", "counter", "slider", "carousel", "tabs", "accordion",
    ])
});

static APP_WORDS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&["app", "application", "api", "system", "platform", "website", "site", "backend", "server"])
});

/// Deterministic scope classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeClassifier;

impl ScopeClassifier {
    /// Create classifier
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classify prompt text, falling back to an upstream intent
    #[must_use]
    pub fn classify(&self, text: &str, intent: Option<Intent>) -> Scope {
        let text = text.to_lowercase();
        let database = DATABASE_TERMS.matches(&text);

        // 1. fullstack
        let explicit = FULLSTACK_PHRASES.found(&text);
        if !explicit.is_empty() {
            return Scope::new(ScopeType::Fullstack, 0.95, explicit).with_database(true);
        }
        let frontend = FRONTEND_TERMS.found(&text);
        let backend = BACKEND_TERMS.found(&text);
        let backend_only = BACKEND_ONLY_PHRASES.found(&text);
        if !frontend.is_empty() && !backend.is_empty() && backend_only.is_empty() {
            let keywords = frontend.into_iter().chain(backend).collect();
            return Scope::new(ScopeType::Fullstack, 0.85, keywords).with_database(database);
        }

        // 2. backend
        if !backend.is_empty() && (frontend.is_empty() || !backend_only.is_empty()) {
            let keywords = backend.into_iter().chain(backend_only).collect();
            return Scope::new(ScopeType::Backend, 0.85, keywords).with_database(database);
        }

        // 3. landing page
        let landing = LANDING_PHRASES.found(&text);
        let sections = LANDING_SECTIONS.found(&text);
        if landing.iter().any(|t| t == "landing page") || sections.len() >= 2 {
            let keywords = landing.into_iter().chain(sections).collect();
            return Scope::new(ScopeType::LandingPage, 0.85, keywords);
        }

        // 4. page
        let pages = PAGE_TERMS.found(&text);
        if !pages.is_empty() {
            return Scope::new(ScopeType::Page, 0.75, pages);
        }

        // 5. single component
        let verbs = IMPERATIVE_VERBS.found(&text);
        let nouns = COMPONENT_NOUNS.found(&text);
        if !verbs.is_empty() && !nouns.is_empty() && !APP_WORDS.matches(&text) {
            let keywords = verbs.into_iter().chain(nouns).collect();
            return Scope::new(ScopeType::SingleComponent, 0.9, keywords);
        }

        // 6. upstream intent
        if let Some((intent, scope_type)) = intent.and_then(|i| Some((i, i.scope_type()?))) {
            let keyword = format!("intent:{}", intent.as_str());
            let scope = Scope::new(scope_type, 0.6, vec![keyword]);
            return scope.with_database(database && scope_type != ScopeType::SingleComponent);
        }

        // 7. default
        Scope::new(ScopeType::Feature, 0.5, Vec::new())
    }
}
