//! Prompt analysis
//!
//! [`PromptAnalysis`] is what a prompt-analysis collaborator returns. When
//! that collaborator is missing or fails, [`PromptAnalysis::fallback`]
//! derives the same shape from keywords alone.

use crate::scope::{
    Complexity, ScopeType, Vocabulary, BACKEND_TERMS, COMPONENT_NOUNS, DATABASE_TERMS,
    FULLSTACK_PHRASES,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// What the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// One UI component
    CreateComponent,
    /// A server-side API
    CreateApi,
    /// An application
    CreateApp,
    /// An application with frontend and backend
    CreateFullstackApp,
    /// Change existing code
    ModifyCode,
    /// Not recognized
    Unknown,
}

impl Intent {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CreateComponent => "CREATE_COMPONENT",
            Intent::CreateApi => "CREATE_API",
            Intent::CreateApp => "CREATE_APP",
            Intent::CreateFullstackApp => "CREATE_FULLSTACK_APP",
            Intent::ModifyCode => "MODIFY_CODE",
            Intent::Unknown => "UNKNOWN",
        }
    }

    /// Scope implied by the intent, if any
    #[inline]
    #[must_use]
    pub fn scope_type(self) -> Option<ScopeType> {
        match self {
            Intent::CreateComponent => Some(ScopeType::SingleComponent),
            Intent::CreateApi => Some(ScopeType::Backend),
            Intent::CreateApp | Intent::CreateFullstackApp => Some(ScopeType::Fullstack),
            Intent::ModifyCode | Intent::Unknown => None,
        }
    }
}

/// Result of analyzing a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptAnalysis {
    /// Detected intent
    #[serde(rename = "intentType", alias = "intent")]
    pub intent: Intent,
    /// Confidence (0-1)
    #[serde(default)]
    pub confidence: f64,
    /// Application domain (e.g. `ecommerce`)
    #[serde(default = "general_domain")]
    pub domain: String,
    /// Estimated complexity
    #[serde(default = "moderate")]
    pub complexity: Complexity,
    /// Technologies and nouns mentioned
    #[serde(default)]
    pub entities: Vec<String>,
}

fn general_domain() -> String {
    "general".to_string()
}

fn moderate() -> Complexity {
    Complexity::Moderate
}

static MODIFY_VERBS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&["fix", "modify", "update", "refactor", "change", "rename", "improve", "debug"])
});

static APP_NOUNS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&["app", "application", "website", "platform", "site", "system", "tool"])
});

pub(crate) static FEATURE_TERMS: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "auth", "authentication", "login", "payments", "payment", "stripe", "realtime",
        "real-time", "websocket", "websockets", "notifications", "upload", "search", "admin",
        "roles", "analytics", "chat", "i18n",
    ])
});

static TECHNOLOGIES: Lazy<Vocabulary> = Lazy::new(|| {
    Vocabulary::new(&[
        "react", "vue", "angular", "svelte", "next.js", "nextjs", "nuxt", "express", "fastify",
        "nestjs", "node.js", "nodejs", "node", "mongodb", "mongoose", "postgres", "postgresql",
        "mysql", "sqlite", "redis", "prisma", "graphql", "tailwind", "typescript", "javascript",
        "jwt", "stripe", "socket.io", "firebase", "supabase", "docker",
    ])
});

/// Domain keywords, first match wins
const DOMAINS: &[(&str, &[&str])] = &[
    ("todo", &["todo", "todos", "task", "tasks", "to-do"]),
    ("ecommerce", &["shop", "store", "ecommerce", "e-commerce", "cart", "checkout", "product", "products"]),
    ("blog", &["blog", "post", "posts", "article", "articles", "cms"]),
    ("chat", &["chat", "messaging", "messenger", "message", "messages"]),
    ("dashboard", &["dashboard", "analytics", "metrics", "admin"]),
    ("portfolio", &["portfolio", "resume", "showcase"]),
    ("social", &["social", "feed", "followers", "friends", "profile"]),
    ("finance", &["finance", "budget", "expense", "expenses", "invoice", "invoices", "banking", "payment"]),
    ("education", &["course", "courses", "quiz", "lesson", "learning", "school", "student"]),
];

static DOMAIN_VOCABULARIES: Lazy<Vec<(&'static str, Vocabulary)>> = Lazy::new(|| {
    DOMAINS
        .iter()
        .map(|(name, terms)| (*name, Vocabulary::new(terms)))
        .collect()
});

impl PromptAnalysis {
    /// Keyword-derived analysis used when no analyzer is available
    #[must_use]
    pub fn fallback(prompt: &str) -> Self {
        let text = prompt.to_lowercase();

        let intent = if FULLSTACK_PHRASES.matches(&text) {
            Intent::CreateFullstackApp
        } else if MODIFY_VERBS
            .found(&text)
            .first()
            .is_some_and(|verb| text.trim_start().starts_with(verb.as_str()))
        {
            Intent::ModifyCode
        } else if BACKEND_TERMS.matches(&text) && !APP_NOUNS.matches(&text) {
            Intent::CreateApi
        } else if APP_NOUNS.matches(&text) {
            Intent::CreateApp
        } else if COMPONENT_NOUNS.matches(&text) {
            Intent::CreateComponent
        } else {
            Intent::Unknown
        };

        let domain = DOMAIN_VOCABULARIES
            .iter()
            .find(|(_, vocab)| vocab.matches(&text))
            .map_or("general", |(name, _)| *name)
            .to_string();

        let features = FEATURE_TERMS.found(&text).len();
        let words = text.split_whitespace().count();
        let complexity = if intent == Intent::CreateFullstackApp
            || features >= 3
            || words > 60
            || (DATABASE_TERMS.matches(&text) && features >= 2)
        {
            Complexity::Complex
        } else if intent == Intent::CreateComponent && words <= 12 && features == 0 {
            Complexity::Minimal
        } else {
            Complexity::Moderate
        };

        Self {
            intent,
            confidence: 0.5,
            domain,
            complexity,
            entities: TECHNOLOGIES.found(&text),
        }
    }
}
