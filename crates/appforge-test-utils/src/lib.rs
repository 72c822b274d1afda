//! Testing utilities for the appforge workspace
//!
//! Scripted and failing collaborators with call counters, plus canonical
//! raw generator replies for every extraction strategy.

#![allow(missing_docs)]

use appforge_artifact::{GeneratedFile, Language};
use appforge_core::{
    CodeOptimizer, CollaboratorError, GenerationOrchestrator, HeuristicQualityAnalyzer, HeuristicValidator,
    MultiGenerator, MultiResponse, OptimizeOptions, Optimization, PipelineConfig, PromptAnalysis, PromptAnalyzer,
    QualityAnalyzer, QualityReport, RawTextGenerator, StaticValidator, TechnicalSpec, Template, TemplateQuery,
    TemplateSearch, ValidationReport, WhitespaceOptimizer,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Raw generator replies, one per extraction strategy
pub mod fixtures {
    /// Header fence (strategy 1)
    pub const HEADER_FENCE: &str =
        "```component:Greeting:tsx:src/Greeting.tsx\nexport const Greeting = () => <div>Hi</div>;\n```";

    /// Several header fences describing a small full-stack project
    pub const FULLSTACK_HEADERS: &str = "Here is your project.\n\n\
```component:App:tsx:client/src/App.tsx\nimport React from 'react';\nimport axios from 'axios';\n\nexport default function App() {\n  return <main>Todos</main>;\n}\n```\n\n\
```server:Server:js:server/src/server.js\nconst express = require('express');\nconst app = express();\napp.use('/api/todos', require('./routes/todos'));\napp.listen(3000);\n```\n\n\
```route:Todos:js:server/src/routes/todos.js\nconst router = require('express').Router();\nrouter.get('/', (req, res) => res.json([]));\nmodule.exports = router;\n```\n";

    /// Comment-path markers (strategy 2)
    pub const COMMENT_MARKERS: &str = "// src/App.tsx\n```tsx\nimport React from 'react';\n\nexport default function App() {\n  return <main>Welcome to the app</main>;\n}\n```\n";

    /// Plain fenced blocks without headers (strategy 3)
    pub const GENERIC_FENCES: &str = "Two components:\n\n```tsx\nexport default function Card() {\n  return <div className=\"card\">Card body</div>;\n}\n```\n\n```tsx\nexport function List() {\n  return <ul className=\"list\"><li>One item</li></ul>;\n}\n```\n";

    /// Bare source with declaration boundaries (strategy 4)
    pub const BOUNDARIES: &str = "import { useState } from 'react';\n\nconst Counter: React.FC = () => {\n  const [n, setN] = useState(0);\n  return <button onClick={() => setN(n + 1)}>{n}</button>;\n};\n\nexport default Counter;\n";

    /// Structured JSON payload (strategy 5)
    pub const JSON_PAYLOAD: &str = r#"{"server": "const app = require('./app');\napp.listen(process.env.PORT || 3000);", "routes": [{"name": "todos", "content": "const router = require('express').Router();\nmodule.exports = router;"}]}"#;

    /// Nothing recognizable (strategy 6)
    pub const PROSE: &str = "not code at all";
}

/// Raw-text generator replaying scripted replies
///
/// When the script runs out, the last reply repeats.
#[derive(Debug)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, CollaboratorError>>>,
    last: Mutex<Option<Result<String, CollaboratorError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<Result<String, CollaboratorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answer with the same text
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl RawTextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        let mut last = self.last.lock().await;
        if let Some(reply) = self.replies.lock().await.pop_front() {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| Err(CollaboratorError::Unavailable("no scripted reply".into())))
    }
}

/// Collaborator that fails every call, for every seam
#[derive(Debug, Default)]
pub struct FailingCollaborator {
    calls: AtomicUsize,
}

impl FailingCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CollaboratorError::Failed("scripted failure".into()))
    }
}

#[async_trait::async_trait]
impl PromptAnalyzer for FailingCollaborator {
    async fn analyze(&self, _prompt: &str) -> Result<PromptAnalysis, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl TemplateSearch for FailingCollaborator {
    async fn search(&self, _query: &TemplateQuery) -> Result<Vec<Template>, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl MultiGenerator for FailingCollaborator {
    async fn generate(&self, _spec: &TechnicalSpec) -> Result<MultiResponse, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl RawTextGenerator for FailingCollaborator {
    async fn generate(&self, _prompt: &str) -> Result<String, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl StaticValidator for FailingCollaborator {
    async fn validate(&self, _source: &str, _language: Language) -> Result<ValidationReport, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl QualityAnalyzer for FailingCollaborator {
    async fn analyze(&self, _source: &str, _language: Language) -> Result<QualityReport, CollaboratorError> {
        self.fail()
    }
}

#[async_trait::async_trait]
impl CodeOptimizer for FailingCollaborator {
    async fn optimize(&self, _source: &str, _options: &OptimizeOptions) -> Result<Optimization, CollaboratorError> {
        self.fail()
    }
}

/// Template search returning a fixed list and recording queries
#[derive(Debug, Default)]
pub struct FixedTemplates {
    templates: Vec<Template>,
    queries: Mutex<Vec<TemplateQuery>>,
}

impl FixedTemplates {
    pub fn new(names: &[&str]) -> Self {
        Self {
            templates: names
                .iter()
                .enumerate()
                .map(|(i, name)| Template {
                    id: format!("t{i}"),
                    name: (*name).to_string(),
                    category: String::new(),
                    tags: Vec::new(),
                    description: String::new(),
                })
                .collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub async fn queries(&self) -> Vec<TemplateQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl TemplateSearch for FixedTemplates {
    async fn search(&self, query: &TemplateQuery) -> Result<Vec<Template>, CollaboratorError> {
        self.queries.lock().await.push(query.clone());
        Ok(self.templates.clone())
    }
}

/// Orchestrator with the local heuristic gates
pub fn setup_orchestrator(generator: Arc<dyn RawTextGenerator>) -> GenerationOrchestrator {
    GenerationOrchestrator::new(generator)
        .with_config(PipelineConfig::new())
        .with_validator(Arc::new(HeuristicValidator))
        .with_quality(Arc::new(HeuristicQualityAnalyzer))
        .with_optimizer(Arc::new(WhitespaceOptimizer))
}

/// Orchestrator whose every collaborator fails
pub fn failing_orchestrator(failing: &Arc<FailingCollaborator>) -> GenerationOrchestrator {
    GenerationOrchestrator::new(failing.clone())
        .with_analyzer(failing.clone())
        .with_templates(failing.clone())
        .with_multi_generator(failing.clone())
        .with_validator(failing.clone())
        .with_quality(failing.clone())
        .with_optimizer(failing.clone())
}

/// Two small files under `src/`
pub fn sample_files() -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new("src/App.tsx", "export default function App() {\n  return null;\n}\n").unwrap(),
        GeneratedFile::new("src/pages/Home.tsx", "export function Home() {\n  return null;\n}\n").unwrap(),
    ]
}
