//! Multi-generator fan-out
//!
//! A [`FanOutGenerator`] runs one [`SubGenerator`] per project part
//! concurrently. Sub-generators share nothing; their files are merged only
//! after every one of them has settled.

use crate::collaborators::{MultiGenerator, MultiOutput, MultiResponse, RawTextGenerator};
use crate::error::CollaboratorError;
use crate::spec::TechnicalSpec;
use appforge_artifact::GeneratedFile;
use appforge_extract::SourceExtractor;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Part of a full-stack project produced by one sub-generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectPart {
    /// Top-level layout and shared configuration
    Architecture,
    /// Schema, models and connection setup
    Database,
    /// Server entry point and middleware
    Backend,
    /// Routes and controllers
    Api,
    /// Frontend components and pages
    Ui,
    /// Test suites
    Tests,
}

impl ProjectPart {
    /// Every part in generation order
    pub const ALL: [ProjectPart; 6] = [
        ProjectPart::Architecture,
        ProjectPart::Database,
        ProjectPart::Backend,
        ProjectPart::Api,
        ProjectPart::Ui,
        ProjectPart::Tests,
    ];

    /// Part name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPart::Architecture => "architecture",
            ProjectPart::Database => "database",
            ProjectPart::Backend => "backend",
            ProjectPart::Api => "api",
            ProjectPart::Ui => "ui",
            ProjectPart::Tests => "tests",
        }
    }

    fn instructions(self, spec: &TechnicalSpec) -> String {
        let ui = spec.ui_extension();
        let module = spec.module_extension();
        match self {
            ProjectPart::Architecture => format!(
                "root package.json, client/package.json, server/package.json, client/vite.config.{module} and a .env.example"
            ),
            ProjectPart::Database => format!(
                "server/src/db.{module} for the connection and one model per entity under server/src/models/"
            ),
            ProjectPart::Backend => format!(
                "server/src/server.{module}, server/src/app.{module} and error/auth middleware under server/src/middleware/"
            ),
            ProjectPart::Api => format!(
                "one router per resource under server/src/routes/ and matching handlers under server/src/controllers/ (.{module})"
            ),
            ProjectPart::Ui => format!(
                "client/src/App.{ui}, pages under client/src/pages/, components under client/src/components/ and an API client in client/src/api/"
            ),
            ProjectPart::Tests => format!(
                "API tests under server/tests/ and component tests under client/src/__tests__/ (.{module} / .{ui})"
            ),
        }
    }
}

impl std::fmt::Display for ProjectPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generator for one project part
#[async_trait::async_trait]
pub trait SubGenerator: Send + Sync {
    /// Part this generator owns
    fn part(&self) -> ProjectPart;

    /// Generate the part's files
    async fn generate(&self, spec: &TechnicalSpec) -> Result<MultiOutput, CollaboratorError>;
}

/// Build the instruction block for one project part
#[must_use]
pub fn part_prompt(part: ProjectPart, spec: &TechnicalSpec) -> String {
    let ui = spec.ui_extension();
    let mut lines = vec![
        format!("Generate only the {part} part of the full-stack project \"{}\".", spec.project_name),
        format!("Description: {}", spec.description),
        format!("Stack: {} + {} with {} styling, Express backend", spec.framework, spec.language, spec.style),
    ];
    if !spec.features.is_empty() {
        lines.push(format!("Features: {}", spec.features.join(", ")));
    }
    lines.extend([
        format!("Files: {}", part.instructions(spec)),
        String::new(),
        "Return every file in its own fenced code block whose info string is type:Name:lang:path, for example:"
            .to_string(),
        format!("```component:Header:{ui}:client/src/components/Header.{ui}"),
        "export default function Header() { return <header />; }".to_string(),
        "```".to_string(),
    ]);
    lines.join("\n")
}

/// Sub-generator backed by the raw-text generator and the extraction cascade
pub struct TextSubGenerator {
    part: ProjectPart,
    generator: Arc<dyn RawTextGenerator>,
    extractor: SourceExtractor,
}

impl TextSubGenerator {
    /// Create sub-generator for one part
    #[inline]
    #[must_use]
    pub fn new(part: ProjectPart, generator: Arc<dyn RawTextGenerator>) -> Self {
        Self {
            part,
            generator,
            extractor: SourceExtractor::new(),
        }
    }
}

impl std::fmt::Debug for TextSubGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSubGenerator").field("part", &self.part).finish()
    }
}

#[async_trait::async_trait]
impl SubGenerator for TextSubGenerator {
    fn part(&self) -> ProjectPart {
        self.part
    }

    async fn generate(&self, spec: &TechnicalSpec) -> Result<MultiOutput, CollaboratorError> {
        let text = self.generator.generate(&part_prompt(self.part, spec)).await?;
        let extraction = self.extractor.extract_with_report(&text, None);
        // A part that only reaches the fallback produced no recognizable files
        if extraction.is_fallback() {
            return Err(CollaboratorError::InvalidResponse(format!(
                "{} output contained no recognizable files",
                self.part
            )));
        }
        Ok(MultiOutput::Files(extraction.into_files()))
    }
}

/// Multi-generator that fans out over project parts
#[derive(Default)]
pub struct FanOutGenerator {
    parts: Vec<Arc<dyn SubGenerator>>,
}

impl FanOutGenerator {
    /// Create empty fan-out
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fan-out with one text-backed sub-generator per part
    #[must_use]
    pub fn from_text_generator(generator: &Arc<dyn RawTextGenerator>) -> Self {
        ProjectPart::ALL.iter().fold(Self::new(), |fan, part| {
            fan.with_part(Arc::new(TextSubGenerator::new(*part, Arc::clone(generator))))
        })
    }

    /// With an additional sub-generator
    #[inline]
    #[must_use]
    pub fn with_part(mut self, generator: Arc<dyn SubGenerator>) -> Self {
        self.parts.push(generator);
        self
    }

    /// Number of sub-generators
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check for no sub-generators
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl std::fmt::Debug for FanOutGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<_> = self.parts.iter().map(|p| p.part()).collect();
        f.debug_struct("FanOutGenerator").field("parts", &parts).finish()
    }
}

#[async_trait::async_trait]
impl MultiGenerator for FanOutGenerator {
    async fn generate(&self, spec: &TechnicalSpec) -> Result<MultiResponse, CollaboratorError> {
        if self.parts.is_empty() {
            return Err(CollaboratorError::Unavailable("no sub-generators registered".into()));
        }

        let outcomes = join_all(self.parts.iter().map(|sub| async move {
            let part = sub.part();
            (part, sub.generate(spec).await)
        }))
        .await;

        let mut files: Vec<GeneratedFile> = Vec::new();
        let mut warnings = Vec::new();
        for (part, outcome) in outcomes {
            match outcome.map(MultiOutput::into_files) {
                Ok(part_files) if part_files.is_empty() => {
                    tracing::debug!(part = %part, "sub-generator produced no files");
                    warnings.push(format!("{part}: produced no files"));
                }
                Ok(part_files) => {
                    tracing::debug!(part = %part, files = part_files.len(), "sub-generator finished");
                    let label = format!("multi:{part}");
                    files.extend(part_files.into_iter().map(|f| f.with_generator(label.clone())));
                }
                Err(e) => {
                    tracing::warn!(part = %part, error = %e, "sub-generator failed");
                    warnings.push(format!("{part}: {e}"));
                }
            }
        }

        if files.is_empty() {
            return Err(CollaboratorError::Failed(format!(
                "every sub-generator failed ({})",
                warnings.join("; ")
            )));
        }
        Ok(MultiResponse {
            output: MultiOutput::Files(files),
            warnings,
        })
    }
}
