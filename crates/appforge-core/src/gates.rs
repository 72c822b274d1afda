//! Validation and optimization gates
//!
//! Both gates annotate files one at a time with bounded concurrency. A gate
//! never removes a file and never changes its path. Collaborator failures
//! leave the file untouched and come back as [`StageWarning`]s.

use crate::collaborators::{CodeOptimizer, OptimizeOptions, QualityAnalyzer, StaticValidator};
use crate::config::OptimizerConfig;
use crate::error::StageWarning;
use crate::types::Stage;
use appforge_artifact::GeneratedFile;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;

/// Files after a gate plus the per-file failures it recorded
#[derive(Debug, Clone, Default)]
pub struct GateOutcome {
    /// Files in input order
    pub files: Vec<GeneratedFile>,
    /// Per-file degraded warnings
    pub warnings: Vec<StageWarning>,
    /// Counters for the stage summary
    pub summary: GateSummary,
}

/// Per-gate counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GateSummary {
    /// Files seen
    pub files: usize,
    /// Files the collaborator annotated
    pub annotated: usize,
    /// Files whose content was rewritten (Optimize only)
    pub rewritten: usize,
    /// Files validated as invalid (Validate only)
    pub rejected: usize,
    /// Files skipped after a collaborator failure
    pub skipped: usize,
}

/// Keep collaborator scores inside 0-100
fn clamp_score(score: f64) -> Option<f64> {
    score.is_finite().then(|| score.clamp(0.0, 100.0))
}

fn gather(results: Vec<(GeneratedFile, Vec<StageWarning>, Step)>) -> GateOutcome {
    let mut outcome = GateOutcome::default();
    outcome.summary.files = results.len();
    for (file, warnings, step) in results {
        match step {
            Step::Skipped => outcome.summary.skipped += 1,
            Step::Annotated { rewritten, rejected } => {
                outcome.summary.annotated += 1;
                outcome.summary.rewritten += usize::from(rewritten);
                outcome.summary.rejected += usize::from(rejected);
            }
        }
        outcome.files.push(file);
        outcome.warnings.extend(warnings);
    }
    outcome
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Annotated { rewritten: bool, rejected: bool },
    Skipped,
}

/// Per-file static validation
pub struct ValidationGate {
    validator: Arc<dyn StaticValidator>,
    concurrency: usize,
}

impl ValidationGate {
    /// Create gate
    #[inline]
    #[must_use]
    pub fn new(validator: Arc<dyn StaticValidator>, concurrency: usize) -> Self {
        Self {
            validator,
            concurrency: concurrency.max(1),
        }
    }

    /// Validate every file
    pub async fn run(&self, files: Vec<GeneratedFile>) -> GateOutcome {
        let results = stream::iter(files)
            .map(|file| self.validate_one(file))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;
        gather(results)
    }

    async fn validate_one(&self, mut file: GeneratedFile) -> (GeneratedFile, Vec<StageWarning>, Step) {
        match self.validator.validate(&file.content, file.language).await {
            Ok(report) => {
                tracing::debug!(stage = "validate", path = %file.path, valid = report.is_valid, score = report.score, "file validated");
                file.metadata.validated = Some(report.is_valid);
                file.metadata.validation_score = clamp_score(report.score);
                file.metadata.validation_issues = report.issues;
                file.touch();
                let step = Step::Annotated {
                    rewritten: false,
                    rejected: !report.is_valid,
                };
                (file, Vec::new(), step)
            }
            Err(e) => {
                let warning = StageWarning::for_file(Stage::Validate, file.path.clone(), e.to_string());
                (file, vec![warning], Step::Skipped)
            }
        }
    }
}

impl std::fmt::Debug for ValidationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationGate")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

/// Per-file quality scoring and rewriting
///
/// Either collaborator may be absent. The optimizer runs first so the
/// quality score describes the content that ends up in the result.
pub struct OptimizationGate {
    quality: Option<Arc<dyn QualityAnalyzer>>,
    optimizer: Option<Arc<dyn CodeOptimizer>>,
    flags: OptimizerConfig,
    concurrency: usize,
}

impl OptimizationGate {
    /// Create gate
    #[inline]
    #[must_use]
    pub fn new(
        quality: Option<Arc<dyn QualityAnalyzer>>,
        optimizer: Option<Arc<dyn CodeOptimizer>>,
        flags: OptimizerConfig,
        concurrency: usize,
    ) -> Self {
        Self {
            quality,
            optimizer,
            flags,
            concurrency: concurrency.max(1),
        }
    }

    /// Whether any collaborator is configured
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.quality.is_some() || self.optimizer.is_some()
    }

    /// Optimize and score every file
    pub async fn run(&self, files: Vec<GeneratedFile>) -> GateOutcome {
        let results = stream::iter(files)
            .map(|file| self.optimize_one(file))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;
        gather(results)
    }

    async fn optimize_one(&self, mut file: GeneratedFile) -> (GeneratedFile, Vec<StageWarning>, Step) {
        let mut warnings = Vec::new();
        let mut annotated = false;
        let mut rewritten = false;

        if let Some(optimizer) = &self.optimizer {
            let options = OptimizeOptions {
                language: file.language,
                format: self.flags.format,
                remove_console: self.flags.remove_console,
                remove_comments: self.flags.remove_comments,
            };
            match optimizer.optimize(&file.content, &options).await {
                Ok(result) if result.optimized_code.trim().is_empty() && !file.content.trim().is_empty() => {
                    warnings.push(StageWarning::for_file(
                        Stage::Optimize,
                        file.path.clone(),
                        "optimizer returned empty code, keeping original",
                    ));
                }
                Ok(result) => {
                    annotated = true;
                    if result.optimized_code != file.content {
                        file.set_content(result.optimized_code);
                        rewritten = true;
                    }
                    file.metadata.optimized = rewritten;
                    file.metadata.optimizations = result.changes;
                }
                Err(e) => warnings.push(StageWarning::for_file(Stage::Optimize, file.path.clone(), e.to_string())),
            }
        }

        if let Some(quality) = &self.quality {
            match quality.analyze(&file.content, file.language).await {
                Ok(report) => {
                    annotated = true;
                    file.metadata.quality_score = clamp_score(report.overall_score);
                    file.touch();
                }
                Err(e) => warnings.push(StageWarning::for_file(Stage::Optimize, file.path.clone(), e.to_string())),
            }
        }

        tracing::debug!(stage = "optimize", path = %file.path, rewritten, quality = ?file.metadata.quality_score, "file optimized");
        let step = if annotated {
            Step::Annotated {
                rewritten,
                rejected: false,
            }
        } else {
            Step::Skipped
        };
        (file, warnings, step)
    }
}

impl std::fmt::Debug for OptimizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimizationGate")
            .field("quality", &self.quality.is_some())
            .field("optimizer", &self.optimizer.is_some())
            .field("flags", &self.flags)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
