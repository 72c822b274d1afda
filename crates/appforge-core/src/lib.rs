//! appforge core - the generation pipeline
//!
//! Turns a free-text request into a multi-file source tree:
//! - Classifies the request's scope
//! - Builds a technical specification and an enriched prompt
//! - Drives the text generators and extracts files from their output
//! - Validates and optimizes files without ever aborting on those stages
//! - Aggregates the final tree, dependencies, manifest and readme
//!
//! # Example
//!
//! ```rust,ignore
//! use appforge_core::{GenerationOrchestrator, GenerationRequest, HeuristicValidator};
//! use std::sync::Arc;
//!
//! # async fn example(generator: Arc<dyn appforge_core::RawTextGenerator>) {
//! let orchestrator = GenerationOrchestrator::new(generator)
//!     .with_validator(Arc::new(HeuristicValidator));
//!
//! let result = orchestrator.generate(GenerationRequest::new("Create a simple button component")).await;
//! println!("{} files, quality {:.1}", result.files.len(), result.quality_score);
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod analysis;
pub mod builtin;
pub mod cache;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod fanout;
pub mod gates;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod scope;
pub mod spec;
pub mod types;

// Re-exports for convenience
pub use analysis::{Intent, PromptAnalysis};
pub use builtin::{HeuristicQualityAnalyzer, HeuristicValidator, WhitespaceOptimizer};
pub use cache::{MokaResultCache, ResultCache};
pub use collaborators::{
    CodeOptimizer, ComponentOutput, MultiGenerator, MultiOutput, MultiResponse, OptimizeOptions, Optimization,
    PromptAnalyzer, QualityAnalyzer, QualityReport, RawTextGenerator, StaticValidator, Template, TemplateQuery,
    TemplateSearch, ValidationReport,
};
pub use config::{CacheConfig, OptimizerConfig, PipelineConfig, TechDefaults};
pub use error::{CollaboratorError, ConfigError, PipelineError, StageWarning};
pub use fanout::{part_prompt, FanOutGenerator, ProjectPart, SubGenerator, TextSubGenerator};
pub use gates::{GateOutcome, GateSummary, OptimizationGate, ValidationGate};
pub use orchestrator::{
    GenerationOrchestrator, CACHE_HIT_METRIC, CACHE_MISS_METRIC, STAGE_DURATION_METRIC, STAGE_WARNING_METRIC,
};
pub use output::{render_manifest, render_readme};
pub use prompt::build_enriched_prompt;
pub use scope::{Complexity, FileCountRange, Scope, ScopeClassifier, ScopeType};
pub use spec::TechnicalSpec;
pub use types::{GenerationOptions, GenerationRequest, GenerationResult, RequestId, Stage, StageResult};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the pipeline
    pub use crate::{
        GenerationOrchestrator, GenerationRequest, GenerationResult, PipelineConfig, RawTextGenerator, Scope,
        ScopeClassifier, ScopeType, Stage,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
