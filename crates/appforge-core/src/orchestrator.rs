//! Generation orchestrator
//!
//! Runs one request through Prepare, Generate, Validate and Optimize.
//!
//! # Failure policy
//! - Empty prompts are rejected before any stage runs
//! - Prepare and Generate failures abort the run
//! - Validate and Optimize failures are recorded as warnings and never abort
//!
//! Every path returns a well-formed [`GenerationResult`]; errors are never
//! surfaced to the caller as `Err`.

use crate::analysis::PromptAnalysis;
use crate::cache::ResultCache;
use crate::collaborators::{
    CodeOptimizer, MultiGenerator, MultiResponse, PromptAnalyzer, QualityAnalyzer, RawTextGenerator, StaticValidator,
    Template, TemplateQuery, TemplateSearch,
};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, StageWarning};
use crate::gates::{OptimizationGate, ValidationGate};
use crate::output::{render_manifest, render_readme};
use crate::prompt::build_enriched_prompt;
use crate::scope::{Scope, ScopeClassifier, ScopeType};
use crate::spec::TechnicalSpec;
use crate::types::{GenerationRequest, GenerationResult, Stage, StageResult};
use appforge_artifact::{FileAggregator, GeneratedFile};
use appforge_extract::strategies::FallbackStrategy;
use appforge_extract::{prompt_noun, SourceExtractor};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// Stage duration histogram, labelled by `stage`
pub const STAGE_DURATION_METRIC: &str = "appforge_stage_duration_ms";

/// Degraded warning counter, labelled by `stage`
pub const STAGE_WARNING_METRIC: &str = "appforge_stage_warnings_total";

/// Result cache hit counter
pub const CACHE_HIT_METRIC: &str = "appforge_cache_hits_total";

/// Result cache miss counter
pub const CACHE_MISS_METRIC: &str = "appforge_cache_misses_total";

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Stage records and warnings for one attempt
#[derive(Debug, Default)]
struct Diagnostics {
    stages: Vec<StageResult>,
    warnings: Vec<StageWarning>,
}

impl Diagnostics {
    fn finish(&mut self, stage: Stage, started: Instant, outcome: Result<Value, &PipelineError>) {
        let duration_ms = elapsed_ms(started);
        #[allow(clippy::cast_precision_loss)]
        metrics::histogram!(STAGE_DURATION_METRIC, "stage" => stage.as_str()).record(duration_ms as f64);
        let record = match outcome {
            Ok(output) => {
                tracing::info!(stage = %stage, duration_ms, "stage completed");
                StageResult::ok(stage, output, duration_ms)
            }
            Err(e) => {
                tracing::error!(stage = %stage, duration_ms, error = %e, "stage failed");
                StageResult::failed(stage, e.to_string(), duration_ms)
            }
        };
        self.stages.push(record);
    }

    fn skip(&mut self, stage: Stage, started: Instant, reason: &str) {
        tracing::debug!(stage = %stage, reason, "stage skipped");
        self.finish(stage, started, Ok(json!({ "skipped": reason })));
    }

    fn warn(&mut self, warning: StageWarning) {
        tracing::warn!(stage = %warning.stage, path = ?warning.path, "{}", warning.message);
        metrics::counter!(STAGE_WARNING_METRIC, "stage" => warning.stage.as_str()).increment(1);
        self.warnings.push(warning);
    }
}

/// Output of Prepare
#[derive(Debug, Clone)]
struct Prepared {
    analysis: PromptAnalysis,
    scope: Scope,
    spec: TechnicalSpec,
}

/// Outcome of the structured generation path
#[derive(Debug)]
enum Structured {
    /// Files with paths already assigned, plus partial-failure notes
    Files(Vec<GeneratedFile>, Vec<String>),
    /// Use the raw-text path instead
    Degraded(String),
}

/// Four-stage generation pipeline
///
/// Collaborators are injected once and shared across requests. Only the
/// raw-text generator is required; every other collaborator is optional and
/// its stage or step degrades when it is missing.
pub struct GenerationOrchestrator {
    config: PipelineConfig,
    classifier: ScopeClassifier,
    extractor: SourceExtractor,
    generator: Arc<dyn RawTextGenerator>,
    analyzer: Option<Arc<dyn PromptAnalyzer>>,
    templates: Option<Arc<dyn TemplateSearch>>,
    multi_generator: Option<Arc<dyn MultiGenerator>>,
    validator: Option<Arc<dyn StaticValidator>>,
    quality: Option<Arc<dyn QualityAnalyzer>>,
    optimizer: Option<Arc<dyn CodeOptimizer>>,
    cache: Option<Arc<dyn ResultCache>>,
}

impl GenerationOrchestrator {
    /// Create orchestrator around a raw-text generator
    #[must_use]
    pub fn new(generator: Arc<dyn RawTextGenerator>) -> Self {
        Self {
            config: PipelineConfig::default(),
            classifier: ScopeClassifier::new(),
            extractor: SourceExtractor::new(),
            generator,
            analyzer: None,
            templates: None,
            multi_generator: None,
            validator: None,
            quality: None,
            optimizer: None,
            cache: None,
        }
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// With prompt analyzer
    #[inline]
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn PromptAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// With template search
    #[inline]
    #[must_use]
    pub fn with_templates(mut self, templates: Arc<dyn TemplateSearch>) -> Self {
        self.templates = Some(templates);
        self
    }

    /// With multi-generator for full-stack scope
    #[inline]
    #[must_use]
    pub fn with_multi_generator(mut self, generator: Arc<dyn MultiGenerator>) -> Self {
        self.multi_generator = Some(generator);
        self
    }

    /// With static validator
    #[inline]
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn StaticValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// With quality analyzer
    #[inline]
    #[must_use]
    pub fn with_quality(mut self, quality: Arc<dyn QualityAnalyzer>) -> Self {
        self.quality = Some(quality);
        self
    }

    /// With code optimizer
    #[inline]
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: Arc<dyn CodeOptimizer>) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// With result cache
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cache key for a request, if caching applies
    #[must_use]
    pub fn cache_key(&self, request: &GenerationRequest) -> Option<String> {
        if !self.config.cache.enabled || self.cache.is_none() {
            return None;
        }
        request
            .cache_key
            .clone()
            .or_else(|| self.config.cache.derive_keys.then(|| request.content_key()))
    }

    /// Serve a request, consulting the result cache first
    ///
    /// Successful results are written back to the cache once.
    pub async fn generate(&self, request: GenerationRequest) -> GenerationResult {
        let key = self.cache_key(&request);
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(mut hit) = cache.get(key).await {
                tracing::info!(request_id = %request.id, key = %key, "result served from cache");
                metrics::counter!(CACHE_HIT_METRIC).increment(1);
                hit.request_id = request.id;
                hit.cached = true;
                return hit;
            }
            metrics::counter!(CACHE_MISS_METRIC).increment(1);
        }

        let result = self.execute(request).await;
        if let (Some(cache), Some(key)) = (&self.cache, key) {
            if result.success {
                cache.set(&key, result.clone(), self.config.cache.ttl()).await;
            }
        }
        result
    }

    /// Run the four stages without the cache
    pub async fn execute(&self, request: GenerationRequest) -> GenerationResult {
        let span = tracing::info_span!("generation", request_id = %request.id);
        self.execute_with_retries(&request).instrument(span).await
    }

    async fn execute_with_retries(&self, request: &GenerationRequest) -> GenerationResult {
        let started = Instant::now();
        let retries = self.config.effective_retries();
        let mut attempt = 0;

        loop {
            let mut diag = Diagnostics::default();
            match self.run_stages(request, &mut diag).await {
                Ok(mut result) => {
                    result.duration_ms = elapsed_ms(started);
                    tracing::info!(
                        files = result.files.len(),
                        warnings = result.warnings.len(),
                        quality = result.quality_score,
                        duration_ms = result.duration_ms,
                        "generation completed"
                    );
                    return result;
                }
                Err(e) if e.is_retryable() && attempt < retries => {
                    attempt += 1;
                    tracing::warn!(attempt, max_retries = retries, error = %e, "retrying generation");
                }
                Err(e) => {
                    tracing::error!(error = %e, "generation failed");
                    let mut result = GenerationResult::failure(request.id, e.to_string(), diag.stages, diag.warnings);
                    result.duration_ms = elapsed_ms(started);
                    return result;
                }
            }
        }
    }

    async fn run_stages(
        &self,
        request: &GenerationRequest,
        diag: &mut Diagnostics,
    ) -> Result<GenerationResult, PipelineError> {
        if request.prompt.trim().is_empty() {
            return Err(PipelineError::InvalidInput("prompt is empty".to_string()));
        }

        let started = Instant::now();
        let prepared = self.prepare(request, diag).await;
        diag.finish(
            Stage::Prepare,
            started,
            Ok(json!({
                "intent": prepared.analysis.intent,
                "domain": prepared.analysis.domain,
                "scope": prepared.scope.scope_type,
                "confidence": prepared.scope.confidence,
                "keywords": prepared.scope.keywords,
                "project": prepared.spec.project_name,
                "templates": prepared.spec.templates.len(),
            })),
        );

        let started = Instant::now();
        let files = match self.generate_files(request, &prepared, diag).await {
            Ok((files, summary)) => {
                diag.finish(Stage::Generate, started, Ok(summary));
                files
            }
            Err(e) => {
                diag.finish(Stage::Generate, started, Err(&e));
                return Err(e);
            }
        };

        let files = self.validate(files, diag).await;
        let files = self.optimize(files, diag).await;

        let mut aggregation = FileAggregator::new().with_stage(files).finish();
        if aggregation.files.is_empty() {
            diag.warn(StageWarning::new(
                Stage::Generate,
                "no files survived path normalization, substituting fallback file",
            ));
            aggregation = FileAggregator::new()
                .with_stage([synthesize_fallback(&request.prompt)?])
                .finish();
        }
        let quality_score = mean_quality(&aggregation.files);
        let manifest = render_manifest(&prepared.spec, &aggregation.dependencies);
        let readme = render_readme(
            &prepared.spec,
            &aggregation.files,
            &aggregation.structure,
            &aggregation.dependencies,
        );

        Ok(GenerationResult {
            request_id: request.id,
            success: true,
            files: aggregation.files,
            structure: aggregation.structure,
            quality_score,
            dependencies: aggregation.dependencies,
            manifest,
            readme,
            scope: Some(prepared.scope),
            stages: std::mem::take(&mut diag.stages),
            warnings: std::mem::take(&mut diag.warnings),
            error: None,
            duration_ms: 0,
            cached: false,
        })
    }

    async fn prepare(&self, request: &GenerationRequest, diag: &mut Diagnostics) -> Prepared {
        let prompt = request.prompt.trim();

        let analysis = match &self.analyzer {
            Some(analyzer) => match analyzer.analyze(prompt).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    diag.warn(StageWarning::new(
                        Stage::Prepare,
                        format!("prompt analysis failed, using keyword fallback: {e}"),
                    ));
                    PromptAnalysis::fallback(prompt)
                }
            },
            None => PromptAnalysis::fallback(prompt),
        };

        let intent = request.intent.or(Some(analysis.intent));
        let scope = self.classifier.classify(prompt, intent);
        tracing::debug!(scope = %scope.scope_type, confidence = scope.confidence, keywords = ?scope.keywords, "scope classified");

        let templates = self.search_templates(prompt, &analysis, &scope, diag).await;
        let options = self.config.defaults.resolve(&request.options);
        let spec = TechnicalSpec::build(request, &options, &analysis, &scope, &templates);

        Prepared { analysis, scope, spec }
    }

    async fn search_templates(
        &self,
        prompt: &str,
        analysis: &PromptAnalysis,
        scope: &Scope,
        diag: &mut Diagnostics,
    ) -> Vec<Template> {
        let Some(search) = &self.templates else {
            return Vec::new();
        };
        let keyword = if analysis.domain == "general" {
            prompt_noun(prompt).map_or_else(|| "app".to_string(), |n| n.to_lowercase())
        } else {
            analysis.domain.clone()
        };
        let query = TemplateQuery {
            keyword,
            category: Some(template_category(scope.scope_type).to_string()),
            tags: analysis.entities.clone(),
        };
        match search.search(&query).await {
            Ok(found) => {
                tracing::debug!(keyword = %query.keyword, found = found.len(), "template search finished");
                found
            }
            Err(e) => {
                diag.warn(StageWarning::new(Stage::Prepare, format!("template search failed: {e}")));
                Vec::new()
            }
        }
    }

    async fn generate_files(
        &self,
        request: &GenerationRequest,
        prepared: &Prepared,
        diag: &mut Diagnostics,
    ) -> Result<(Vec<GeneratedFile>, Value), PipelineError> {
        if prepared.scope.scope_type == ScopeType::Fullstack {
            if let Some(multi) = &self.multi_generator {
                match structured(multi.generate(&prepared.spec).await) {
                    Structured::Files(files, notes) => {
                        for note in notes {
                            diag.warn(StageWarning::new(Stage::Generate, note));
                        }
                        let summary = json!({ "path": "multi", "files": files.len() });
                        return Ok((files, summary));
                    }
                    Structured::Degraded(reason) => diag.warn(StageWarning::new(
                        Stage::Generate,
                        format!("multi-generator unusable, falling back to raw text: {reason}"),
                    )),
                }
            }
        }

        let enriched = build_enriched_prompt(request, &prepared.spec, &prepared.scope);
        let text = self
            .generator
            .generate(&enriched)
            .await
            .map_err(|e| PipelineError::stage(Stage::Generate, format!("raw-text generator failed: {e}")))?;

        let extraction = self.extractor.extract_with_report(&text, Some(&request.prompt));
        let strategy = extraction.strategy;
        let mut files = extraction.into_files();
        if files.is_empty() {
            files.push(synthesize_fallback(&request.prompt)?);
        }

        let summary = json!({ "path": "raw", "strategy": strategy.as_str(), "files": files.len() });
        Ok((files, summary))
    }

    async fn validate(&self, files: Vec<GeneratedFile>, diag: &mut Diagnostics) -> Vec<GeneratedFile> {
        let started = Instant::now();
        if !self.config.validate {
            diag.skip(Stage::Validate, started, "disabled");
            return files;
        }
        let Some(validator) = &self.validator else {
            diag.skip(Stage::Validate, started, "no validator configured");
            return files;
        };

        let outcome = ValidationGate::new(Arc::clone(validator), self.config.max_parallel_files)
            .run(files)
            .await;
        for warning in outcome.warnings {
            diag.warn(warning);
        }
        diag.finish(Stage::Validate, started, Ok(json!(outcome.summary)));
        outcome.files
    }

    async fn optimize(&self, files: Vec<GeneratedFile>, diag: &mut Diagnostics) -> Vec<GeneratedFile> {
        let started = Instant::now();
        if !self.config.optimize {
            diag.skip(Stage::Optimize, started, "disabled");
            return files;
        }
        let gate = OptimizationGate::new(
            self.quality.clone(),
            self.optimizer.clone(),
            self.config.optimizer,
            self.config.max_parallel_files,
        );
        if !gate.is_active() {
            diag.skip(Stage::Optimize, started, "no optimizer configured");
            return files;
        }

        let outcome = gate.run(files).await;
        for warning in outcome.warnings {
            diag.warn(warning);
        }
        diag.finish(Stage::Optimize, started, Ok(json!(outcome.summary)));
        outcome.files
    }
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.is_some())
            .field("templates", &self.templates.is_some())
            .field("multi_generator", &self.multi_generator.is_some())
            .field("validator", &self.validator.is_some())
            .field("quality", &self.quality.is_some())
            .field("optimizer", &self.optimizer.is_some())
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

fn structured(response: Result<MultiResponse, crate::error::CollaboratorError>) -> Structured {
    match response {
        Ok(response) => {
            let files = FileAggregator::new().with_stage(response.output.into_files()).finish().files;
            if files.is_empty() {
                Structured::Degraded("no files with a usable path in output".to_string())
            } else {
                Structured::Files(files, response.warnings)
            }
        }
        Err(e) => Structured::Degraded(e.to_string()),
    }
}

fn template_category(scope_type: ScopeType) -> &'static str {
    match scope_type {
        ScopeType::SingleComponent => "component",
        ScopeType::Feature => "feature",
        ScopeType::Page => "page",
        ScopeType::Backend => "backend",
        ScopeType::Fullstack => "fullstack",
        ScopeType::LandingPage => "landing",
    }
}

/// Minimal stub carrying the original prompt
fn synthesize_fallback(prompt: &str) -> Result<GeneratedFile, PipelineError> {
    let mut file = FallbackStrategy::new(Some(prompt))
        .build("")
        .ok_or_else(|| PipelineError::stage(Stage::Generate, "could not build fallback file"))?;
    let note = prompt.trim().replace("*/", "* /");
    file.set_content(format!("/* {note} */\n{}", file.content));
    Ok(file)
}

/// Mean per-file quality; files without a score count as 0
#[allow(clippy::cast_precision_loss)]
fn mean_quality(files: &[GeneratedFile]) -> f64 {
    if files.is_empty() {
        return 0.0;
    }
    let total: f64 = files.iter().map(|f| f.metadata.quality_score.unwrap_or(0.0)).sum();
    total / files.len() as f64
}
