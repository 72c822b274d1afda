//! appforge command line support
//!
//! Wiring and output helpers behind the `appforge` binary.

#![warn(unreachable_pub)]

use appforge_core::{
    FanOutGenerator, GenerationOrchestrator, GenerationResult, HeuristicQualityAnalyzer, HeuristicValidator,
    MokaResultCache, PipelineConfig, RawTextGenerator, Scope, ScopeClassifier, WhitespaceOptimizer,
};
use appforge_extract::{Extraction, SourceExtractor};
use appforge_http::{HttpPromptAnalyzer, HttpTextGenerator, LlmEndpoint};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Manifest file written next to the generated sources
pub const MANIFEST_FILE: &str = "package.json";
/// README written next to the generated sources
pub const README_FILE: &str = "README.md";

/// Install the global subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Classify a prompt without running the pipeline
#[must_use]
pub fn classify(prompt: &str) -> Scope {
    ScopeClassifier::new().classify(prompt, None)
}

/// Run the extraction cascade over raw generator output
#[must_use]
pub fn extract(raw: &str, prompt: Option<&str>) -> Extraction {
    SourceExtractor::new().extract_with_report(raw, prompt)
}

/// Orchestrator over an HTTP endpoint with the local heuristic gates
#[must_use]
pub fn build_orchestrator(config: PipelineConfig, endpoint: LlmEndpoint) -> GenerationOrchestrator {
    let generator: Arc<dyn RawTextGenerator> = Arc::new(HttpTextGenerator::new(endpoint.clone()));
    let cache = MokaResultCache::from_config(&config.cache);

    GenerationOrchestrator::new(Arc::clone(&generator))
        .with_config(config)
        .with_analyzer(Arc::new(HttpPromptAnalyzer::new(endpoint)))
        .with_multi_generator(Arc::new(FanOutGenerator::from_text_generator(&generator)))
        .with_validator(Arc::new(HeuristicValidator))
        .with_quality(Arc::new(HeuristicQualityAnalyzer))
        .with_optimizer(Arc::new(WhitespaceOptimizer))
        .with_cache(Arc::new(cache))
}

/// Write generated files plus manifest and README under `dir`
///
/// A generated file already named `package.json` or `README.md` at the root
/// wins over the rendered one. Returns every path written, in order.
///
/// # Errors
/// Fails on the first IO error or on a file path that would leave `dir`
pub fn write_output(dir: &Path, result: &GenerationResult) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(result.files.len() + 2);

    for file in &result.files {
        written.push(write_file(dir, &file.path, &file.content)?);
    }
    for (name, content) in [(MANIFEST_FILE, &result.manifest), (README_FILE, &result.readme)] {
        if content.is_empty() || result.file(name).is_some() {
            continue;
        }
        written.push(write_file(dir, name, content)?);
    }
    Ok(written)
}

fn write_file(dir: &Path, relative: &str, content: &str) -> io::Result<PathBuf> {
    let relative = Path::new(relative);
    if relative.as_os_str().is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to write outside output directory: {}", relative.display()),
        ));
    }

    let target = dir.join(relative);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, content)?;
    tracing::debug!(path = %target.display(), bytes = content.len(), "wrote file");
    Ok(target)
}
