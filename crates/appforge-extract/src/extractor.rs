//! Strategy cascade
//!
//! Strategies are tried strictly in order and the first one that yields at
//! least one file wins. The fallback strategy always runs last, so
//! extraction never comes back empty.

use crate::strategies::{default_strategies, FallbackStrategy};
use crate::strategy::{Extraction, ExtractionStrategy, StrategyKind};
use appforge_artifact::GeneratedFile;
use tracing::{debug, warn};

/// Metric counting which strategy produced each extraction
pub const STRATEGY_METRIC: &str = "appforge_extraction_strategy_total";

/// Cascading source extractor
#[derive(Debug)]
pub struct SourceExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for SourceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor {
    /// Extractor with the built-in strategies
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_strategies(default_strategies())
    }

    /// Extractor with a custom strategy list; the fallback is still appended
    #[must_use]
    pub fn from_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Number of strategies ahead of the fallback
    #[inline]
    #[must_use]
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Extract files from raw text; never empty
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<GeneratedFile> {
        self.extract_with_report(text, None).into_files()
    }

    /// Extract with a naming hint (usually the prompt) for the fallback file
    #[must_use]
    pub fn extract_with_hint(&self, text: &str, hint: Option<&str>) -> Vec<GeneratedFile> {
        self.extract_with_report(text, hint).into_files()
    }

    /// Extract and report which strategy won
    #[must_use]
    pub fn extract_with_report(&self, text: &str, hint: Option<&str>) -> Extraction {
        let winner = self.strategies.iter().find_map(|strategy| {
            let files = strategy.extract(text).filter(|f| !f.is_empty());
            if files.is_none() {
                debug!(strategy = %strategy.kind(), "no files");
            }
            files.map(|files| Extraction {
                strategy: strategy.kind(),
                files,
            })
        });

        let extraction = winner.unwrap_or_else(|| {
            warn!(text_len = text.len(), "no strategy matched, using fallback");
            Extraction {
                strategy: StrategyKind::Fallback,
                files: FallbackStrategy::new(hint)
                    .extract(text)
                    .unwrap_or_default(),
            }
        });

        metrics::counter!(STRATEGY_METRIC, "strategy" => extraction.strategy.as_str()).increment(1);
        debug!(
            strategy = %extraction.strategy,
            files = extraction.files.len(),
            "extraction complete"
        );
        extraction
    }
}
