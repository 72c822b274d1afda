//! Strategy 6: whole text as one file
//!
//! Always succeeds, so the cascade never returns an empty list.

use crate::fence::strip_fences;
use crate::naming::{prompt_noun, DEFAULT_FALLBACK_NAME};
use crate::strategy::{ExtractionStrategy, StrategyKind};
use appforge_artifact::GeneratedFile;

/// Path of the fallback file
pub const FALLBACK_PATH: &str = "src/App.tsx";

/// Fallback strategy; the hint is usually the original prompt
#[derive(Debug, Clone, Default)]
pub struct FallbackStrategy {
    hint: Option<String>,
}

impl FallbackStrategy {
    /// Create with an optional naming hint
    #[must_use]
    pub fn new(hint: Option<&str>) -> Self {
        Self {
            hint: hint.map(str::to_string),
        }
    }

    /// Build the single fallback file
    #[must_use]
    pub fn build(&self, text: &str) -> Option<GeneratedFile> {
        let name = self
            .hint
            .as_deref()
            .and_then(prompt_noun)
            .unwrap_or_else(|| DEFAULT_FALLBACK_NAME.to_string());

        let mut body = strip_fences(text);
        if body.is_empty() {
            body = format!("export default function {name}() {{\n  return null;\n}}");
        }

        GeneratedFile::new(FALLBACK_PATH, format!("{body}\n"))
            .ok()
            .map(|f| {
                f.with_name(name)
                    .with_generator(StrategyKind::Fallback.generator_label())
            })
    }
}

impl ExtractionStrategy for FallbackStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        self.build(text).map(|f| vec![f])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_from_prompt() {
        let file = FallbackStrategy::new(Some("make a pricing table")).build("<div/>").unwrap();
        assert_eq!(file.name, "Pricing");
        assert_eq!(file.path, FALLBACK_PATH);
        assert_eq!(file.content, "<div/>\n");
    }

    #[test]
    fn default_name_and_stub() {
        let file = FallbackStrategy::default().build("```\n```").unwrap();
        assert_eq!(file.name, DEFAULT_FALLBACK_NAME);
        assert!(file.content.contains("export default function GeneratedComponent"));
    }
}
