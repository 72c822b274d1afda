//! Strategy 1: fenced blocks with a declarative header
//!
//! ````text
//! ```component:Greeting:tsx:src/Greeting.tsx
//! export const Greeting = () => <div>Hi</div>;
//! ```
//! ````
//!
//! The info string is `type:Name:lang:path` (the leading type is optional).
//! A block is accepted when name and path are present and the code is longer
//! than [`HEADER_MIN_CODE_LEN`].

use crate::fence::{fenced_blocks, FencedBlock};
use crate::strategy::{non_empty, ExtractionStrategy, StrategyKind, HEADER_MIN_CODE_LEN};
use appforge_artifact::{GeneratedFile, Language};
use tracing::trace;

/// Parsed `type:Name:lang:path` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceHeader {
    /// Declared file type, if present
    pub kind: Option<String>,
    /// Display name
    pub name: String,
    /// Language tag
    pub language: String,
    /// Target path
    pub path: String,
}

impl FenceHeader {
    /// Parse an info string; `None` unless name and path are both present
    #[must_use]
    pub fn parse(info: &str) -> Option<Self> {
        let info = info.split_whitespace().next()?;
        let parts: Vec<&str> = info.split(':').map(str::trim).collect();

        let (kind, name, language, path) = match parts.as_slice() {
            [name, language, path] => (None, *name, *language, (*path).to_string()),
            [kind, name, language, rest @ ..] if !rest.is_empty() => {
                (Some((*kind).to_string()), *name, *language, rest.join(":"))
            }
            _ => return None,
        };

        if name.is_empty() || path.trim().is_empty() {
            return None;
        }

        Some(Self {
            kind: kind.filter(|k| !k.is_empty()),
            name: name.to_string(),
            language: language.to_string(),
            path,
        })
    }
}

/// Header-fenced block strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFenceStrategy;

impl HeaderFenceStrategy {
    fn convert(block: &FencedBlock) -> Option<GeneratedFile> {
        let header = FenceHeader::parse(&block.info)?;
        let code = block.code.trim();
        if code.len() <= HEADER_MIN_CODE_LEN {
            trace!(path = %header.path, "header block too short");
            return None;
        }

        let mut file = GeneratedFile::new(&header.path, format!("{code}\n"))
            .ok()?
            .with_name(header.name)
            .with_generator(StrategyKind::HeaderFence.generator_label());
        if let Some(lang) = Language::from_hint(&header.language) {
            file = file.with_language(lang);
        }
        if let Some(kind) = header.kind {
            file = file.with_declared_kind(kind);
        }
        Some(file)
    }
}

impl ExtractionStrategy for HeaderFenceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HeaderFence
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        let files = fenced_blocks(text)
            .iter()
            .filter_map(Self::convert)
            .collect();
        non_empty(files)
    }
}
