//! Extraction strategy trait and core types

use appforge_artifact::GeneratedFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum trimmed code length for a header-fenced block
pub const HEADER_MIN_CODE_LEN: usize = 10;

/// Minimum trimmed code length for marker segments and generic fences
pub const SEGMENT_MIN_CODE_LEN: usize = 50;

/// Identifies which strategy produced an extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Fence whose info string declares `type:Name:lang:path`
    HeaderFence,
    /// Text segmented on `// <path>` comment lines
    CommentMarkers,
    /// Any fenced block, optionally preceded by a `// path` comment
    GenericFence,
    /// Declaration boundaries in bare source
    Boundaries,
    /// Structured JSON payload with known collection keys
    JsonPayload,
    /// Single file holding the stripped raw text
    Fallback,
}

impl StrategyKind {
    /// Stable name used in logs, metrics and file metadata
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::HeaderFence => "header_fence",
            StrategyKind::CommentMarkers => "comment_markers",
            StrategyKind::GenericFence => "generic_fence",
            StrategyKind::Boundaries => "boundaries",
            StrategyKind::JsonPayload => "json_payload",
            StrategyKind::Fallback => "fallback",
        }
    }

    /// Generator label stamped on extracted files
    #[must_use]
    pub fn generator_label(&self) -> String {
        format!("extract:{}", self.as_str())
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heuristic for slicing raw generator text into files
///
/// Implementations are pure: the same text always yields the same result.
/// `None` (or an empty list) means "no plausible files here" and lets the
/// cascade move on to the next strategy.
pub trait ExtractionStrategy: Send + Sync + fmt::Debug {
    /// Which strategy this is
    fn kind(&self) -> StrategyKind;

    /// Try to extract files from raw text
    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>>;
}

/// Result of running the cascade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Strategy that produced the files
    pub strategy: StrategyKind,
    /// Extracted files (never empty)
    pub files: Vec<GeneratedFile>,
}

impl Extraction {
    /// Consume into the file list
    #[inline]
    #[must_use]
    pub fn into_files(self) -> Vec<GeneratedFile> {
        self.files
    }

    /// Whether the fallback produced this extraction
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.strategy == StrategyKind::Fallback
    }
}

/// Wrap a non-empty list in `Some`
#[inline]
pub(crate) fn non_empty(files: Vec<GeneratedFile>) -> Option<Vec<GeneratedFile>> {
    if files.is_empty() {
        None
    } else {
        Some(files)
    }
}
