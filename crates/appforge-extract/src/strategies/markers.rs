//! Strategy 2: `// <path>` comment markers
//!
//! Text is segmented at every line consisting solely of a line comment with a
//! file path (`// src/App.tsx`, `// File: server/index.js`). Each segment runs
//! to the next marker, skipping an opening fence and stopping at a closing one.

use crate::fence::is_fence_line;
use crate::naming::derive_name;
use crate::strategy::{non_empty, ExtractionStrategy, StrategyKind, SEGMENT_MIN_CODE_LEN};
use appforge_artifact::GeneratedFile;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*//[ \t]*(?:(?i:file(?:name)?|path)[ \t]*:[ \t]*)?([\w@.\-\[\]]+(?:/[\w@.\-\[\]]+)*\.[A-Za-z0-9]{1,8})[ \t]*\r?$",
    )
    .expect("valid marker regex")
});

/// Parse a marker line, returning its path
#[must_use]
pub fn marker_path(line: &str) -> Option<&str> {
    MARKER
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Code of one segment: skip an opening fence, stop at the next fence
fn segment_code(segment: &str) -> String {
    let mut lines = segment.lines().skip_while(|l| l.trim().is_empty()).peekable();
    if lines.peek().is_some_and(|l| is_fence_line(l)) {
        lines.next();
    }
    lines
        .take_while(|l| !is_fence_line(l))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Comment-marker strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentMarkerStrategy;

impl ExtractionStrategy for CommentMarkerStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::CommentMarkers
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        let markers: Vec<(usize, usize, &str)> = MARKER
            .captures_iter(text)
            .filter_map(|c| {
                let whole = c.get(0)?;
                let path = c.get(1)?;
                Some((whole.start(), whole.end(), path.as_str()))
            })
            .collect();

        if markers.is_empty() {
            return None;
        }

        let mut files = Vec::new();
        for (idx, (_, body_start, path)) in markers.iter().enumerate() {
            let body_end = markers.get(idx + 1).map_or(text.len(), |next| next.0);
            let code = segment_code(&text[*body_start..body_end]);
            if code.len() <= SEGMENT_MIN_CODE_LEN {
                trace!(path, len = code.len(), "marker segment too short");
                continue;
            }

            let name = derive_name(&code, Some(path));
            if let Ok(file) = GeneratedFile::new(path, format!("{code}\n")) {
                files.push(
                    file.with_name(name)
                        .with_generator(StrategyKind::CommentMarkers.generator_label()),
                );
            }
        }
        non_empty(files)
    }
}
