//! Markdown fence handling
//!
//! Uses pulldown-cmark to locate fenced code blocks in generator output,
//! plus line-based helpers for stripping stray fence delimiters.

use pulldown_cmark::{CodeBlockKind, Event, Parser as MdParser, Tag, TagEnd};
use std::ops::Range;

/// Fenced code block found in raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FencedBlock {
    /// Full info string after the opening fence (may be empty)
    pub info: String,
    /// Block body without the fence lines
    pub code: String,
    /// Byte range of the whole block in the source text
    pub span: Range<usize>,
}

impl FencedBlock {
    /// First whitespace-separated token of the info string
    #[must_use]
    pub fn tag(&self) -> &str {
        self.info.split_whitespace().next().unwrap_or("")
    }
}

/// Collect all fenced code blocks in document order
#[must_use]
pub fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<FencedBlock> = None;

    for (event, range) in MdParser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some(FencedBlock {
                    info: info.trim().to_string(),
                    code: String::new(),
                    span: range,
                });
            }
            Event::Text(body) => {
                if let Some(block) = current.as_mut() {
                    block.code.push_str(&body);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = current.take() {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }

    // unterminated block at end of input
    if let Some(block) = current.take() {
        blocks.push(block);
    }
    blocks
}

/// Check whether a line is a bare fence delimiter (with or without info)
#[inline]
#[must_use]
pub(crate) fn is_fence_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Remove every fence delimiter line
#[must_use]
pub fn strip_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !is_fence_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Last non-blank line of a text slice
#[must_use]
pub(crate) fn last_nonblank_line(text: &str) -> Option<&str> {
    text.lines().rev().find(|l| !l.trim().is_empty())
}
