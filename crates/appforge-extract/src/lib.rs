//! appforge source extraction
//!
//! Turns unstructured generator output into named source files by trying a
//! fixed cascade of heuristics. Every strategy is a pure function from text to
//! an optional file list; the final fallback guarantees at least one file.
//!
//! # Example
//!
//! ```rust
//! use appforge_extract::SourceExtractor;
//!
//! let raw = "```component:Greeting:tsx:src/Greeting.tsx\nexport const Greeting = () => <div>Hi</div>;\n```";
//! let files = SourceExtractor::new().extract(raw);
//!
//! assert_eq!(files.len(), 1);
//! assert_eq!(files[0].name, "Greeting");
//! assert_eq!(files[0].path, "src/Greeting.tsx");
//! ```

#![warn(unreachable_pub)]

mod extractor;
mod fence;
mod naming;
mod strategy;

pub mod strategies;

pub use extractor::{SourceExtractor, STRATEGY_METRIC};
pub use fence::{fenced_blocks, strip_fences, FencedBlock};
pub use naming::{derive_name, pascal_case, prompt_noun, DEFAULT_FALLBACK_NAME, PLACEHOLDER_NAME};
pub use strategies::files_from_json;
pub use strategy::{
    Extraction, ExtractionStrategy, StrategyKind, HEADER_MIN_CODE_LEN, SEGMENT_MIN_CODE_LEN,
};
