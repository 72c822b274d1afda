//! Built-in extraction strategies
//!
//! In cascade order:
//! 1. [`HeaderFenceStrategy`] - fences declaring `type:Name:lang:path`
//! 2. [`CommentMarkerStrategy`] - `// <path>` comment lines
//! 3. [`GenericFenceStrategy`] - any fenced block
//! 4. [`BoundaryStrategy`] - top-level declarations in bare source
//! 5. [`JsonPayloadStrategy`] - structured JSON objects
//! 6. [`FallbackStrategy`] - the whole text as one file

use crate::strategy::ExtractionStrategy;

mod boundary;
mod fallback;
mod generic;
mod header;
mod json;
mod markers;

pub use boundary::BoundaryStrategy;
pub use fallback::{FallbackStrategy, FALLBACK_PATH};
pub use generic::{GenericFenceStrategy, DEFAULT_COMPONENT_DIR};
pub use header::{FenceHeader, HeaderFenceStrategy};
pub use json::{files_from_json, JsonPayloadStrategy};
pub use markers::{marker_path, CommentMarkerStrategy};

/// Strategies 1-5 in cascade order; the fallback is appended per call
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(HeaderFenceStrategy),
        Box::new(CommentMarkerStrategy),
        Box::new(GenericFenceStrategy),
        Box::new(BoundaryStrategy),
        Box::new(JsonPayloadStrategy),
    ]
}
