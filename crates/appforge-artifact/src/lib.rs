//! appforge artifact model
//!
//! The data model shared by every pipeline stage.
//!
//! # Core Concepts
//!
//! - [`GeneratedFile`]: one output file with normalized path, content and metadata
//! - [`FilePath`]: normalized slash-separated relative path
//! - [`Language`] / [`FileKind`]: derived from the file extension
//! - [`ProjectStructure`]: folder/file tree built purely from paths
//! - [`FileAggregator`]: merges per-stage file lists
//!
//! # Example
//!
//! ```rust
//! use appforge_artifact::{FileAggregator, GeneratedFile};
//!
//! let app = GeneratedFile::new("src/App.tsx", "export default function App() {}").unwrap();
//! let home = GeneratedFile::new("src/pages/Home.tsx", "export function Home() {}").unwrap();
//!
//! let merged = FileAggregator::new().with_stage(vec![app, home]).finish();
//! assert!(merged.structure.contains("src/pages/Home.tsx"));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod aggregate;
mod deps;
mod error;
mod file;
mod language;
mod path;
mod structure;

// Re-exports
pub use aggregate::{collect_dependencies, merge_stages, Aggregation, FileAggregator};
pub use deps::{detect_dependencies, package_root};
pub use error::ArtifactError;
pub use file::{FileMetadata, GeneratedFile};
pub use language::{FileKind, Language};
pub use path::{normalize_path, FilePath};
pub use structure::{FolderNode, ProjectStructure};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
