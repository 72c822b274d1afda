//! Generated file model
//!
//! A [`GeneratedFile`] is the output unit of the pipeline: a normalized path,
//! its content, and metadata accumulated as the file moves through the
//! Generate, Validate and Optimize stages.

use crate::deps::detect_dependencies;
use crate::error::ArtifactError;
use crate::language::{FileKind, Language};
use crate::path::FilePath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata attached to a generated file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Generator that produced the file (e.g. `raw-text`, `multi:backend`)
    pub generator: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub updated_at: DateTime<Utc>,
    /// Static validation verdict, `None` until validated
    pub validated: Option<bool>,
    /// Static validation score (0-100)
    pub validation_score: Option<f64>,
    /// Issues reported by static validation
    #[serde(default)]
    pub validation_issues: Vec<String>,
    /// Quality score (0-100)
    pub quality_score: Option<f64>,
    /// Whether the optimizer rewrote the content
    #[serde(default)]
    pub optimized: bool,
    /// Changes applied by the optimizer
    #[serde(default)]
    pub optimizations: Vec<String>,
    /// Package dependencies imported by this file
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// File type declared by the generator (e.g. `component`), if any
    pub declared_kind: Option<String>,
}

impl FileMetadata {
    /// Create metadata for a freshly generated file
    #[must_use]
    pub fn new(generator: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            generator: generator.into(),
            created_at: now,
            updated_at: now,
            validated: None,
            validation_score: None,
            validation_issues: Vec::new(),
            quality_score: None,
            optimized: false,
            optimizations: Vec::new(),
            dependencies: Vec::new(),
            declared_kind: None,
        }
    }
}

/// One generated source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Normalized relative path
    pub path: String,
    /// Final path segment
    pub filename: String,
    /// Display name (component or module name)
    pub name: String,
    /// File content
    pub content: String,
    /// Source language
    pub language: Language,
    /// File role
    #[serde(rename = "type")]
    pub kind: FileKind,
    /// Content size in bytes
    pub size: usize,
    /// Pipeline metadata
    pub metadata: FileMetadata,
}

impl GeneratedFile {
    /// Create a file from a raw path and content
    ///
    /// The path is normalized; language, kind, display name and
    /// dependencies are derived from it and the content.
    ///
    /// # Errors
    /// Returns an error when the path is empty after normalization
    pub fn new(path: &str, content: impl Into<String>) -> Result<Self, ArtifactError> {
        let path = FilePath::parse(path)?;
        let content = content.into();
        let language = Language::from_path(&path);

        let mut metadata = FileMetadata::new("unknown");
        if language.is_script() {
            metadata.dependencies = detect_dependencies(&content);
        }

        Ok(Self {
            filename: path.file_name().to_string(),
            name: path.file_stem().to_string(),
            kind: FileKind::classify(&path),
            size: content.len(),
            path: path.to_string(),
            content,
            language,
            metadata,
        })
    }

    /// Set display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.name = name;
        }
        self
    }

    /// Override language (e.g. from a fence tag)
    #[inline]
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        if language.is_script() && self.metadata.dependencies.is_empty() {
            self.metadata.dependencies = detect_dependencies(&self.content);
        }
        self
    }

    /// Record originating generator
    #[inline]
    #[must_use]
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.metadata.generator = generator.into();
        self
    }

    /// Record the kind declared by the generator
    #[inline]
    #[must_use]
    pub fn with_declared_kind(mut self, kind: impl Into<String>) -> Self {
        self.metadata.declared_kind = Some(kind.into());
        self
    }

    /// Parsed path
    ///
    /// # Errors
    /// Only fails if `path` was mutated into an invalid value
    pub fn file_path(&self) -> Result<FilePath, ArtifactError> {
        FilePath::parse(&self.path)
    }

    /// Replace content, refreshing size, dependencies and `updated_at`
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.size = self.content.len();
        if self.language.is_script() {
            self.metadata.dependencies = detect_dependencies(&self.content);
        }
        self.touch();
    }

    /// Bump `updated_at`
    #[inline]
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    /// Number of lines in the content
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}
