//! Normalized file paths
//!
//! Provides [`FilePath`] for the slash-separated relative paths every
//! generated file carries.

use crate::error::ArtifactError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Normalized relative path of a generated file
///
/// Invariants:
/// - at least one segment
/// - segments are non-empty and never `.` or `..`
/// - rendered with single `/` separators, no leading or trailing slash
///
/// # Examples
/// - `"./src//App.tsx"` → `src/App.tsx`
/// - `"src\\pages\\Home.tsx"` → `src/pages/Home.tsx`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilePath(Vec<String>);

impl FilePath {
    /// Parse and normalize a raw path
    ///
    /// # Errors
    /// Returns [`ArtifactError::EmptyPath`] when nothing remains after normalization
    pub fn parse(raw: &str) -> Result<Self, ArtifactError> {
        let cleaned = raw
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .trim();

        let segments: Vec<String> = cleaned
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(ArtifactError::EmptyPath(raw.to_string()));
        }
        Ok(Self(segments))
    }

    /// Join a folder and a file name with a single separator
    ///
    /// # Errors
    /// Returns an error when the file name normalizes to nothing
    pub fn join(folder: &str, filename: &str) -> Result<Self, ArtifactError> {
        let file = Self::parse(filename)
            .map_err(|_| ArtifactError::MissingFileName(format!("{folder}/{filename}")))?;
        match Self::parse(folder) {
            Ok(mut base) => {
                base.0.extend(file.0);
                Ok(base)
            }
            Err(_) => Ok(file),
        }
    }

    /// Path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Folder segments (everything but the file name)
    #[inline]
    #[must_use]
    pub fn folders(&self) -> &[String] {
        &self.0[..self.0.len() - 1]
    }

    /// Final segment
    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &str {
        // at least one segment by construction
        self.0.last().map_or("", String::as_str)
    }

    /// File name without its last extension
    #[must_use]
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// Lower-cased last extension, if any
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(name[idx + 1..].to_ascii_lowercase()),
        }
    }

    /// Parent folder rendered as a path (empty string at the root)
    #[must_use]
    pub fn parent(&self) -> String {
        self.folders().join("/")
    }

    /// Check whether any folder segment equals `folder` (case-insensitive)
    #[must_use]
    pub fn in_folder(&self, folder: &str) -> bool {
        self.folders().iter().any(|f| f.eq_ignore_ascii_case(folder))
    }
}

impl Display for FilePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl FromStr for FilePath {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Normalize a raw path into its canonical string form
///
/// # Errors
/// Returns an error when the path is empty after normalization
pub fn normalize_path(raw: &str) -> Result<String, ArtifactError> {
    FilePath::parse(raw).map(|p| p.to_string())
}
