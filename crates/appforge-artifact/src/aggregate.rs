//! File aggregation
//!
//! Merges per-stage file lists into one ordered set keyed by normalized path
//! and derives the [`ProjectStructure`] and dependency set from it.

use crate::file::GeneratedFile;
use crate::language::{FileKind, Language};
use crate::path::FilePath;
use crate::structure::ProjectStructure;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Merged output of one or more stages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Files in first-seen path order
    pub files: Vec<GeneratedFile>,
    /// Tree derived from `files`
    pub structure: ProjectStructure,
    /// Sorted, de-duplicated package dependencies
    pub dependencies: Vec<String>,
}

/// Merges per-stage file lists
///
/// Files are keyed by normalized path. When two stages produce the same
/// path, the later file replaces the earlier content but keeps the earlier
/// position.
#[derive(Debug, Default)]
pub struct FileAggregator {
    files: IndexMap<String, GeneratedFile>,
    dropped: usize,
}

impl FileAggregator {
    /// Create empty aggregator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one stage's files
    pub fn add_stage(&mut self, files: impl IntoIterator<Item = GeneratedFile>) -> &mut Self {
        for file in files {
            match Self::normalize(file) {
                Some(file) => {
                    self.files.insert(file.path.clone(), file);
                }
                None => self.dropped += 1,
            }
        }
        self
    }

    /// Builder-style variant of [`FileAggregator::add_stage`]
    #[inline]
    #[must_use]
    pub fn with_stage(mut self, files: impl IntoIterator<Item = GeneratedFile>) -> Self {
        self.add_stage(files);
        self
    }

    /// Number of files dropped because their path was unusable
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of distinct paths collected so far
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check for no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Finish aggregation
    #[must_use]
    pub fn finish(self) -> Aggregation {
        let files: Vec<GeneratedFile> = self.files.into_values().collect();
        let structure = ProjectStructure::from_paths(files.iter().map(|f| f.path.as_str()));
        let dependencies = collect_dependencies(&files);
        Aggregation {
            files,
            structure,
            dependencies,
        }
    }

    /// Re-normalize path-derived fields; `None` if the path is unusable
    fn normalize(mut file: GeneratedFile) -> Option<GeneratedFile> {
        let path = FilePath::parse(&file.path).ok()?;
        let normalized = path.to_string();
        if normalized != file.path {
            file.path = normalized;
            file.filename = path.file_name().to_string();
        }
        file.kind = FileKind::classify(&path);
        if file.language == Language::Text {
            file.language = Language::from_path(&path);
        }
        file.size = file.content.len();
        if file.name.trim().is_empty() {
            file.name = path.file_stem().to_string();
        }
        Some(file)
    }
}

/// Merge several stage lists in one call
#[must_use]
pub fn merge_stages<I>(stages: I) -> Aggregation
where
    I: IntoIterator<Item = Vec<GeneratedFile>>,
{
    let mut aggregator = FileAggregator::new();
    for stage in stages {
        aggregator.add_stage(stage);
    }
    aggregator.finish()
}

/// Sorted union of every file's dependency list
#[must_use]
pub fn collect_dependencies(files: &[GeneratedFile]) -> Vec<String> {
    files
        .iter()
        .flat_map(|f| f.metadata.dependencies.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(path: &str, content: &str) -> GeneratedFile {
        GeneratedFile::new(path, content).unwrap()
    }

    #[test]
    fn later_stage_replaces_same_path() {
        let aggregation = FileAggregator::new()
            .with_stage(vec![file("src/App.tsx", "v1"), file("src/main.tsx", "main")])
            .with_stage(vec![file("src/App.tsx", "v2")])
            .finish();

        let paths: Vec<_> = aggregation.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/App.tsx", "src/main.tsx"]);
        assert_eq!(aggregation.files[0].content, "v2");
    }

    #[test]
    fn renormalizes_mutated_paths() {
        let mut f = file("src/App.tsx", "x");
        f.path = "/src//pages/Home.tsx/".to_string();

        let aggregation = FileAggregator::new().with_stage(vec![f]).finish();
        let merged = &aggregation.files[0];
        assert_eq!(merged.path, "src/pages/Home.tsx");
        assert_eq!(merged.filename, "Home.tsx");
        assert_eq!(merged.kind, FileKind::Page);
    }

    #[test]
    fn drops_unusable_paths() {
        let mut f = file("src/App.tsx", "x");
        f.path = "///".to_string();

        let mut aggregator = FileAggregator::new();
        aggregator.add_stage(vec![f]);
        assert_eq!(aggregator.dropped(), 1);
        assert!(aggregator.is_empty());
    }

    #[test]
    fn dependencies_are_sorted_and_unique() {
        let aggregation = merge_stages(vec![
            vec![file("src/a.ts", "import z from 'zod';\nimport r from 'react';")],
            vec![file("src/b.ts", "import r from 'react';")],
        ]);
        assert_eq!(aggregation.dependencies, vec!["react", "zod"]);
    }

    #[test]
    fn structure_matches_files() {
        let aggregation = merge_stages(vec![vec![
            file("src/App.tsx", "a"),
            file("src/pages/Home.tsx", "b"),
        ]]);
        assert!(aggregation.structure.contains("src/App.tsx"));
        assert!(aggregation.structure.contains("src/pages/Home.tsx"));
    }
}
