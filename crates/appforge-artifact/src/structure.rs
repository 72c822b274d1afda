//! Project folder/file tree
//!
//! [`ProjectStructure`] is derived purely from file paths. Folders and file
//! names are kept sorted, so identical path sets always produce an identical
//! tree regardless of insertion order or repetition.

use crate::path::FilePath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One folder in the project tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Sub-folders keyed by segment name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub folders: BTreeMap<String, FolderNode>,
    /// File names directly inside this folder (sorted, unique)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl FolderNode {
    fn insert(&mut self, folders: &[String], file: &str) {
        match folders.split_first() {
            Some((head, rest)) => self
                .folders
                .entry(head.clone())
                .or_default()
                .insert(rest, file),
            None => {
                if let Err(idx) = self.files.binary_search_by(|f| f.as_str().cmp(file)) {
                    self.files.insert(idx, file.to_string());
                }
            }
        }
    }

    /// Total number of files below this folder
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.values().map(FolderNode::file_count).sum::<usize>()
    }

    /// Check for a file directly in this folder
    #[inline]
    #[must_use]
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }
}

/// Folder/file tree of a generated project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectStructure {
    root: FolderNode,
}

impl ProjectStructure {
    /// Empty structure
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a structure from raw paths; unusable paths are skipped
    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut structure = Self::new();
        for path in paths {
            structure.add_path(path.as_ref());
        }
        structure
    }

    /// Add a single path, returning `false` if it normalizes to nothing
    pub fn add_path(&mut self, raw: &str) -> bool {
        match FilePath::parse(raw) {
            Ok(path) => {
                self.root.insert(path.folders(), path.file_name());
                true
            }
            Err(_) => false,
        }
    }

    /// Root folder
    #[inline]
    #[must_use]
    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    /// Folder at the given segments (`&[]` is the root)
    #[must_use]
    pub fn folder(&self, segments: &[&str]) -> Option<&FolderNode> {
        segments
            .iter()
            .try_fold(&self.root, |node, seg| node.folders.get(*seg))
    }

    /// Check whether a file path is part of the tree
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        let Ok(path) = FilePath::parse(raw) else {
            return false;
        };
        let folders: Vec<&str> = path.folders().iter().map(String::as_str).collect();
        self.folder(&folders)
            .is_some_and(|node| node.has_file(path.file_name()))
    }

    /// Total number of files
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.root.file_count()
    }

    /// Check for an empty tree
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_count() == 0
    }

    /// Render as an indented text tree (folders first, then files)
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &mut out);
        out
    }
}

fn render_node(node: &FolderNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (name, child) in &node.folders {
        out.push_str(&indent);
        out.push_str(name);
        out.push_str("/\n");
        render_node(child, depth + 1, out);
    }
    for file in &node.files {
        out.push_str(&indent);
        out.push_str(file);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_folders() {
        let structure = ProjectStructure::from_paths(["src/App.tsx", "src/pages/Home.tsx"]);

        let src = structure.folder(&["src"]).unwrap();
        assert_eq!(src.files, vec!["App.tsx"]);

        let pages = structure.folder(&["src", "pages"]).unwrap();
        assert_eq!(pages.files, vec!["Home.tsx"]);
        assert_eq!(structure.file_count(), 2);
    }

    #[test]
    fn duplicate_filenames_across_folders() {
        let structure =
            ProjectStructure::from_paths(["client/index.ts", "server/index.ts", "index.ts"]);

        assert!(structure.contains("client/index.ts"));
        assert!(structure.contains("server/index.ts"));
        assert!(structure.contains("index.ts"));
        assert!(!structure.contains("shared/index.ts"));
        assert_eq!(structure.file_count(), 3);
    }

    #[test]
    fn repeated_paths_collapse() {
        let once = ProjectStructure::from_paths(["src/App.tsx"]);
        let twice = ProjectStructure::from_paths(["src/App.tsx", "./src//App.tsx"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn invalid_paths_are_skipped() {
        let mut structure = ProjectStructure::new();
        assert!(!structure.add_path("  "));
        assert!(structure.is_empty());
    }

    #[test]
    fn render_tree() {
        let structure =
            ProjectStructure::from_paths(["package.json", "src/main.tsx", "src/pages/Home.tsx"]);
        assert_eq!(
            structure.render(),
            "src/\n  pages/\n    Home.tsx\n  main.tsx\npackage.json\n"
        );
    }

    #[test]
    fn serializes_as_nested_object() {
        let structure = ProjectStructure::from_paths(["src/App.tsx"]);
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["folders"]["src"]["files"][0], "App.tsx");
    }
}
