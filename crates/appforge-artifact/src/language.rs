//! Source languages and file kinds
//!
//! Both are derived from a file's extension (plus a few path hints for
//! [`FileKind`]), never from parsing the content.

use crate::path::FilePath;
use serde::{Deserialize, Serialize};

/// Source language of a generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// TypeScript (`.ts`, `.tsx`)
    TypeScript,
    /// JavaScript (`.js`, `.jsx`, `.mjs`, `.cjs`)
    JavaScript,
    /// CSS
    Css,
    /// SCSS / Sass
    Scss,
    /// HTML
    Html,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// Markdown
    Markdown,
    /// SQL
    Sql,
    /// Python
    Python,
    /// Rust
    Rust,
    /// Go
    Go,
    /// Shell script
    Shell,
    /// Anything else
    Text,
}

impl Language {
    /// Language for a file extension (without dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Language::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "css" => Language::Css,
            "scss" | "sass" => Language::Scss,
            "html" | "htm" => Language::Html,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "md" | "mdx" => Language::Markdown,
            "sql" | "prisma" => Language::Sql,
            "py" => Language::Python,
            "rs" => Language::Rust,
            "go" => Language::Go,
            "sh" | "bash" => Language::Shell,
            _ => Language::Text,
        }
    }

    /// Language for a fence tag or header hint such as `tsx` or `typescript`
    #[must_use]
    pub fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_ascii_lowercase();
        let lang = match hint.as_str() {
            "" => return None,
            "typescript" | "typescriptreact" => Language::TypeScript,
            "javascript" | "javascriptreact" | "node" => Language::JavaScript,
            "markdown" => Language::Markdown,
            "python" => Language::Python,
            "rust" => Language::Rust,
            "golang" => Language::Go,
            "shell" | "zsh" => Language::Shell,
            "postgresql" | "mysql" | "sqlite" => Language::Sql,
            other => match Language::from_extension(other) {
                Language::Text => return None,
                lang => lang,
            },
        };
        Some(lang)
    }

    /// Language for a path
    #[must_use]
    pub fn from_path(path: &FilePath) -> Self {
        path.extension()
            .map_or(Language::Text, |ext| Language::from_extension(&ext))
    }

    /// Preferred extension when a file has to be named from scratch
    #[inline]
    #[must_use]
    pub fn default_extension(&self) -> &'static str {
        match self {
            Language::TypeScript => "tsx",
            Language::JavaScript => "jsx",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Html => "html",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Markdown => "md",
            Language::Sql => "sql",
            Language::Python => "py",
            Language::Rust => "rs",
            Language::Go => "go",
            Language::Shell => "sh",
            Language::Text => "txt",
        }
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Html => "html",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Markdown => "markdown",
            Language::Sql => "sql",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Shell => "shell",
            Language::Text => "text",
        }
    }

    /// Whether files in this language can import packages
    #[inline]
    #[must_use]
    pub fn is_script(&self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }
}

/// Role of a generated file within the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// UI component
    Component,
    /// Routed page
    Page,
    /// React-style hook
    Hook,
    /// Stylesheet
    Style,
    /// Configuration file
    Config,
    /// Test file
    Test,
    /// Plain script or module
    Script,
    /// HTML markup
    Markup,
    /// Documentation
    Documentation,
    /// Database schema or migration
    Schema,
    /// Unclassified
    Other,
}

impl FileKind {
    /// Classify a path by extension, refined by folder and name hints
    #[must_use]
    pub fn classify(path: &FilePath) -> Self {
        let name = path.file_name().to_ascii_lowercase();
        let ext = path.extension().unwrap_or_default();

        if name.contains(".test.") || name.contains(".spec.") || path.in_folder("__tests__") {
            return FileKind::Test;
        }

        match ext.as_str() {
            "tsx" | "jsx" | "vue" | "svelte" => {
                if path.in_folder("pages") || (path.in_folder("app") && name.starts_with("page.")) {
                    FileKind::Page
                } else if name.starts_with("use") && path.in_folder("hooks") {
                    FileKind::Hook
                } else {
                    FileKind::Component
                }
            }
            "ts" | "js" | "mjs" | "cjs" | "mts" | "cts" => {
                if name.contains("config") || name.starts_with('.') {
                    FileKind::Config
                } else if path.in_folder("hooks") || name.starts_with("use") {
                    FileKind::Hook
                } else {
                    FileKind::Script
                }
            }
            "css" | "scss" | "sass" | "less" => FileKind::Style,
            "json" | "yaml" | "yml" | "toml" | "env" => FileKind::Config,
            "html" | "htm" => FileKind::Markup,
            "md" | "mdx" | "txt" => FileKind::Documentation,
            "sql" | "prisma" => FileKind::Schema,
            "py" | "rs" | "go" | "sh" => FileKind::Script,
            _ if name.starts_with(".env") || name == "dockerfile" => FileKind::Config,
            _ => FileKind::Other,
        }
    }
}
