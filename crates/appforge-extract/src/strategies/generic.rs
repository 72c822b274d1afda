//! Strategy 3: any fenced block
//!
//! The path comes from a `// path` comment on the last non-blank line before
//! the fence (or on the block's own first line). Without one the block lands
//! in `src/components/` under a name derived from its code.

use super::json::is_payload;
use super::markers::marker_path;
use crate::fence::{fenced_blocks, last_nonblank_line, FencedBlock};
use crate::naming::{derive_name, PathAllocator};
use crate::strategy::{non_empty, ExtractionStrategy, StrategyKind, SEGMENT_MIN_CODE_LEN};
use appforge_artifact::{GeneratedFile, Language};
use tracing::trace;

/// Folder used for blocks without an explicit path
pub const DEFAULT_COMPONENT_DIR: &str = "src/components";

/// Fence tags that denote shell transcripts, never source files
const SHELL_TAGS: &[&str] = &["bash", "sh", "shell", "console", "zsh", "terminal", "powershell"];

/// Generic fenced block strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericFenceStrategy;

impl GenericFenceStrategy {
    /// Explicit path for a block, if the author gave one
    fn explicit_path<'a>(text: &'a str, block: &'a FencedBlock) -> Option<&'a str> {
        last_nonblank_line(&text[..block.span.start])
            .and_then(marker_path)
            .or_else(|| block.code.lines().next().and_then(marker_path))
    }

    fn extension_for(language: Option<Language>) -> &'static str {
        match language {
            Some(lang) if !lang.is_script() => lang.default_extension(),
            _ => Language::TypeScript.default_extension(),
        }
    }
}

impl ExtractionStrategy for GenericFenceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::GenericFence
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        let mut alloc = PathAllocator::default();
        let mut files = Vec::new();

        for block in fenced_blocks(text) {
            let tag = block.tag().to_ascii_lowercase();
            if SHELL_TAGS.contains(&tag.as_str()) {
                trace!(tag, "skipping shell block");
                continue;
            }

            let code = block.code.trim();
            if code.len() <= SEGMENT_MIN_CODE_LEN {
                continue;
            }
            // structured payloads are left to the json strategy
            if tag == "json" && is_payload(code) {
                continue;
            }

            let language = Language::from_hint(&tag);
            let path = match Self::explicit_path(text, &block) {
                Some(path) if alloc.reserve(path) => path.to_string(),
                _ => {
                    let stem = derive_name(code, None);
                    alloc.allocate(DEFAULT_COMPONENT_DIR, &stem, Self::extension_for(language))
                }
            };

            let Ok(mut file) = GeneratedFile::new(&path, format!("{code}\n")) else {
                continue;
            };
            file = file
                .with_name(derive_name(code, Some(&path)))
                .with_generator(StrategyKind::GenericFence.generator_label());
            if let Some(lang) = language {
                file = file.with_language(lang);
            }
            files.push(file);
        }
        non_empty(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CARD: &str = "export default function Card() {\n  return <div className=\"card\">Card body</div>;\n}";
    const LIST: &str = "export function List() {\n  return <ul className=\"list\"><li>One item</li></ul>;\n}";

    #[test]
    fn default_paths_from_names() {
        let text = format!("Here:\n\n```tsx\n{CARD}\n```\n\nAnd:\n\n```tsx\n{LIST}\n```\n");
        let files = GenericFenceStrategy.extract(&text).unwrap();

        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/components/Card.tsx", "src/components/List.tsx"]);
        assert_eq!(files[0].name, "Card");
    }

    #[test]
    fn preceding_comment_sets_path() {
        let text = format!("// src/widgets/Card.tsx\n```tsx\n{CARD}\n```\n");
        let files = GenericFenceStrategy.extract(&text).unwrap();
        assert_eq!(files[0].path, "src/widgets/Card.tsx");
    }

    #[test]
    fn duplicate_names_get_suffix() {
        let text = format!("```tsx\n{CARD}\n```\n\n```tsx\n{CARD}\n```\n");
        let files = GenericFenceStrategy.extract(&text).unwrap();
        assert_eq!(files[1].path, "src/components/Card2.tsx");
    }

    #[test]
    fn skips_shell_and_short_blocks() {
        let text = "```bash\nnpm install react react-dom tailwindcss postcss autoprefixer --save\n```\n\n```js\nx()\n```\n";
        assert!(GenericFenceStrategy.extract(text).is_none());
    }

    #[test]
    fn leaves_json_payloads_alone() {
        let text = "```json\n{\"server\": \"const app = require('./app');\\napp.listen(3000);\"}\n```\n";
        assert!(GenericFenceStrategy.extract(text).is_none());
    }

    #[test]
    fn non_script_language_keeps_its_extension() {
        let text = "```css\n.card { display: flex; padding: 1rem; border-radius: 8px; color: #333; }\n```\n";
        let files = GenericFenceStrategy.extract(text).unwrap();
        assert_eq!(files[0].path, "src/components/Component.css");
        assert_eq!(files[0].language, Language::Css);
    }
}
