//! Strategy 4: declaration boundaries in bare source
//!
//! Used when the generator returned plain code without fences or markers.
//! Top-level `export default function X`, `export function X` and
//! `const X: Type` lines start a new file.

use crate::fence::strip_fences;
use crate::naming::{derive_name, PathAllocator};
use crate::strategies::generic::DEFAULT_COMPONENT_DIR;
use crate::strategy::{non_empty, ExtractionStrategy, StrategyKind};
use appforge_artifact::GeneratedFile;
use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^(?:export\s+default\s+(?:async\s+)?function\s+([A-Za-z_$][\w$]*)|export\s+(?:async\s+)?function\s+([A-Za-z_$][\w$]*)|(?:export\s+)?const\s+([A-Za-z_$][\w$]*)\s*:\s*[A-Za-z_$])",
    )
    .expect("valid boundary regex")
});

/// Declaration-boundary strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryStrategy;

impl BoundaryStrategy {
    /// Byte offsets and names of every boundary line
    fn boundaries(text: &str) -> Vec<(usize, String)> {
        BOUNDARY
            .captures_iter(text)
            .filter_map(|c| {
                let start = c.get(0)?.start();
                let name = c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3))?;
                Some((start, name.as_str().to_string()))
            })
            .collect()
    }

    fn make_file(alloc: &mut PathAllocator, name: &str, code: &str) -> Option<GeneratedFile> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let path = alloc.allocate(DEFAULT_COMPONENT_DIR, name, "tsx");
        GeneratedFile::new(&path, format!("{code}\n"))
            .ok()
            .map(|f| {
                f.with_name(name)
                    .with_generator(StrategyKind::Boundaries.generator_label())
            })
    }
}

impl ExtractionStrategy for BoundaryStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Boundaries
    }

    fn extract(&self, text: &str) -> Option<Vec<GeneratedFile>> {
        let source = strip_fences(text);
        let bounds = Self::boundaries(&source);
        let mut alloc = PathAllocator::default();

        let files = match bounds.as_slice() {
            [] => return None,
            [_single] => {
                let name = derive_name(&source, None);
                Self::make_file(&mut alloc, &name, &source).into_iter().collect()
            }
            _ => bounds
                .iter()
                .enumerate()
                .filter_map(|(idx, (start, name))| {
                    // imports and other preamble belong to the first file
                    let from = if idx == 0 { 0 } else { *start };
                    let to = bounds.get(idx + 1).map_or(source.len(), |next| next.0);
                    Self::make_file(&mut alloc, name, &source[from..to])
                })
                .collect(),
        };
        non_empty(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_on_exports() {
        let text = "import React from 'react';\n\nexport function Header() {\n  return <h1>Hi</h1>;\n}\n\nexport default function Page() {\n  return <Header />;\n}\n";
        let files = BoundaryStrategy.extract(text).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "src/components/Header.tsx");
        assert!(files[0].content.starts_with("import React"));
        assert_eq!(files[1].path, "src/components/Page.tsx");
        assert!(files[1].content.starts_with("export default function Page"));
        assert_eq!(files[0].metadata.dependencies, vec!["react".to_string()]);
    }

    #[test]
    fn single_boundary_keeps_whole_text() {
        let text = "import { useState } from 'react';\n\nconst Counter: React.FC = () => {\n  const [n, setN] = useState(0);\n  return <button onClick={() => setN(n + 1)}>{n}</button>;\n};\n\nexport default Counter;\n";
        let files = BoundaryStrategy.extract(text).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "Counter");
        assert!(files[0].content.contains("useState"));
    }

    #[test]
    fn indented_declarations_are_not_boundaries() {
        assert!(BoundaryStrategy.extract("function inner() {\n  export function Nope() {}\n}").is_none());
        assert!(BoundaryStrategy.extract("just prose").is_none());
    }
}
