//! Display-name derivation
//!
//! Shared by the comment-marker, generic-fence and boundary strategies.

use appforge_artifact::FilePath;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Name used when nothing recognizable is found
pub const PLACEHOLDER_NAME: &str = "Component";

/// Name used by the fallback strategy when the prompt offers no noun
pub const DEFAULT_FALLBACK_NAME: &str = "GeneratedComponent";

/// Ordered name patterns; first match wins
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"export\s+default\s+(?:async\s+)?(?:function|const|class)\s+([A-Za-z_$][\w$]*)",
        r"export\s+(?:async\s+)?(?:function|const|class)\s+([A-Za-z_$][\w$]*)",
        r"\bconst\s+([A-Za-z_$][\w$]*)\s*:\s*[A-Za-z_$][\w$.]*",
        r"\bclass\s+([A-Za-z_$][\w$]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid name pattern"))
    .collect()
});

/// Nouns recognized in prompts, most specific first
const PROMPT_NOUNS: &[&str] = &[
    "navbar", "sidebar", "header", "footer", "button", "modal", "dropdown", "carousel",
    "card", "form", "table", "list", "menu", "tabs", "accordion", "tooltip", "counter",
    "timer", "calculator", "calendar", "gallery", "dashboard", "todo", "chat", "blog",
    "cart", "checkout", "login", "signup", "profile", "pricing", "landing", "weather",
    "search", "portfolio", "kanban", "player",
];

/// Derive a display name from a known path or the code itself
///
/// Prefers the path's file stem; otherwise tries the declaration patterns
/// in order; otherwise returns [`PLACEHOLDER_NAME`].
#[must_use]
pub fn derive_name(code: &str, path: Option<&str>) -> String {
    if let Some(stem) = path
        .and_then(|p| FilePath::parse(p).ok())
        .map(|p| p.file_stem().to_string())
        .filter(|s| !s.is_empty())
    {
        return stem;
    }

    NAME_PATTERNS
        .iter()
        .find_map(|re| re.captures(code).and_then(|c| c.get(1)))
        .map_or_else(|| PLACEHOLDER_NAME.to_string(), |m| m.as_str().to_string())
}

/// First recognizable noun in a prompt, in PascalCase
#[must_use]
pub fn prompt_noun(prompt: &str) -> Option<String> {
    let lower = prompt.to_ascii_lowercase();
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .find_map(|word| {
            let singular = word.strip_suffix('s').unwrap_or(word);
            PROMPT_NOUNS
                .iter()
                .find(|noun| **noun == word || **noun == singular)
        })
        .map(|noun| pascal_case(noun))
}

/// Convert `some-name_here` into `SomeNameHere`
#[must_use]
pub fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Tracks paths already handed out within one extraction
#[derive(Debug, Default)]
pub(crate) struct PathAllocator {
    taken: HashSet<String>,
}

impl PathAllocator {
    /// Return `folder/stem.ext`, suffixing the stem with 2, 3, ... on collision
    pub(crate) fn allocate(&mut self, folder: &str, stem: &str, ext: &str) -> String {
        let mut candidate = Self::join(folder, &format!("{stem}.{ext}"));
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = Self::join(folder, &format!("{stem}{n}.{ext}"));
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }

    fn join(folder: &str, filename: &str) -> String {
        FilePath::join(folder, filename).map_or_else(|_| format!("{folder}/{filename}"), |p| p.to_string())
    }

    /// Reserve an explicit path; returns `false` if it was already taken
    pub(crate) fn reserve(&mut self, path: &str) -> bool {
        self.taken.insert(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_path_stem() {
        assert_eq!(derive_name("export function Other() {}", Some("src/Greeting.tsx")), "Greeting");
    }

    #[test]
    fn pattern_priority() {
        let code = "class Helper {}\nexport function Named() {}\nexport default function Main() {}";
        assert_eq!(derive_name(code, None), "Main");

        let code = "const Card: React.FC = () => null;\nexport const Exported = 1;";
        assert_eq!(derive_name(code, None), "Exported");

        assert_eq!(derive_name("const Card: React.FC<Props> = () => null;", None), "Card");
        assert_eq!(derive_name("class Store {}", None), "Store");
    }

    #[test]
    fn placeholder_when_nothing_matches() {
        assert_eq!(derive_name("<div>hello</div>", None), PLACEHOLDER_NAME);
        assert_eq!(derive_name("x", Some("///")), PLACEHOLDER_NAME);
    }

    #[test]
    fn prompt_nouns() {
        assert_eq!(prompt_noun("Create a simple button component").as_deref(), Some("Button"));
        assert_eq!(prompt_noun("Build me some todos").as_deref(), Some("Todo"));
        assert_eq!(prompt_noun("hello world"), None);
    }

    #[test]
    fn pascal() {
        assert_eq!(pascal_case("user-profile_card"), "UserProfileCard");
        assert_eq!(pascal_case(""), "");
    }

    #[test]
    fn allocator_suffixes_collisions() {
        let mut alloc = PathAllocator::default();
        assert_eq!(alloc.allocate("src/components", "Component", "tsx"), "src/components/Component.tsx");
        assert_eq!(alloc.allocate("src/components", "Component", "tsx"), "src/components/Component2.tsx");
        assert!(!alloc.reserve("src/components/Component.tsx"));
    }

    #[test]
    fn allocator_normalizes_folder() {
        let mut alloc = PathAllocator::default();
        assert_eq!(alloc.allocate("src/components/", "Card", "tsx"), "src/components/Card.tsx");
        assert_eq!(alloc.allocate("", "index", "js"), "index.js");
        assert_eq!(alloc.allocate("./", "index", "js"), "index2.js");
    }
}
