//! Package dependency detection
//!
//! Scans import statements with regexes; only bare package specifiers count.

use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT_FROM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(?:import|export)\s[^;'"]*?\bfrom\s*['"]([^'"]+)['"]"#)
        .expect("valid import regex")
});

static IMPORT_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*import\s*['"]([^'"]+)['"]"#)
        .expect("valid bare import regex")
});

static REQUIRE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#)
        .expect("valid require regex")
});

/// Reduce an import specifier to its package root
///
/// Returns `None` for relative, absolute, alias and `node:` specifiers.
#[must_use]
pub fn package_root(specifier: &str) -> Option<String> {
    let spec = specifier.trim();
    if spec.is_empty()
        || spec.starts_with('.')
        || spec.starts_with('/')
        || spec.starts_with('~')
        || spec.starts_with("@/")
        || spec.starts_with("node:")
    {
        return None;
    }

    let mut parts = spec.split('/');
    let first = parts.next()?;
    if first.starts_with('@') {
        let second = parts.next().filter(|s| !s.is_empty())?;
        Some(format!("{first}/{second}"))
    } else {
        Some(first.to_string())
    }
}

/// Detect package dependencies in source text, in order of first appearance
#[must_use]
pub fn detect_dependencies(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for re in [&*IMPORT_FROM, &*IMPORT_BARE, &*REQUIRE] {
        for caps in re.captures_iter(source) {
            if let Some(m) = caps.get(1) {
                if let Some(root) = package_root(m.as_str()) {
                    found.push((m.start(), root));
                }
            }
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    let mut deps: Vec<String> = Vec::with_capacity(found.len());
    for (_, dep) in found {
        if !deps.contains(&dep) {
            deps.push(dep);
        }
    }
    deps
}
