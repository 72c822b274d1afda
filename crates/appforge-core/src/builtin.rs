//! Local heuristic collaborators
//!
//! Offline stand-ins for the validator, quality analyzer and optimizer
//! services. They work on text alone and never fail.

use crate::collaborators::{
    CodeOptimizer, OptimizeOptions, Optimization, QualityAnalyzer, QualityReport, StaticValidator, ValidationReport,
};
use crate::error::CollaboratorError;
use appforge_artifact::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static CONSOLE_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*console\.(?:log|debug)\(.*\);?\s*$").expect("console pattern")
});

/// Points removed per validation issue
const ISSUE_PENALTY: f64 = 25.0;

/// Lines longer than this count against quality
const LONG_LINE: usize = 120;

/// Nesting deeper than this counts against quality
const NESTING_BUDGET: usize = 4;

/// Opening delimiter that was never closed, or a stray closer
#[derive(Debug, Clone, PartialEq, Eq)]
enum Imbalance {
    Unclosed { open: char, line: usize },
    Mismatched { expected: char, found: char, line: usize },
    Stray { found: char, line: usize },
}

impl std::fmt::Display for Imbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Imbalance::Unclosed { open, line } => write!(f, "unclosed `{open}` opened on line {line}"),
            Imbalance::Mismatched { expected, found, line } => {
                write!(f, "expected `{expected}` but found `{found}` on line {line}")
            }
            Imbalance::Stray { found, line } => write!(f, "unexpected `{found}` on line {line}"),
        }
    }
}

/// Delimiter scan result: first imbalance and deepest nesting
#[derive(Debug, Default)]
struct Scan {
    imbalance: Option<Imbalance>,
    max_depth: usize,
}

fn closer(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// Scan `()[]{}` outside strings and comments
fn scan_delimiters(source: &str) -> Scan {
    let mut scan = Scan::default();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        if let Some(q) = quote {
            if c == '\\' {
                if chars.next() == Some('\n') {
                    line += 1;
                }
            } else if c == q || (c == '\n' && q != '`') {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for next in chars.by_ref() {
                    if next == '\n' {
                        line += 1;
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            '(' | '[' | '{' => {
                stack.push((c, line));
                scan.max_depth = scan.max_depth.max(stack.len());
            }
            ')' | ']' | '}' => match stack.pop() {
                Some((open, _)) if closer(open) == c => {}
                Some((open, _)) => {
                    scan.imbalance.get_or_insert(Imbalance::Mismatched {
                        expected: closer(open),
                        found: c,
                        line,
                    });
                }
                None => {
                    scan.imbalance.get_or_insert(Imbalance::Stray { found: c, line });
                }
            },
            _ => {}
        }
    }

    if let Some((open, line)) = stack.first() {
        scan.imbalance.get_or_insert(Imbalance::Unclosed { open: *open, line: *line });
    }
    scan
}

fn uses_braces(language: Language) -> bool {
    matches!(
        language,
        Language::TypeScript | Language::JavaScript | Language::Css | Language::Scss | Language::Json | Language::Rust | Language::Go
    )
}

/// Static validator: emptiness, leftover fences, delimiter balance, JSON syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicValidator;

impl HeuristicValidator {
    /// Issues found in one source text
    #[must_use]
    pub fn issues(source: &str, language: Language) -> Vec<String> {
        let mut issues = Vec::new();
        if source.trim().is_empty() {
            issues.push("file is empty".to_string());
            return issues;
        }
        if source.lines().any(|l| l.trim_start().starts_with("```")) {
            issues.push("contains a markdown code fence".to_string());
        }
        if language == Language::Json {
            if let Err(e) = serde_json::from_str::<serde_json::Value>(source) {
                issues.push(format!("invalid JSON: {e}"));
            }
        } else if uses_braces(language) {
            if let Some(imbalance) = scan_delimiters(source).imbalance {
                issues.push(format!("unbalanced delimiters: {imbalance}"));
            }
        }
        issues
    }
}

#[async_trait::async_trait]
impl StaticValidator for HeuristicValidator {
    async fn validate(&self, source: &str, language: Language) -> Result<ValidationReport, CollaboratorError> {
        let issues = Self::issues(source, language);
        #[allow(clippy::cast_precision_loss)]
        let score = (100.0 - ISSUE_PENALTY * issues.len() as f64).max(0.0);
        Ok(ValidationReport {
            is_valid: issues.is_empty(),
            score,
            issues,
        })
    }
}

/// Quality analyzer over line length, comment ratio, nesting and size
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicQualityAnalyzer;

impl HeuristicQualityAnalyzer {
    /// Score one source text (0-100)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn report(source: &str, language: Language) -> QualityReport {
        let lines: Vec<&str> = source.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return QualityReport {
                overall_score: 0.0,
                metrics: BTreeMap::from([("lines".to_string(), 0.0)]),
            };
        }

        let total = lines.len() as f64;
        let long = lines.iter().filter(|l| l.chars().count() > LONG_LINE).count() as f64;
        let comments = lines
            .iter()
            .map(|l| l.trim_start())
            .filter(|l| l.starts_with("//") || l.starts_with("/*") || l.starts_with('*') || l.starts_with('#'))
            .count() as f64;
        let depth = if uses_braces(language) {
            scan_delimiters(source).max_depth
        } else {
            0
        };

        let long_ratio = long / total;
        let comment_ratio = comments / total;
        let mut score = 100.0 - long_ratio * 30.0;
        score -= (depth.saturating_sub(NESTING_BUDGET) as f64 * 5.0).min(25.0);
        if total > 40.0 && comment_ratio == 0.0 {
            score -= 10.0;
        }
        if comment_ratio > 0.5 {
            score -= 10.0;
        }
        if total > 400.0 {
            score -= 15.0;
        }

        QualityReport {
            overall_score: score.clamp(0.0, 100.0),
            metrics: BTreeMap::from([
                ("lines".to_string(), total),
                ("long_line_ratio".to_string(), long_ratio),
                ("comment_ratio".to_string(), comment_ratio),
                ("max_nesting".to_string(), depth as f64),
            ]),
        }
    }
}

#[async_trait::async_trait]
impl QualityAnalyzer for HeuristicQualityAnalyzer {
    async fn analyze(&self, source: &str, language: Language) -> Result<QualityReport, CollaboratorError> {
        Ok(Self::report(source, language))
    }
}

/// Optimizer that normalizes whitespace and strips debug noise
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceOptimizer;

impl WhitespaceOptimizer {
    /// Rewrite one source text
    #[must_use]
    pub fn rewrite(source: &str, options: &OptimizeOptions) -> Optimization {
        let mut changes = Vec::new();
        let script = options.language.is_script();
        let mut lines: Vec<String> = source.lines().map(str::to_string).collect();

        if options.remove_console && script {
            let before = lines.len();
            lines.retain(|l| !CONSOLE_CALL.is_match(l));
            if lines.len() < before {
                changes.push(format!("removed {} console calls", before - lines.len()));
            }
        }

        if options.remove_comments && script {
            let before = lines.len();
            lines.retain(|l| {
                let t = l.trim_start();
                !t.starts_with("//") || t.starts_with("///")
            });
            if lines.len() < before {
                changes.push(format!("removed {} comment lines", before - lines.len()));
            }
        }

        if options.format {
            let mut trimmed = 0;
            for line in &mut lines {
                let end = line.trim_end().len();
                if end < line.len() {
                    line.truncate(end);
                    trimmed += 1;
                }
            }
            if trimmed > 0 {
                changes.push(format!("trimmed trailing whitespace on {trimmed} lines"));
            }

            let before = lines.len();
            let mut collapsed: Vec<String> = Vec::with_capacity(lines.len());
            for line in lines {
                let blank = line.is_empty();
                if blank && collapsed.last().map_or(true, String::is_empty) {
                    continue;
                }
                collapsed.push(line);
            }
            while collapsed.last().is_some_and(String::is_empty) {
                collapsed.pop();
            }
            if collapsed.len() < before {
                changes.push(format!("removed {} redundant blank lines", before - collapsed.len()));
            }
            lines = collapsed;
        }

        let mut optimized_code = lines.join("\n");
        if !optimized_code.is_empty() {
            optimized_code.push('\n');
        }
        if options.format && !source.ends_with('\n') && !optimized_code.is_empty() {
            changes.push("added final newline".to_string());
        }
        if !options.format && !source.ends_with('\n') {
            optimized_code.pop();
        }

        Optimization { optimized_code, changes }
    }
}

#[async_trait::async_trait]
impl CodeOptimizer for WhitespaceOptimizer {
    async fn optimize(&self, source: &str, options: &OptimizeOptions) -> Result<Optimization, CollaboratorError> {
        Ok(Self::rewrite(source, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(format: bool, remove_console: bool, remove_comments: bool) -> OptimizeOptions {
        OptimizeOptions {
            language: Language::TypeScript,
            format,
            remove_console,
            remove_comments,
        }
    }

    #[tokio::test]
    async fn validator_accepts_balanced_source() {
        let source = "export function f(a: string[]) {\n  const s = \"}{\"; // )\n  return [a];\n}\n";
        let report = HeuristicValidator.validate(source, Language::TypeScript).await.unwrap();
        assert!(report.is_valid, "{:?}", report.issues);
        assert_eq!(report.score, 100.0);
    }

    #[test]
    fn validator_reports_problems() {
        let issues = HeuristicValidator::issues("function f() {\n  return (1;\n}\n", Language::JavaScript);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("expected `)` but found `}` on line 3"), "{issues:?}");

        let issues = HeuristicValidator::issues("```tsx\nconst a = 1;\n```\n", Language::TypeScript);
        assert_eq!(issues, vec!["contains a markdown code fence".to_string()]);

        let issues = HeuristicValidator::issues("const a = 1;\nconst b = {\n", Language::TypeScript);
        assert!(issues[0].contains("unclosed `{` opened on line 2"), "{issues:?}");

        assert_eq!(HeuristicValidator::issues("  \n", Language::Css), vec!["file is empty".to_string()]);
        assert!(HeuristicValidator::issues("{\"a\": }", Language::Json)[0].starts_with("invalid JSON"));
        assert!(HeuristicValidator::issues("# Title (draft", Language::Markdown).is_empty());
    }

    #[test]
    fn quality_penalizes_deep_nesting() {
        let flat = "export const a = 1;\nexport const b = 2;\n";
        let deep = "a({[({[({})]})]});\n";
        let flat_score = HeuristicQualityAnalyzer::report(flat, Language::TypeScript).overall_score;
        let deep_report = HeuristicQualityAnalyzer::report(deep, Language::TypeScript);

        assert_eq!(flat_score, 100.0);
        assert_eq!(deep_report.metrics["max_nesting"], 8.0);
        assert!(deep_report.overall_score < flat_score);
        assert_eq!(HeuristicQualityAnalyzer::report("", Language::TypeScript).overall_score, 0.0);
    }

    #[test]
    fn optimizer_normalizes_whitespace() {
        let source = "const a = 1;   \n\n\n\nconsole.log(a);\n// note\nexport default a;";
        let result = WhitespaceOptimizer::rewrite(source, &options(true, true, true));

        assert_eq!(result.optimized_code, "const a = 1;\n\nexport default a;\n");
        assert!(result.changes.iter().any(|c| c == "removed 1 console calls"));
        assert!(result.changes.iter().any(|c| c == "removed 1 comment lines"));
        assert!(result.changes.iter().any(|c| c == "added final newline"));
    }

    #[test]
    fn optimizer_is_noop_on_clean_source() {
        let source = "export const a = 1;\n";
        let result = WhitespaceOptimizer::rewrite(source, &options(true, false, false));
        assert_eq!(result.optimized_code, source);
        assert!(result.changes.is_empty());

        let css = OptimizeOptions {
            language: Language::Css,
            ..options(false, true, true)
        };
        let result = WhitespaceOptimizer::rewrite("// keep\nconsole.log(1);", &css);
        assert_eq!(result.optimized_code, "// keep\nconsole.log(1);");
    }
}
