//! Nested-conditional detection
//!
//! With a syntax tree, each conditional's depth is the deepest chain of
//! conditionals reachable beneath it, counting itself. Else-if chains are
//! continuations, not nesting. Once a conditional is reported its subtree is
//! not searched again, so one nest yields one finding.
//!
//! Without a tree (no grammar, or a source that does not parse) a stack of
//! open conditional scopes is tracked instead, keyed by brace depth or by
//! indentation. Each uninterrupted run of open conditionals whose peak
//! height reaches the threshold yields one finding.

use super::AdviceFamily;
use crate::config::NestingThresholds;
use crate::language::{BlockStyle, Language};
use crate::models::{NestedConditionalFinding, Severity, NESTED_CONDITIONALS};
use crate::syntax::{walk, StructuralAnalyzer, StructuralView, SyntaxTree, Walk};
use lazy_static::lazy_static;
use refactai_utils::indent_width;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref CONTINUATION_LINE: Regex =
        Regex::new(r"^\s*(?:else\s+if|elif|elsif|else)\b").expect("valid continuation regex");
    static ref CONDITIONAL_LINE: Regex =
        Regex::new(r"^\s*(?:if|unless)\b").expect("valid conditional regex");
}

/// Reports conditionals nested at or beyond the configured depth
#[derive(Debug, Clone, Copy, Default)]
pub struct NestingDetector {
    thresholds: NestingThresholds,
}

impl NestingDetector {
    pub fn new(thresholds: NestingThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> NestingThresholds {
        self.thresholds
    }

    /// Findings for a source text, ordered by first line
    pub fn detect(&self, source: &str, language: Language) -> Vec<NestedConditionalFinding> {
        let mut findings = match StructuralAnalyzer::view(source, language) {
            StructuralView::Tree(tree) => return self.detect_tree(&tree),
            StructuralView::Broken(error) => {
                debug!("Scanning unparseable {} source for nesting: {}", language, error);
                self.scan(source, language)
            }
            StructuralView::Text => self.scan(source, language),
        };
        findings.sort_by_key(|finding| finding.line_start);
        findings
    }

    /// Findings from an already parsed tree
    pub fn detect_tree(&self, tree: &SyntaxTree<'_>) -> Vec<NestedConditionalFinding> {
        let grammar = tree.grammar();
        let text = AdviceFamily::of(tree.language()).finding_text();
        let mut findings = Vec::new();

        walk(tree.root(), |node| {
            if !grammar.is_conditional(node.kind()) {
                return Walk::Continue;
            }
            let depth = 1 + tree.conditional_depth_below(node);
            if depth < self.thresholds.min_depth {
                return Walk::Continue;
            }
            findings.push(self.finding(
                node.start_position().row + 1,
                node.end_position().row + 1,
                depth,
                text,
            ));
            Walk::SkipChildren
        });

        findings.sort_by_key(|finding| finding.line_start);
        findings
    }

    fn scan(&self, source: &str, language: Language) -> Vec<NestedConditionalFinding> {
        let runs = match language.block_style() {
            BlockStyle::Braces => scan_braces(source),
            BlockStyle::Indentation => scan_indentation(source),
        };
        let text = AdviceFamily::of(language).finding_text();

        runs.into_iter()
            .filter(|run| run.peak >= self.thresholds.min_depth)
            .map(|run| self.finding(run.start, run.end, run.peak, text))
            .collect()
    }

    fn finding(&self, line_start: usize, line_end: usize, depth: usize, text: &str) -> NestedConditionalFinding {
        NestedConditionalFinding {
            line_start,
            line_end: line_end.max(line_start),
            depth,
            severity: Severity::for_depth(depth, self.thresholds.high_severity_depth),
            suggestion: text.to_string(),
            pattern: NESTED_CONDITIONALS.to_string(),
        }
    }
}

/// An uninterrupted stretch with at least one conditional scope open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    start: usize,
    end: usize,
    peak: usize,
}

/// Tracks open conditional scopes and the runs they form
#[derive(Debug, Default)]
struct ScopeStack<K> {
    open: Vec<K>,
    run: Option<Run>,
    runs: Vec<Run>,
}

impl<K: Copy> ScopeStack<K> {
    fn push(&mut self, key: K, line: usize) {
        self.open.push(key);
        let height = self.open.len();
        let run = self.run.get_or_insert(Run { start: line, end: line, peak: 0 });
        run.peak = run.peak.max(height);
        run.end = run.end.max(line);
    }

    fn pop_while(&mut self, mut should_pop: impl FnMut(K) -> bool) {
        while self.open.last().is_some_and(|key| should_pop(*key)) {
            self.open.pop();
        }
    }

    fn touch(&mut self, line: usize) {
        if let Some(run) = self.run.as_mut() {
            run.end = run.end.max(line);
        }
    }

    /// Close the current run if every scope is closed
    fn settle(&mut self) {
        if self.open.is_empty() {
            if let Some(run) = self.run.take() {
                self.runs.push(run);
            }
        }
    }

    fn finish(mut self) -> Vec<Run> {
        if let Some(run) = self.run.take() {
            self.runs.push(run);
        }
        self.runs
    }
}

/// Conditional scopes in brace-delimited source
///
/// An `if` becomes pending and opens a scope at the next `{` outside
/// parentheses; a `;` first means a brace-less body. The scope closes with
/// its brace.
fn scan_braces(source: &str) -> Vec<Run> {
    let chars: Vec<char> = source.chars().collect();
    let mut stack: ScopeStack<usize> = ScopeStack::default();
    let mut line = 1;
    let mut braces = 0usize;
    let mut parens = 0usize;
    let mut pending: Option<usize> = None;
    let mut previous_significant = '\n';
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            '\n' => {
                line += 1;
                i += 1;
                continue;
            }
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        line += 1;
                    }
                    i += 1;
                }
                i += 2;
                continue;
            }
            '"' | '\'' | '`' => {
                i += 1;
                while i < chars.len() && chars[i] != c {
                    if chars[i] == '\\' {
                        i += 1;
                    } else if chars[i] == '\n' {
                        if c != '`' {
                            break;
                        }
                        line += 1;
                    }
                    i += 1;
                }
                if chars.get(i) == Some(&c) {
                    i += 1;
                }
                previous_significant = c;
                continue;
            }
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            ';' if parens == 0 => pending = None,
            '{' => {
                braces += 1;
                if parens == 0 {
                    if let Some(opened_at) = pending.take() {
                        stack.push(braces, opened_at);
                    }
                }
                stack.touch(line);
            }
            '}' => {
                stack.touch(line);
                let closing = braces;
                stack.pop_while(|depth| depth >= closing);
                braces = braces.saturating_sub(1);
                stack.settle();
            }
            _ if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if word == "if" && previous_significant != '#' {
                    pending = Some(line);
                }
                previous_significant = 'w';
                continue;
            }
            _ => {}
        }

        if !c.is_whitespace() {
            previous_significant = c;
        }
        i += 1;
    }

    stack.finish()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Conditional scopes in indentation-delimited source
///
/// A conditional line closes every scope at or beyond its indentation and
/// opens its own. An else/elif line continues the scope at its indentation.
/// Any other line closes scopes at or beyond its indentation.
fn scan_indentation(source: &str) -> Vec<Run> {
    let mut stack: ScopeStack<usize> = ScopeStack::default();

    for (index, raw) in source.split('\n').enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = indent_width(raw);

        if CONTINUATION_LINE.is_match(raw) {
            stack.pop_while(|open| open > indent);
            stack.settle();
            stack.touch(line);
        } else if CONDITIONAL_LINE.is_match(raw) {
            stack.pop_while(|open| open >= indent);
            stack.settle();
            stack.push(indent, line);
        } else {
            stack.pop_while(|open| open >= indent);
            stack.settle();
            stack.touch(line);
        }
    }

    stack.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(source: &str, language: Language) -> Vec<NestedConditionalFinding> {
        NestingDetector::default().detect(source, language)
    }

    const PYTHON_FOUR_DEEP: &str = "\
def check(a, b, c, d):
    if a:
        if b:
            if c:
                if d:
                    return True
    return False
";

    #[test]
    fn test_python_four_levels() {
        let findings = detect(PYTHON_FOUR_DEEP, Language::Python);
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.depth, 4);
        assert_eq!(finding.severity, Severity::High);
        assert_eq!((finding.line_start, finding.line_end), (2, 6));
        assert_eq!(finding.pattern, "nested_conditionals");
        assert_eq!(
            finding.suggestion,
            "Extract nested conditions into separate functions or use guard clauses"
        );
    }

    #[test]
    fn test_two_levels_are_not_reported() {
        let source = "if a:\n    if b:\n        pass\n";
        assert!(detect(source, Language::Python).is_empty());
        assert!(detect("if (a) { if (b) { go(); } }", Language::JavaScript).is_empty());
    }

    #[test]
    fn test_three_levels_are_medium() {
        let source = "class A {\n  void f() {\n    if (a) {\n      if (b) {\n        if (c) {\n          g();\n        }\n      }\n    }\n  }\n}\n";
        let findings = detect(source, Language::Java);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 3);
        assert_eq!(findings[0].severity, Severity::Medium);
        assert_eq!(
            findings[0].suggestion,
            "Extract nested conditions into separate methods or use early returns"
        );
    }

    #[test]
    fn test_else_if_chain_is_not_nesting() {
        let source = "\
function grade(n) {
  if (n > 90) {
    return 'a';
  } else if (n > 80) {
    return 'b';
  } else if (n > 70) {
    return 'c';
  } else {
    return 'f';
  }
}
";
        assert!(detect(source, Language::JavaScript).is_empty());

        let python = "if a:\n    x = 1\nelif b:\n    x = 2\nelif c:\n    x = 3\nelse:\n    x = 4\n";
        assert!(detect(python, Language::Python).is_empty());
    }

    #[test]
    fn test_separate_nests_give_separate_findings() {
        let nest = "if a:\n    if b:\n        if c:\n            pass\n";
        let source = format!("{nest}x = 1\n{nest}");
        let findings = detect(&source, Language::Python);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line_start, 1);
        assert_eq!(findings[1].line_start, 6);
    }

    #[test]
    fn test_rust_if_expressions() {
        let source = "fn f(a: bool, b: bool, c: bool) {\n    if a {\n        if b {\n            if c {\n                run();\n            }\n        }\n    }\n}\n";
        let findings = detect(source, Language::Rust);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 3);
    }

    #[test]
    fn test_brace_scanner_for_c() {
        let source = "\
int f(int a, int b, int c, int d) {
    if (a) {
        if (b) {
            /* if (fake) { */
            if (c) {
                if (d) { return 1; }
            }
        }
    }
    return 0;
}
";
        let findings = detect(source, Language::C);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 4);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!((findings[0].line_start, findings[0].line_end), (2, 9));
        assert_eq!(findings[0].suggestion, "Consider refactoring nested conditions");
    }

    #[test]
    fn test_brace_scanner_ignores_strings_and_braceless_ifs() {
        let source = "\
if (a) {
    if (b) return;
    printf(\"if (x) {\");
    if (c) {
        if (d) {
            go();
        }
    }
}
";
        let findings = detect(source, Language::Cpp);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 3);
    }

    #[test]
    fn test_preprocessor_if_is_ignored() {
        let source = "#if DEBUG\nif (a) {\n  if (b) {\n  }\n}\n#endif\n";
        assert!(detect(source, Language::C).is_empty());
    }

    #[test]
    fn test_indentation_scanner_for_ruby() {
        let source = "\
def check(a, b, c)
  if a
    if b
      unless c
        puts 'deep'
      end
    end
  end
end
";
        let findings = detect(source, Language::Ruby);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 3);
        assert_eq!(findings[0].line_start, 2);
    }

    #[test]
    fn test_unparseable_python_uses_indentation() {
        let source = "\
def check(a, b, c:
    if a:
        if b:
            if c:
                pass
";
        let findings = detect(source, Language::Python);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].depth, 3);
        assert_eq!((findings[0].line_start, findings[0].line_end), (2, 5));
    }

    #[test]
    fn test_configured_threshold() {
        let detector = NestingDetector::new(NestingThresholds { min_depth: 2, high_severity_depth: 2 });
        let findings = detector.detect("if a:\n    if b:\n        pass\n", Language::Python);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
    }

    #[test]
    fn test_empty_source() {
        assert!(detect("", Language::Python).is_empty());
        assert!(detect("", Language::Unknown).is_empty());
    }
}
