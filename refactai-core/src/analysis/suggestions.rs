//! Refactoring suggestions for nesting findings
//!
//! Suggestions are advice only. Each one carries the flagged snippet and an
//! example in the idiom of the finding's language. When the snippet is a
//! straight chain of nested `if`s, the example is that chain rewritten as
//! guard clauses; otherwise it is a generic extract-predicate template.

use super::AdviceFamily;
use crate::language::Language;
use crate::models::{NestedConditionalFinding, RefactorSuggestion, SuggestionKind};
use lazy_static::lazy_static;
use refactai_utils::{indent_width, is_blank};
use regex::Regex;

lazy_static! {
    static ref PYTHON_IF: Regex = Regex::new(r"^\s*if\s+(.+):\s*$").expect("valid python if regex");
    static ref PAREN_IF: Regex = Regex::new(r"^\s*if\s*\((.+)\)\s*\{\s*$").expect("valid braced if regex");
    static ref RUST_IF: Regex = Regex::new(r"^\s*if\s+(.+?)\s*\{\s*$").expect("valid rust if regex");
    static ref SIMPLE_OPERAND: Regex = Regex::new(r"^[\w.]+$").expect("valid operand regex");
}

const PYTHON_EXAMPLE: &str = "\
# Instead of:
if condition1:
    if condition2:
        if condition3:
            do_something()

# Use:
def is_valid_scenario(data):
    return condition1 and condition2 and condition3

if is_valid_scenario(data):
    do_something()";

const JAVA_EXAMPLE: &str = "\
// Instead of:
if (condition1) {
    if (condition2) {
        if (condition3) {
            doSomething();
        }
    }
}

// Use:
private boolean isValidScenario() {
    return condition1 && condition2 && condition3;
}

if (isValidScenario()) {
    doSomething();
}";

const JAVASCRIPT_EXAMPLE: &str = "\
// Instead of:
if (condition1) {
    if (condition2) {
        if (condition3) {
            doSomething();
        }
    }
}

// Use:
function isValidScenario() {
    return condition1 && condition2 && condition3;
}

if (isValidScenario()) {
    doSomething();
}";

const RUST_EXAMPLE: &str = "\
// Instead of:
if condition1 {
    if condition2 {
        if condition3 {
            do_something();
        }
    }
}

// Use:
fn is_valid_scenario(data: &Data) -> bool {
    condition1 && condition2 && condition3
}

if is_valid_scenario(&data) {
    do_something();
}";

/// Template shared by every suggestion of one language family
struct Template {
    kind: SuggestionKind,
    suggestion: &'static str,
    example: Option<&'static str>,
    benefits: &'static [&'static str],
}

fn template_for(language: Language) -> Template {
    match AdviceFamily::of(language) {
        AdviceFamily::Python => Template {
            kind: SuggestionKind::ExtractMethod,
            suggestion: "Extract nested conditions into separate functions with descriptive names",
            example: Some(PYTHON_EXAMPLE),
            benefits: &["Improved readability", "Better testability", "Reduced complexity"],
        },
        AdviceFamily::JavaLike => Template {
            kind: SuggestionKind::ExtractMethod,
            suggestion: "Extract nested conditions into private methods with meaningful names",
            example: Some(JAVA_EXAMPLE),
            benefits: &["Improved readability", "Better testability", "Reduced cyclomatic complexity"],
        },
        AdviceFamily::JavaScript => Template {
            kind: SuggestionKind::ExtractFunction,
            suggestion: "Extract nested conditions into separate functions or use early returns",
            example: Some(JAVASCRIPT_EXAMPLE),
            benefits: &["Improved readability", "Better maintainability", "Easier debugging"],
        },
        AdviceFamily::Rust => Template {
            kind: SuggestionKind::ExtractFunction,
            suggestion: "Extract nested conditions into a predicate function or use early returns",
            example: Some(RUST_EXAMPLE),
            benefits: &["Improved readability", "Better testability", "Reduced complexity"],
        },
        AdviceFamily::Generic => Template {
            kind: SuggestionKind::SimplifyConditionals,
            suggestion: "Consider simplifying nested conditional logic",
            example: None,
            benefits: &["Improved readability", "Reduced complexity"],
        },
    }
}

/// One suggestion per finding, in finding order
pub fn suggest_refactors(
    source: &str,
    language: Language,
    findings: &[NestedConditionalFinding],
) -> Vec<RefactorSuggestion> {
    let template = template_for(language);
    let lines: Vec<&str> = source.split('\n').collect();

    findings
        .iter()
        .map(|finding| {
            let original_code = snippet(&lines, finding.line_start, finding.line_end);
            let example = guard_clause_example(&original_code, AdviceFamily::of(language))
                .or_else(|| template.example.map(str::to_string));
            RefactorSuggestion {
                kind: template.kind,
                original_code,
                suggestion: template.suggestion.to_string(),
                example,
                benefits: template.benefits.iter().map(|b| (*b).to_string()).collect(),
                line_range: (finding.line_start, finding.line_end),
            }
        })
        .collect()
}

/// The snippet's nested `if` chain turned into early returns.
///
/// Only a straight chain qualifies: every `if` must open directly inside the
/// previous one, and the innermost body must be non-empty.
fn guard_clause_example(code: &str, family: AdviceFamily) -> Option<String> {
    let header = match family {
        AdviceFamily::Python => &*PYTHON_IF,
        AdviceFamily::JavaLike | AdviceFamily::JavaScript => &*PAREN_IF,
        AdviceFamily::Rust => &*RUST_IF,
        AdviceFamily::Generic => return None,
    };
    let lines: Vec<&str> = code.lines().filter(|line| !is_blank(line)).collect();

    let mut conditions = Vec::new();
    let mut depth = None;
    let mut body_start = lines.len();
    for (i, line) in lines.iter().enumerate() {
        let indent = indent_width(line);
        match header.captures(line) {
            Some(captures) if depth.map_or(true, |d| indent > d) => {
                conditions.push(captures[1].trim().to_string());
                depth = Some(indent);
            }
            _ => {
                body_start = i;
                break;
            }
        }
    }
    let depth = depth?;
    if conditions.len() < 2 || conditions.iter().any(|c| c.starts_with("let ")) {
        return None;
    }

    let body: Vec<&str> = lines[body_start..].iter().take_while(|line| indent_width(line) > depth).copied().collect();
    let margin = body.iter().map(|line| indent_width(line)).min()?;

    let comment = if family == AdviceFamily::Python { "#" } else { "//" };
    let mut example = format!("{comment} Instead of:\n{}\n\n{comment} Use guard clauses:\n", dedent(code));
    for condition in &conditions {
        example.push_str(&guard(family, condition));
        example.push('\n');
    }
    for line in body {
        example.push_str(&strip_columns(line, margin));
        example.push('\n');
    }
    example.truncate(example.trim_end().len());
    Some(example)
}

/// An early return taken when `condition` does not hold
fn guard(family: AdviceFamily, condition: &str) -> String {
    let simple = SIMPLE_OPERAND.is_match(condition);
    match family {
        AdviceFamily::Python if simple => format!("if not {condition}:\n    return"),
        AdviceFamily::Python => format!("if not ({condition}):\n    return"),
        AdviceFamily::Rust if simple => format!("if !{condition} {{\n    return;\n}}"),
        AdviceFamily::Rust => format!("if !({condition}) {{\n    return;\n}}"),
        _ if simple => format!("if (!{condition}) {{\n    return;\n}}"),
        _ => format!("if (!({condition})) {{\n    return;\n}}"),
    }
}

/// Remove the indentation shared by every non-blank line
fn dedent(code: &str) -> String {
    let margin = code.lines().filter(|line| !is_blank(line)).map(indent_width).min().unwrap_or(0);
    code.lines().map(|line| strip_columns(line, margin)).collect::<Vec<_>>().join("\n")
}

/// Drop up to `columns` columns of leading whitespace, tabs counting four
fn strip_columns(line: &str, columns: usize) -> String {
    let mut width = 0;
    let mut cut = 0;
    for (offset, c) in line.char_indices() {
        if width >= columns || !matches!(c, ' ' | '\t') {
            break;
        }
        width += if c == '\t' { 4 } else { 1 };
        cut = offset + c.len_utf8();
    }
    line[cut..].to_string()
}

/// Lines `start..=end` (1-based), cut short at the end of the source
fn snippet(lines: &[&str], start: usize, end: usize) -> String {
    let from = start.saturating_sub(1).min(lines.len());
    let to = end.min(lines.len()).max(from);
    lines[from..to].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::NestingDetector;

    const SOURCE: &str = "\
def check(a, b, c):
    if a:
        if b:
            if c:
                return True
    return False
";

    #[test]
    fn test_python_suggestion() {
        let findings = NestingDetector::default().detect(SOURCE, Language::Python);
        let suggestions = suggest_refactors(SOURCE, Language::Python, &findings);

        assert_eq!(suggestions.len(), 1);
        let suggestion = &suggestions[0];
        assert_eq!(suggestion.kind, SuggestionKind::ExtractMethod);
        assert_eq!(suggestion.line_range, (2, 5));
        assert!(suggestion.original_code.starts_with("    if a:"));
        assert!(suggestion.original_code.ends_with("return True"));
        assert_eq!(
            suggestion.example.as_deref(),
            Some(
                "# Instead of:\nif a:\n    if b:\n        if c:\n            return True\n\n\
                 # Use guard clauses:\nif not a:\n    return\nif not b:\n    return\nif not c:\n    return\nreturn True"
            )
        );
        assert_eq!(suggestion.benefits.len(), 3);
    }

    #[test]
    fn test_javascript_guard_clauses_use_own_conditions() {
        let source = "\
function save(user, form) {
  if (user) {
    if (user.active && !user.banned) {
      if (form.valid) {
        store(form);
        notify(user);
      }
    }
  }
}
";
        let findings = NestingDetector::default().detect(source, Language::JavaScript);
        let suggestions = suggest_refactors(source, Language::JavaScript, &findings);
        let example = suggestions[0].example.as_deref().unwrap_or("");
        println!("{example}");

        assert!(example.starts_with("// Instead of:\nif (user) {"));
        assert!(example.ends_with(
            "// Use guard clauses:\nif (!user) {\n    return;\n}\nif (!(user.active && !user.banned)) {\n    return;\n}\n\
             if (!form.valid) {\n    return;\n}\nstore(form);\nnotify(user);"
        ));
    }

    #[test]
    fn test_branching_nest_falls_back_to_template() {
        let source = "\
def check(a, b, c):
    if a:
        log(a)
        if b:
            if c:
                return True
    return False
";
        let findings = NestingDetector::default().detect(source, Language::Python);
        let suggestions = suggest_refactors(source, Language::Python, &findings);
        assert!(suggestions[0].example.as_deref().is_some_and(|e| e.contains("def is_valid_scenario")));
    }

    #[test]
    fn test_rust_if_let_is_not_negated() {
        let code = "if let Some(x) = a {\n    if x > 1 {\n        go();\n    }\n}";
        assert_eq!(guard_clause_example(code, AdviceFamily::Rust), None);
        let code = "if ready {\n    if x > 1 {\n        go();\n    }\n}";
        assert_eq!(
            guard_clause_example(code, AdviceFamily::Rust).as_deref(),
            Some("// Instead of:\nif ready {\n    if x > 1 {\n        go();\n    }\n}\n\n// Use guard clauses:\nif !ready {\n    return;\n}\nif !(x > 1) {\n    return;\n}\ngo();")
        );
    }

    #[test]
    fn test_generic_suggestion_has_no_example() {
        let finding = NestedConditionalFinding {
            line_start: 1,
            line_end: 2,
            depth: 3,
            severity: crate::models::Severity::Medium,
            suggestion: String::new(),
            pattern: crate::models::NESTED_CONDITIONALS.to_string(),
        };
        let suggestions = suggest_refactors("a\nb\nc\n", Language::Go, &[finding]);
        assert_eq!(suggestions[0].kind, SuggestionKind::SimplifyConditionals);
        assert_eq!(suggestions[0].example, None);
        assert_eq!(suggestions[0].original_code, "a\nb");
    }

    #[test]
    fn test_javascript_and_java_templates() {
        assert_eq!(template_for(Language::Tsx).kind, SuggestionKind::ExtractFunction);
        assert!(template_for(Language::Java).example.is_some_and(|e| e.contains("isValidScenario")));
        assert_eq!(
            template_for(Language::JavaScript).benefits,
            &["Improved readability", "Better maintainability", "Easier debugging"]
        );
    }

    #[test]
    fn test_snippet_is_clipped_to_source() {
        let lines = vec!["one", "two"];
        assert_eq!(snippet(&lines, 2, 10), "two");
        assert_eq!(snippet(&lines, 5, 9), "");
    }

    #[test]
    fn test_no_findings_no_suggestions() {
        assert!(suggest_refactors(SOURCE, Language::Python, &[]).is_empty());
    }
}
