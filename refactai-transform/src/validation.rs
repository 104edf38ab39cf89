//! Transformation validation
//!
//! Structured languages are parsed on both sides and their declarations and
//! branch points compared. JavaScript dialects are also checked for misplaced
//! or duplicate block-scoped declarations, which tree-sitter accepts. Other languages are compared line by line and
//! never receive a syntax verdict.

use crate::{scopes::lexical_declaration_error, types::ValidationResult};
use refactai_core::{Language, ParseError, StructuralAnalyzer, SyntaxTree};
use similar::{DiffTag, TextDiff};
use std::collections::BTreeSet;
use tracing::debug;

/// Branch-point movement above which the change is reported
const SIGNIFICANT_COMPLEXITY_CHANGE: i64 = 5;

/// Check `transformed` against `original`
pub fn validate(original: &str, transformed: &str, language: Language) -> ValidationResult {
    if !language.has_structured_parser() {
        return validate_text(original, transformed);
    }

    let mut result = ValidationResult::clean();
    let before = match parse_checked(original, language) {
        Ok(tree) => Some(tree),
        Err(error) => {
            result.original_valid = false;
            result.warnings.push(format!("Original code has syntax errors: {error}"));
            None
        }
    };
    let after = match parse_checked(transformed, language) {
        Ok(tree) => Some(tree),
        Err(error) => {
            result.transformed_valid = false;
            result.warnings.push(format!("Transformed code has syntax errors: {error}"));
            None
        }
    };

    if let (Some(before), Some(after)) = (before, after) {
        compare_structure(&before, &after, &mut result);
    }
    result
}

/// Parse, then reject what the grammar lets through but an engine would not
fn parse_checked(source: &str, language: Language) -> Result<SyntaxTree<'_>, ParseError> {
    let tree = StructuralAnalyzer::parse(source, language)?;
    if language.is_javascript_family() {
        if let Some((node, message)) = lexical_declaration_error(&tree) {
            let position = node.start_position();
            return Err(ParseError { line: position.row + 1, column: position.column + 1, message });
        }
    }
    Ok(tree)
}

fn compare_structure(before: &SyntaxTree<'_>, after: &SyntaxTree<'_>, result: &mut ValidationResult) {
    let class_names = |tree: &SyntaxTree<'_>| -> BTreeSet<String> {
        tree.classes().into_iter().map(|class| class.name).collect()
    };
    let function_names = |tree: &SyntaxTree<'_>| -> BTreeSet<String> {
        tree.functions().into_iter().map(|function| function.name).collect()
    };

    report_names("classes", &class_names(before), &class_names(after), result);
    report_names("functions", &function_names(before), &function_names(after), result);

    let delta = count(after.branch_points()) - count(before.branch_points());
    if delta > SIGNIFICANT_COMPLEXITY_CHANGE {
        result.warnings.push("Transformed code is significantly more complex".to_string());
    } else if delta < -SIGNIFICANT_COMPLEXITY_CHANGE {
        result.changes.push("Transformed code is significantly simpler".to_string());
    }
}

fn report_names(what: &str, before: &BTreeSet<String>, after: &BTreeSet<String>, result: &mut ValidationResult) {
    let removed: Vec<&str> = before.difference(after).map(String::as_str).collect();
    if !removed.is_empty() {
        result.warnings.push(format!("Removed {what}: {}", removed.join(", ")));
    }
    let added: Vec<&str> = after.difference(before).map(String::as_str).collect();
    if !added.is_empty() {
        result.changes.push(format!("Added {what}: {}", added.join(", ")));
    }
}

fn count(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Line delta for languages without a grammar
fn validate_text(original: &str, transformed: &str) -> ValidationResult {
    let mut result = ValidationResult::clean();
    let before = code_lines(original);
    let after = code_lines(transformed);

    let diff = TextDiff::from_slices(&before, &after);
    let (mut rewritten, mut added) = (0usize, 0usize);
    for op in diff.ops() {
        let (tag, old, new) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {}
            DiffTag::Insert => added += new.len(),
            DiffTag::Delete | DiffTag::Replace => rewritten += old.len(),
        }
    }
    debug!("Line delta without a grammar: {} rewritten, {} added", rewritten, added);

    if rewritten > 0 {
        result.warnings.push(format!("{rewritten} existing code lines were changed or removed"));
    }
    if added > 0 {
        result.changes.push(format!("Added {added} code lines"));
    }
    result
}

/// Non-blank lines without trailing whitespace
fn code_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim_end).filter(|line| !line.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_python_is_clean() {
        let source = "def f(x):\n    return x\n";
        assert_eq!(validate(source, source, Language::Python), ValidationResult::clean());
    }

    #[test]
    fn test_syntax_errors_name_the_side() {
        let result = validate("def f(:\n", "def f():\n    pass\n", Language::Python);
        assert!(!result.original_valid);
        assert!(result.transformed_valid);
        assert!(result.warnings[0].starts_with("Original code has syntax errors: "));

        let result = validate("x = 1\n", "x = (1\n", Language::Python);
        assert!(result.original_valid);
        assert!(!result.transformed_valid);
        assert!(result.warnings[0].starts_with("Transformed code has syntax errors: "));
    }

    #[test]
    fn test_removed_and_added_declarations() {
        let original = "def a():\n    pass\n\ndef b():\n    pass\n";
        let transformed = "def b():\n    pass\n\ndef c():\n    pass\n";
        let result = validate(original, transformed, Language::Python);
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["Removed functions: a"]);
        assert_eq!(result.changes, vec!["Added functions: c"]);
    }

    #[test]
    fn test_complexity_change() {
        let simple = "def f(x):\n    return x\n";
        let branchy = "def f(x):\n    if x:\n        pass\n    if x:\n        pass\n    if x:\n        pass\n    \
                       if x:\n        pass\n    if x:\n        pass\n    if x:\n        pass\n    return x\n";
        let result = validate(simple, branchy, Language::Python);
        assert_eq!(result.warnings, vec!["Transformed code is significantly more complex"]);

        let result = validate(branchy, simple, Language::Python);
        assert!(result.warnings.is_empty());
        assert_eq!(result.changes, vec!["Transformed code is significantly simpler"]);
    }

    #[test]
    fn test_block_scoped_early_errors() {
        let result = validate("var x = 1;\nvar x = 2;\n", "let x = 1;\nlet x = 2;\n", Language::JavaScript);
        assert!(result.original_valid);
        assert!(!result.transformed_valid);
        assert_eq!(
            result.warnings,
            vec!["Transformed code has syntax errors: line 2, column 1: `x` is declared more than once in the same block"]
        );

        let result = validate(
            "if (ready) var flag = compute();\n",
            "if (ready) const flag = compute();\n",
            Language::TypeScript,
        );
        assert!(!result.transformed_valid);
        assert!(result.warnings[0].contains("`const` declaration cannot be the body of a single-statement block"));

        let shadowed = "let x = 1;\nif (x) {\n  let x = 2;\n}\n";
        assert_eq!(validate(shadowed, shadowed, Language::JavaScript), ValidationResult::clean());
    }

    #[test]
    fn test_text_languages_never_claim_syntax() {
        let result = validate("int main( {\n", "int main( {\n", Language::C);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());

        let result = validate("a  \n\n\n\nb\n", "a\n\nb\n", Language::Go);
        assert_eq!(result, ValidationResult::clean());

        let result = validate("a\nb\n", "a\nc\n", Language::Shell);
        assert!(result.is_valid());
        assert_eq!(result.warnings, vec!["1 existing code lines were changed or removed"]);
    }
}
