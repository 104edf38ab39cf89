//! Boolean comparison simplification
//!
//! Rewrites comparisons against boolean literals inside `if`/`elif`
//! conditions: `x == True` becomes `x`, `x == False` becomes `not x` (or
//! `!x`), and the inequality forms flip accordingly. Only plain names and
//! dotted accesses are rewritten, so no operator precedence can change.

use super::{RuleInput, RuleOutput, Transformer};
use crate::{edits::TextEdit, types::{Improvement, RuleKind}, Result};
use refactai_core::SyntaxTree;
use refactai_core::syntax::{walk, Walk};
use tree_sitter::Node;

/// Node kinds that continue a `if`/`elif` chain without being an `if`
const CONDITION_CARRIERS: &[&str] = &["elif_clause"];

const NAME_KINDS: &[&str] = &["identifier", "this", "self"];

const FIELD_KINDS: &[&str] = &["identifier", "property_identifier", "field_identifier", "integer_literal"];

/// Simplifies `x == True` style conditions
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanSimplifier;

impl BooleanSimplifier {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for BooleanSimplifier {
    fn kind(&self) -> RuleKind {
        RuleKind::BooleanSimplification
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        let Some(tree) = input.tree else {
            return Ok(RuleOutput::default());
        };
        let grammar = tree.grammar();
        let mut comparisons = Vec::new();

        walk(tree.root(), |node| {
            if grammar.is_conditional(node.kind()) || CONDITION_CARRIERS.contains(&node.kind()) {
                if let Some(condition) = node.child_by_field_name("condition") {
                    collect_comparisons(tree, condition, &mut comparisons);
                }
            }
            Walk::Continue
        });

        let mut output = RuleOutput::default();
        for comparison in comparisons {
            if let Some((edit, improvement)) = simplify(tree, comparison) {
                output.edits.push(edit);
                output.improvements.push(improvement);
            }
        }
        Ok(output)
    }
}

/// Comparisons reachable through parentheses, negation and `and`/`or`
fn collect_comparisons<'t>(tree: &SyntaxTree<'_>, node: Node<'t>, out: &mut Vec<Node<'t>>) {
    let kind = node.kind();
    let passes_through = kind == "parenthesized_expression"
        || kind == "not_operator"
        || tree.is_boolean_combination(node)
        || (kind == "unary_expression"
            && node
                .child_by_field_name("operator")
                .or_else(|| node.child(0))
                .is_some_and(|op| tree.text(op) == "!"));

    if passes_through {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        for child in children {
            collect_comparisons(tree, child, out);
        }
    } else if matches!(kind, "comparison_operator" | "binary_expression") && node.child_count() == 3 {
        out.push(node);
    }
}

fn simplify(tree: &SyntaxTree<'_>, comparison: Node<'_>) -> Option<(TextEdit, Improvement)> {
    let grammar = tree.grammar();
    let (left, operator, right) = (comparison.child(0)?, comparison.child(1)?, comparison.child(2)?);

    let operator_text = tree.text(operator);
    let equality = grammar.comparison_polarity(operator_text)?;
    let literal = boolean_literal(tree, right)?;
    if !is_name_path(tree, left) {
        return None;
    }

    let subject = tree.text(left);
    let replacement = if equality == literal {
        subject.to_string()
    } else {
        format!("{}{subject}", grammar.negation)
    };

    Some((
        TextEdit::replace(comparison.start_byte(), comparison.end_byte(), replacement),
        Improvement::SimplifiedBooleanComparison {
            operator: operator_text.to_string(),
            literal: tree.text(right).to_string(),
        },
    ))
}

fn boolean_literal(tree: &SyntaxTree<'_>, node: Node<'_>) -> Option<bool> {
    if !matches!(node.kind(), "true" | "false" | "boolean_literal") {
        return None;
    }
    match tree.text(node) {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}

/// A plain name or a chain of field accesses on one
fn is_name_path(tree: &SyntaxTree<'_>, node: Node<'_>) -> bool {
    let kind = node.kind();
    if NAME_KINDS.contains(&kind) {
        return true;
    }
    let (object, field) = match kind {
        "attribute" => (node.child_by_field_name("object"), node.child_by_field_name("attribute")),
        "member_expression" => (node.child_by_field_name("object"), node.child_by_field_name("property")),
        "field_access" => (node.child_by_field_name("object"), node.child_by_field_name("field")),
        "field_expression" => (node.child_by_field_name("value"), node.child_by_field_name("field")),
        _ => return false,
    };
    match (object, field) {
        (Some(object), Some(field)) => FIELD_KINDS.contains(&field.kind()) && is_name_path(tree, object),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::apply_edits;
    use refactai_core::{Language, StructuralAnalyzer};

    fn run(source: &str, language: Language) -> (String, Vec<String>) {
        let tree = StructuralAnalyzer::parse(source, language).expect("test source parses");
        let output = BooleanSimplifier.apply(&RuleInput::structural(&tree)).unwrap();
        let code = apply_edits(source, &output.edits).unwrap();
        (code, output.improvements.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_python_true_and_false() {
        let (code, labels) = run("if x == True:\n    pass\n", Language::Python);
        assert_eq!(code, "if x:\n    pass\n");
        assert_eq!(labels, vec!["Simplified boolean comparison (== True)"]);

        let (code, labels) = run("if self.ready == False:\n    pass\nelif y != False:\n    pass\n", Language::Python);
        assert_eq!(code, "if not self.ready:\n    pass\nelif y:\n    pass\n");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_python_inside_boolean_operators() {
        let (code, _) = run("if (a == True) and not b != True:\n    pass\n", Language::Python);
        assert_eq!(code, "if (a) and not not b:\n    pass\n");
    }

    #[test]
    fn test_python_leaves_complex_operands() {
        let source = "if f() == True:\n    pass\nif a == b == True:\n    pass\nwhile x == True:\n    pass\n";
        let (code, labels) = run(source, Language::Python);
        assert_eq!(code, source);
        assert!(labels.is_empty());
    }

    #[test]
    fn test_javascript_strict_equality() {
        let (code, labels) = run("if (user.active === false) {\n  stop();\n}\n", Language::JavaScript);
        assert_eq!(code, "if (!user.active) {\n  stop();\n}\n");
        assert_eq!(labels, vec!["Simplified boolean comparison (=== false)"]);

        let (code, _) = run("if (ok !== true && done == true) { go(); }", Language::JavaScript);
        assert_eq!(code, "if (!ok && done) { go(); }");
    }

    #[test]
    fn test_java_and_rust() {
        let (code, _) = run("class A { void f() { if (this.flag == true) { g(); } } }", Language::Java);
        assert_eq!(code, "class A { void f() { if (this.flag) { g(); } } }");

        let (code, _) = run("fn f(x: bool) {\n    if x == false {\n        g();\n    }\n}\n", Language::Rust);
        assert_eq!(code, "fn f(x: bool) {\n    if !x {\n        g();\n    }\n}\n");
    }

    #[test]
    fn test_fixed_point() {
        let (once, _) = run("if x == True:\n    if y == False:\n        pass\n", Language::Python);
        let (twice, labels) = run(&once, Language::Python);
        assert_eq!(once, twice);
        assert!(labels.is_empty());
    }
}
