//! JavaScript binding analysis
//!
//! tree-sitter accepts some programs that JavaScript engines reject before
//! running them: a `let`/`const` redeclaring a name in the same block, or a
//! lexical declaration used as the body of a braceless `if`/`for`/`while`.
//! The var rule consults [`Bindings`] to avoid producing either, and the
//! validator reports them through [`lexical_declaration_error`].

use refactai_core::syntax::{walk, Walk};
use refactai_core::SyntaxTree;
use std::collections::{HashMap, HashSet};
use tree_sitter::Node;

/// Nodes that open a function scope, where `var` bindings live
const FUNCTION_SCOPES: &[&str] = &[
    "program",
    "function",
    "function_expression",
    "function_declaration",
    "generator_function",
    "generator_function_declaration",
    "arrow_function",
    "method_definition",
    "class_static_block",
];

/// Statements whose body may be a single statement without braces
const SINGLE_STATEMENT_PARENTS: &[&str] = &[
    "if_statement",
    "else_clause",
    "while_statement",
    "do_statement",
    "for_in_statement",
    "labeled_statement",
    "with_statement",
];

const PATTERN_NAMES: &[&str] = &["identifier", "shorthand_property_identifier_pattern"];

/// Whether a declaration stands alone as the body of a braceless statement
pub(crate) fn is_single_statement_body(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "for_statement" => parent.child_by_field_name("initializer").map_or(true, |init| init.id() != node.id()),
        kind => SINGLE_STATEMENT_PARENTS.contains(&kind),
    }
}

/// The `var`/`let`/`const` keyword of a `for (... of/in ...)` header, if it declares
pub(crate) fn loop_binding_keyword(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let keyword = node.children(&mut cursor).find(|child| matches!(child.kind(), "var" | "let" | "const"));
    keyword
}

/// Id of the function scope a node belongs to
pub(crate) fn function_scope(node: Node<'_>) -> usize {
    let mut current = node.parent();
    let mut last = node;
    while let Some(candidate) = current {
        if FUNCTION_SCOPES.contains(&candidate.kind()) {
            return candidate.id();
        }
        last = candidate;
        current = candidate.parent();
    }
    last.id()
}

/// Plain identifier names bound by a declarator list; `None` for destructuring
pub(crate) fn declarator_names<'src>(tree: &SyntaxTree<'src>, declaration: Node<'_>) -> Option<Vec<&'src str>> {
    let mut cursor = declaration.walk();
    let names: Vec<Option<&'src str>> = declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .map(|declarator| {
            declarator
                .child_by_field_name("name")
                .filter(|name| name.kind() == "identifier")
                .map(|name| tree.text(name))
        })
        .collect();
    names.into_iter().collect()
}

/// Every name introduced or rebound anywhere in a JavaScript tree
#[derive(Debug, Default)]
pub(crate) struct Bindings<'src> {
    declarations: HashMap<(usize, &'src str), usize>,
    reassigned: HashSet<&'src str>,
}

impl<'src> Bindings<'src> {
    pub fn collect(tree: &SyntaxTree<'src>) -> Self {
        let mut bindings = Self::default();

        walk(tree.root(), |node| {
            match node.kind() {
                "variable_declarator" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        bindings.declare_pattern(tree, name);
                    }
                }
                "for_in_statement" => {
                    if let Some(left) = node.child_by_field_name("left") {
                        if loop_binding_keyword(node).is_some() {
                            bindings.declare_pattern(tree, left);
                        } else {
                            bindings.reassign_pattern(tree, left);
                        }
                    }
                }
                "function_declaration" | "generator_function_declaration" | "class_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        bindings.declare(function_scope(node), tree.text(name));
                    }
                }
                "formal_parameters" | "catch_clause" => {
                    let scope = function_scope(node);
                    let target = if node.kind() == "catch_clause" { node.child_by_field_name("parameter") } else { Some(node) };
                    if let Some(target) = target {
                        for name in pattern_names(tree, target) {
                            bindings.declare(scope, name);
                        }
                    }
                }
                "arrow_function" => {
                    if let Some(parameter) = node.child_by_field_name("parameter") {
                        bindings.declare(node.id(), tree.text(parameter));
                    }
                }
                "assignment_expression" | "augmented_assignment_expression" => {
                    if let Some(left) = node.child_by_field_name("left") {
                        bindings.reassign_pattern(tree, left);
                    }
                }
                "update_expression" => {
                    if let Some(argument) = node.child_by_field_name("argument") {
                        bindings.reassign_pattern(tree, argument);
                    }
                }
                _ => {}
            }
            Walk::Continue
        });

        bindings
    }

    /// How many declarations of `name` share the function scope of `node`
    pub fn declarations(&self, node: Node<'_>, name: &str) -> usize {
        self.declarations.get(&(function_scope(node), name)).copied().unwrap_or(0)
    }

    pub fn is_reassigned(&self, name: &str) -> bool {
        self.reassigned.contains(name)
    }

    fn declare(&mut self, scope: usize, name: &'src str) {
        *self.declarations.entry((scope, name)).or_default() += 1;
    }

    fn declare_pattern(&mut self, tree: &SyntaxTree<'src>, pattern: Node<'_>) {
        let scope = function_scope(pattern);
        for name in pattern_names(tree, pattern) {
            self.declare(scope, name);
        }
    }

    fn reassign_pattern(&mut self, tree: &SyntaxTree<'src>, target: Node<'_>) {
        match target.kind() {
            "identifier" => {
                self.reassigned.insert(tree.text(target));
            }
            "array_pattern" | "object_pattern" | "parenthesized_expression" => {
                self.reassigned.extend(pattern_names(tree, target));
            }
            _ => {}
        }
    }
}

/// Names bound by a parameter list or destructuring pattern.
///
/// Over-collects from default values, which only makes callers more careful.
fn pattern_names<'src>(tree: &SyntaxTree<'src>, pattern: Node<'_>) -> Vec<&'src str> {
    let mut names = Vec::new();
    walk(pattern, |node| {
        if PATTERN_NAMES.contains(&node.kind()) {
            names.push(tree.text(node));
        }
        Walk::Continue
    });
    names
}

/// Per-block tally used by the validator
#[derive(Debug, Default, Clone, Copy)]
struct BlockTally {
    lexical: usize,
    other: usize,
}

/// First early error among lexical declarations, as `(node, message)`
pub(crate) fn lexical_declaration_error<'tree>(tree: &'tree SyntaxTree<'_>) -> Option<(Node<'tree>, String)> {
    let mut tallies: HashMap<(usize, &str), BlockTally> = HashMap::new();
    let mut found = None;

    walk(tree.root(), |node| {
        if found.is_some() {
            return Walk::SkipChildren;
        }
        let (block, names, lexical) = match node.kind() {
            "lexical_declaration" => {
                if is_single_statement_body(node) {
                    let keyword = node.child(0).map_or("let", |kind| tree.text(kind));
                    found = Some((node, format!("`{keyword}` declaration cannot be the body of a single-statement block")));
                    return Walk::SkipChildren;
                }
                (node.parent(), declarator_names(tree, node).unwrap_or_default(), true)
            }
            "class_declaration" => (node.parent(), node.child_by_field_name("name").map(|n| tree.text(n)).into_iter().collect(), true),
            "variable_declaration" => (node.parent(), declarator_names(tree, node).unwrap_or_default(), false),
            "function_declaration" | "generator_function_declaration" => {
                (node.parent(), node.child_by_field_name("name").map(|n| tree.text(n)).into_iter().collect(), false)
            }
            "formal_parameters" => {
                let body = node.parent().and_then(|function| function.child_by_field_name("body"));
                (body, parameter_names(tree, node), false)
            }
            _ => return Walk::Continue,
        };

        let Some(block) = block else {
            return Walk::Continue;
        };
        for name in names {
            let tally = tallies.entry((block.id(), name)).or_default();
            if lexical {
                tally.lexical += 1;
            } else {
                tally.other += 1;
            }
            if tally.lexical > 0 && tally.lexical + tally.other > 1 {
                found = Some((node, format!("`{name}` is declared more than once in the same block")));
                return Walk::SkipChildren;
            }
        }
        Walk::Continue
    });

    found
}

/// Names a parameter list binds directly, without looking into default values
fn parameter_names<'src>(tree: &SyntaxTree<'src>, parameters: Node<'_>) -> Vec<&'src str> {
    let mut names = Vec::new();
    let mut cursor = parameters.walk();
    for parameter in parameters.named_children(&mut cursor) {
        let target = match parameter.kind() {
            "assignment_pattern" => parameter.child_by_field_name("left"),
            "required_parameter" | "optional_parameter" => parameter.child_by_field_name("pattern"),
            "rest_pattern" => parameter.named_child(0),
            _ => Some(parameter),
        };
        if let Some(target) = target.filter(|target| target.kind() == "identifier") {
            names.push(tree.text(target));
        }
    }
    names
}
