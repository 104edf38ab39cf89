//! Structural analysis
//!
//! [`StructuralAnalyzer`] turns source text into either a [`SyntaxTree`] (for
//! languages with a tree-sitter grammar) or a [`ParseError`]. Parse failure is
//! a value, never a panic: every consumer matches on [`StructuralView`] and
//! picks its own fallback.
//!
//! [`SyntaxTree`] also answers the structural questions shared by the scorer,
//! the detector, the transformer and the validator (functions, classes, branch
//! points, comment lines).

pub mod grammar;
pub mod walk;

pub use grammar::{DocStyle, GrammarProfile, NamingConvention};
pub use walk::{walk, Walk};

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

/// Location and description of the first syntax error in a source unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    /// 1-based line, 0 when the error is not tied to a location
    pub line: usize,
    /// 1-based column
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn unlocated(message: impl Into<String>) -> Self {
        Self { line: 0, column: 0, message: message.into() }
    }

    fn at(node: Node<'_>, message: String) -> Self {
        let position = node.start_position();
        Self { line: position.row + 1, column: position.column + 1, message }
    }
}

/// The best structural view available for a source unit
#[derive(Debug)]
pub enum StructuralView<'src> {
    /// Parsed without errors
    Tree(SyntaxTree<'src>),
    /// The language has a grammar but the text does not parse
    Broken(ParseError),
    /// No grammar; only line and token heuristics apply
    Text,
}

/// A function or method found in a syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    /// 1-based first line of the declaration
    pub start_line: usize,
    /// 1-based last line
    pub end_line: usize,
    pub has_parameters: bool,
    pub has_return_annotation: bool,
    pub documented: bool,
}

impl FunctionInfo {
    /// Number of lines after the first, matching how body length is reported
    pub fn span(&self) -> usize {
        self.end_line - self.start_line
    }
}

/// A class-like declaration found in a syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Entry point for building structural views
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralAnalyzer;

impl StructuralAnalyzer {
    /// Parse source text with the grammar of `language`
    pub fn parse(source: &str, language: Language) -> Result<SyntaxTree<'_>, ParseError> {
        let (Some(ts_language), Some(grammar)) =
            (language.tree_sitter_language(), GrammarProfile::for_language(language))
        else {
            return Err(ParseError::unlocated(format!("no grammar available for {language}")));
        };

        let mut parser = Parser::new();
        parser
            .set_language(ts_language)
            .map_err(|e| ParseError::unlocated(format!("incompatible grammar for {language}: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::unlocated("parser produced no tree"))?;

        if tree.root_node().has_error() {
            let error = first_error(&tree, source);
            debug!("{} source failed to parse: {}", language, error);
            return Err(error);
        }

        Ok(SyntaxTree { tree, source, language, grammar })
    }

    /// Structured view when possible, otherwise the reason it is not
    pub fn view(source: &str, language: Language) -> StructuralView<'_> {
        if !language.has_structured_parser() {
            return StructuralView::Text;
        }
        match Self::parse(source, language) {
            Ok(tree) => StructuralView::Tree(tree),
            Err(error) => StructuralView::Broken(error),
        }
    }
}

fn first_error(tree: &Tree, source: &str) -> ParseError {
    let mut found: Option<ParseError> = None;

    walk(tree.root_node(), |node| {
        if found.is_some() || !node.has_error() {
            return Walk::SkipChildren;
        }
        if node.is_missing() {
            found = Some(ParseError::at(node, format!("missing `{}`", node.kind())));
            return Walk::SkipChildren;
        }
        if node.is_error() {
            let text = source.get(node.start_byte()..node.end_byte()).unwrap_or("");
            let snippet: String = text.lines().next().unwrap_or("").trim().chars().take(24).collect();
            let message = if snippet.is_empty() {
                "invalid syntax".to_string()
            } else {
                format!("invalid syntax near `{snippet}`")
            };
            found = Some(ParseError::at(node, message));
            return Walk::SkipChildren;
        }
        Walk::Continue
    });

    found.unwrap_or_else(|| ParseError::unlocated("invalid syntax"))
}

/// An error-free syntax tree together with the text it was parsed from
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
    language: Language,
    grammar: &'static GrammarProfile,
}

impl std::fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("language", &self.language)
            .field("root", &self.tree.root_node().kind())
            .finish()
    }
}

impl<'src> SyntaxTree<'src> {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn grammar(&self) -> &'static GrammarProfile {
        self.grammar
    }

    /// Source text covered by a node
    pub fn text(&self, node: Node<'_>) -> &'src str {
        self.source.get(node.start_byte()..node.end_byte()).unwrap_or("")
    }

    /// Whether a node is a short-circuit `and`/`or` combination
    pub fn is_boolean_combination(&self, node: Node<'_>) -> bool {
        if self.grammar.boolean_kinds.contains(&node.kind()) {
            return true;
        }
        self.grammar.logical_binary_kind == Some(node.kind())
            && node
                .child_by_field_name("operator")
                .is_some_and(|op| matches!(self.text(op), "&&" | "||"))
    }

    /// Branch points: branching constructs plus one per extra boolean operand
    pub fn branch_points(&self) -> usize {
        let mut count = 0;
        walk(self.root(), |node| {
            if self.grammar.is_branch(node.kind()) || self.is_boolean_combination(node) {
                count += 1;
            }
            Walk::Continue
        });
        count
    }

    /// Non-blank lines that are entirely comment
    pub fn comment_lines(&self) -> usize {
        let lines: Vec<&str> = self.source.split('\n').collect();
        let mut rows = BTreeSet::new();

        walk(self.root(), |node| {
            if !self.grammar.is_comment(node.kind()) {
                return Walk::Continue;
            }
            let start = node.start_position();
            let prefix = lines
                .get(start.row)
                .and_then(|line| line.get(..start.column))
                .unwrap_or("");
            if prefix.trim().is_empty() {
                rows.extend(start.row..=node.end_position().row);
            }
            Walk::SkipChildren
        });

        rows.into_iter()
            .filter(|row| lines.get(*row).is_some_and(|line| !line.trim().is_empty()))
            .count()
    }

    /// Functions and methods in document order
    pub fn functions(&self) -> Vec<FunctionInfo> {
        let mut functions = Vec::new();
        walk(self.root(), |node| {
            if let Some(name) = self.function_name(node) {
                functions.push(FunctionInfo {
                    name,
                    start_line: node.start_position().row + 1,
                    end_line: node.end_position().row + 1,
                    has_parameters: self.has_parameters(node),
                    has_return_annotation: node.child_by_field_name("return_type").is_some(),
                    documented: self.is_documented(node),
                });
            }
            Walk::Continue
        });
        functions
    }

    /// Classes, interfaces, structs and similar, in document order
    pub fn classes(&self) -> Vec<ClassInfo> {
        let mut classes = Vec::new();
        walk(self.root(), |node| {
            if self.grammar.is_class(node.kind()) {
                if let Some(name) = node.child_by_field_name("name") {
                    classes.push(ClassInfo {
                        name: self.text(name).to_string(),
                        start_line: node.start_position().row + 1,
                        end_line: node.end_position().row + 1,
                    });
                }
            }
            Walk::Continue
        });
        classes
    }

    fn function_name(&self, node: Node<'_>) -> Option<String> {
        let kind = node.kind();
        if self.grammar.is_function(kind) {
            let name = node.child_by_field_name("name")?;
            return Some(self.text(name).to_string());
        }
        if self.grammar.is_bound_function(kind) {
            let declarator = node.parent().filter(|p| p.kind() == "variable_declarator")?;
            let name = declarator.child_by_field_name("name")?;
            if name.kind() != "identifier" {
                return None;
            }
            return Some(self.text(name).to_string());
        }
        None
    }

    fn has_parameters(&self, node: Node<'_>) -> bool {
        if node.child_by_field_name("parameter").is_some() {
            return true;
        }
        let Some(parameters) = node.child_by_field_name("parameters") else {
            return false;
        };
        let mut cursor = parameters.walk();
        let result = parameters.named_children(&mut cursor).any(|param| {
            !self.grammar.is_comment(param.kind())
                && !matches!(
                    param.kind(),
                    "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" | "positional_separator"
                )
        });
        result
    }

    fn is_documented(&self, node: Node<'_>) -> bool {
        match self.grammar.doc_style {
            DocStyle::Docstring => node
                .child_by_field_name("body")
                .and_then(|body| {
                    let mut cursor = body.walk();
                    let first = body
                        .named_children(&mut cursor)
                        .find(|child| !self.grammar.is_comment(child.kind()));
                    first
                })
                .is_some_and(|first| {
                    first.kind() == "expression_statement"
                        && first.named_child(0).is_some_and(|expr| expr.kind() == "string")
                }),
            DocStyle::LeadingComment(prefixes) => {
                let anchor = self.declaration_anchor(node);
                let mut boundary = anchor.start_position().row;
                let mut previous = anchor.prev_named_sibling();
                while let Some(sibling) = previous {
                    if !self.grammar.skipped_preceding_kinds.contains(&sibling.kind()) {
                        break;
                    }
                    boundary = sibling.start_position().row;
                    previous = sibling.prev_named_sibling();
                }
                previous.is_some_and(|comment| {
                    self.grammar.is_comment(comment.kind())
                        && comment.end_position().row + 1 >= boundary
                        && prefixes.iter().any(|prefix| self.text(comment).starts_with(prefix))
                })
            }
        }
    }

    /// Outermost wrapper (export, declaration) that documentation would precede
    fn declaration_anchor<'t>(&self, node: Node<'t>) -> Node<'t> {
        let mut anchor = node;
        while let Some(parent) = anchor.parent() {
            if !self.grammar.declaration_wrappers.contains(&parent.kind()) {
                break;
            }
            anchor = parent;
        }
        anchor
    }

    /// Whether a conditional continues its parent's else-if chain
    pub fn is_else_if_continuation(&self, node: Node<'_>) -> bool {
        let Some(parent) = node.parent() else {
            return false;
        };
        if parent.kind() == "else_clause" {
            return true;
        }
        self.grammar.is_conditional(parent.kind())
            && parent.child_by_field_name("alternative").is_some_and(|alt| alt == node)
    }

    /// Conditional nesting below `node`, not counting `node` itself
    pub fn conditional_depth_below(&self, node: Node<'_>) -> usize {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        children
            .into_iter()
            .map(|child| {
                let below = self.conditional_depth_below(child);
                if self.grammar.is_conditional(child.kind()) && !self.is_else_if_continuation(child) {
                    below + 1
                } else {
                    below
                }
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str, language: Language) -> SyntaxTree<'_> {
        StructuralAnalyzer::parse(source, language).expect("source should parse")
    }

    #[test]
    fn test_empty_source_parses() {
        assert!(StructuralAnalyzer::parse("", Language::Python).is_ok());
        assert!(StructuralAnalyzer::parse("", Language::Rust).is_ok());
    }

    #[test]
    fn test_parse_error_location() {
        let err = StructuralAnalyzer::parse("x = 1\ndef broken(:\n    pass\n", Language::Python).unwrap_err();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_heuristic_language_has_text_view() {
        assert!(matches!(StructuralAnalyzer::view("int main() {}", Language::C), StructuralView::Text));
        assert!(matches!(
            StructuralAnalyzer::view("print((", Language::Python),
            StructuralView::Broken(_)
        ));
    }

    #[test]
    fn test_python_branch_points() {
        let source = "\
def f(a, b, c):
    if a and b and c:
        return 1
    elif b:
        return 2
    for x in range(3):
        while x:
            x -= 1
    try:
        pass
    except ValueError:
        pass
";
        let tree = parse(source, Language::Python);
        // if + elif + for + while + except + two boolean operators
        assert_eq!(tree.branch_points(), 7);
    }

    #[test]
    fn test_javascript_branch_points() {
        let source = "function f(a, b) {\n  if (a && b || a) { return 1; }\n  switch (a) { case 1: break; case 2: break; default: break; }\n}\n";
        let tree = parse(source, Language::JavaScript);
        // if + two logical operators + two cases
        assert_eq!(tree.branch_points(), 5);
    }

    #[test]
    fn test_python_functions() {
        let source = "\
def documented(x):
    \"\"\"Does things.\"\"\"
    return x

def _bare():
    return 1

def annotated(x) -> int:
    return x
";
        let tree = parse(source, Language::Python);
        let functions = tree.functions();
        assert_eq!(functions.len(), 3);
        assert!(functions[0].documented);
        assert!(functions[0].has_parameters);
        assert!(!functions[1].documented);
        assert!(!functions[1].has_parameters);
        assert!(functions[2].has_return_annotation);
        assert_eq!(functions[0].span(), 2);
    }

    #[test]
    fn test_javascript_documentation() {
        let source = "\
/**
 * Adds.
 */
export function add(a, b) {
  return a + b;
}

const sub = (a, b) => a - b;

/** Multiplies. */
const mul = function (a, b) { return a * b; };

items.map((x) => x * 2);
";
        let tree = parse(source, Language::JavaScript);
        let functions = tree.functions();
        let names: Vec<&str> = functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["add", "sub", "mul"]);
        assert!(functions[0].documented);
        assert!(!functions[1].documented);
        assert!(functions[2].documented);
    }

    #[test]
    fn test_rust_documentation_skips_attributes() {
        let source = "/// Entry point.\n#[inline]\nfn run() {}\n\nfn other() {}\n";
        let tree = parse(source, Language::Rust);
        let functions = tree.functions();
        assert_eq!(functions.len(), 2);
        assert!(functions[0].documented);
        assert!(!functions[1].documented);
    }

    #[test]
    fn test_classes() {
        let tree = parse("class Good:\n    pass\n\nclass bad:\n    pass\n", Language::Python);
        let names: Vec<String> = tree.classes().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Good", "bad"]);
    }

    #[test]
    fn test_comment_lines() {
        let source = "# header\nx = 1  # trailing\n\n# another\ny = 2\n";
        let tree = parse(source, Language::Python);
        assert_eq!(tree.comment_lines(), 2);

        let java = "/*\n * Block\n */\nclass A {\n  // note\n  int x;\n}\n";
        let tree = parse(java, Language::Java);
        assert_eq!(tree.comment_lines(), 4);
    }

    #[test]
    fn test_else_if_is_not_nesting() {
        let source = "if (a) {\n} else if (b) {\n} else if (c) {\n}\n";
        let tree = parse(source, Language::JavaScript);
        let root = tree.root();
        assert_eq!(tree.conditional_depth_below(root), 1);

        let nested = "if (a) {\n  if (b) {\n    if (c) {}\n  }\n}\n";
        let tree = parse(nested, Language::Java);
        assert_eq!(tree.conditional_depth_below(tree.root()), 3);
    }
}
