//! Block-scoped declarations
//!
//! Replaces `var` with `const` when the declaration binds a single name with
//! an initializer that is never reassigned, and with `let` otherwise.
//!
//! The rule parses its input itself, since it runs after the documentation
//! rule has changed the text. A `var` is left alone when its name is declared
//! again in the same function, when it is the braceless body of `if`, `else`,
//! a loop or a label, or when it destructures; block scoping would turn each
//! of those into an early error. Unparseable input is left alone entirely.

use super::{RuleInput, RuleOutput, Transformer};
use crate::{
    edits::TextEdit,
    scopes::{declarator_names, is_single_statement_body, loop_binding_keyword, Bindings},
    types::{Improvement, RuleKind},
    Result,
};
use refactai_core::syntax::{walk, Walk};
use refactai_core::{Language, StructuralAnalyzer, SyntaxTree};
use tracing::debug;
use tree_sitter::Node;

/// Replaces `var` declarations in JavaScript dialects
#[derive(Debug, Default, Clone, Copy)]
pub struct VarDeclarationReplacer;

impl VarDeclarationReplacer {
    pub fn new() -> Self {
        Self
    }
}

/// A `var` keyword together with what it binds
struct VarSite<'tree, 'src> {
    keyword: Node<'tree>,
    names: Vec<(Node<'tree>, &'src str)>,
    initialized: bool,
}

impl Transformer for VarDeclarationReplacer {
    fn kind(&self) -> RuleKind {
        RuleKind::Declarations
    }

    fn applies_to(&self, language: Language) -> bool {
        language.is_javascript_family()
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        if !self.applies_to(input.language) || !input.source.contains("var") {
            return Ok(RuleOutput::default());
        }
        let tree = match StructuralAnalyzer::parse(input.source, input.language) {
            Ok(tree) => tree,
            Err(error) => {
                debug!("Leaving var declarations of unparseable {} source: {}", input.language, error);
                return Ok(RuleOutput::default());
            }
        };

        let bindings = Bindings::collect(&tree);
        let mut output = RuleOutput::default();

        for site in var_sites(&tree) {
            if site.names.iter().any(|(node, name)| bindings.declarations(*node, name) > 1) {
                debug!("Keeping var at byte {}: name declared more than once", site.keyword.start_byte());
                continue;
            }
            let constant = site.initialized
                && site.names.len() == 1
                && site.names.iter().all(|(_, name)| !bindings.is_reassigned(name));
            let replacement = if constant { "const" } else { "let" };
            output.edits.push(TextEdit::replace(site.keyword.start_byte(), site.keyword.end_byte(), replacement));
        }

        if !output.edits.is_empty() {
            output.improvements.push(Improvement::ReplacedVarDeclarations { count: output.edits.len() });
        }
        Ok(output)
    }
}

/// Every `var` that block scoping can take over, in document order
fn var_sites<'tree, 'src>(tree: &'tree SyntaxTree<'src>) -> Vec<VarSite<'tree, 'src>> {
    let mut sites = Vec::new();

    walk(tree.root(), |node| {
        match node.kind() {
            "variable_declaration" => {
                if let Some(site) = declaration_site(tree, node) {
                    sites.push(site);
                }
            }
            "for_in_statement" => {
                let keyword = loop_binding_keyword(node).filter(|keyword| keyword.kind() == "var");
                let left = node.child_by_field_name("left").filter(|left| left.kind() == "identifier");
                if let (Some(keyword), Some(left)) = (keyword, left) {
                    sites.push(VarSite { keyword, names: vec![(left, tree.text(left))], initialized: true });
                }
            }
            _ => {}
        }
        Walk::Continue
    });

    sites
}

fn declaration_site<'tree, 'src>(tree: &'tree SyntaxTree<'src>, node: Node<'tree>) -> Option<VarSite<'tree, 'src>> {
    if is_single_statement_body(node) {
        return None;
    }
    let keyword = node.child(0).filter(|keyword| keyword.kind() == "var")?;
    declarator_names(tree, node)?;

    let mut cursor = node.walk();
    let declarators: Vec<Node<'tree>> =
        node.named_children(&mut cursor).filter(|child| child.kind() == "variable_declarator").collect();
    let names = declarators
        .iter()
        .filter_map(|declarator| declarator.child_by_field_name("name"))
        .map(|name| (name, tree.text(name)))
        .collect();
    let initialized = declarators.iter().all(|declarator| declarator.child_by_field_name("value").is_some());

    Some(VarSite { keyword, names, initialized })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edits::apply_edits;

    fn run(source: &str) -> (String, Vec<String>) {
        let output = VarDeclarationReplacer.apply(&RuleInput::text(source, Language::JavaScript)).unwrap();
        let code = apply_edits(source, &output.edits).unwrap();
        (code, output.improvements.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_const_and_let() {
        let source = "var total = 0;\nvar limit = 10;\nfor (var i = 0; i < limit; i++) {\n  total += i;\n}\nvar later;\n";
        let (code, labels) = run(source);
        assert_eq!(
            code,
            "let total = 0;\nconst limit = 10;\nfor (let i = 0; i < limit; i++) {\n  total += i;\n}\nlet later;\n"
        );
        assert_eq!(labels, vec!["Replaced 4 var declarations"]);
    }

    #[test]
    fn test_multiple_declarators_use_let() {
        let (code, _) = run("var a = 1, b = 2;\nconsole.log(a + b);\n");
        assert_eq!(code, "let a = 1, b = 2;\nconsole.log(a + b);\n");
    }

    #[test]
    fn test_comments_strings_and_properties() {
        let source = "// var x = 1\nconst s = 'var y = 2';\nconfig.var = 3;\nvar z = f(1, 2);\n";
        let (code, labels) = run(source);
        assert_eq!(code, "// var x = 1\nconst s = 'var y = 2';\nconfig.var = 3;\nconst z = f(1, 2);\n");
        assert_eq!(labels, vec!["Replaced 1 var declarations"]);
    }

    #[test]
    fn test_update_and_loop_bindings() {
        let (code, _) = run("var n = 1;\nn++;\nvar k = 0;\nfor (k of items) {}\nvar m = 2;\nif (m === 2) {}\n");
        assert_eq!(code, "let n = 1;\nn++;\nlet k = 0;\nfor (k of items) {}\nconst m = 2;\nif (m === 2) {}\n");
    }

    #[test]
    fn test_loop_header_var() {
        let (code, labels) = run("for (var key in table) {\n  use(key);\n}\nfor (var item of list) {\n  item = wrap(item);\n}\n");
        assert_eq!(
            code,
            "for (const key in table) {\n  use(key);\n}\nfor (let item of list) {\n  item = wrap(item);\n}\n"
        );
        assert_eq!(labels, vec!["Replaced 2 var declarations"]);
    }

    #[test]
    fn test_redeclared_names_keep_var() {
        let source = "var x = 1;\nvar x = 2;\nvar y = 3;\n";
        let (code, labels) = run(source);
        assert_eq!(code, "var x = 1;\nvar x = 2;\nconst y = 3;\n");
        assert_eq!(labels, vec!["Replaced 1 var declarations"]);
        assert!(crate::validate(source, &code, Language::JavaScript).is_valid());

        let (code, labels) = run("function f(flag) {\n  var flag = !flag;\n  return flag;\n}\n");
        assert_eq!(code, "function f(flag) {\n  var flag = !flag;\n  return flag;\n}\n");
        assert!(labels.is_empty());
    }

    #[test]
    fn test_same_name_in_separate_functions() {
        let source = "function a() {\n  var i = 0;\n}\nfunction b() {\n  var i = 1;\n}\n";
        let (code, _) = run(source);
        assert_eq!(code, "function a() {\n  const i = 0;\n}\nfunction b() {\n  const i = 1;\n}\n");
    }

    #[test]
    fn test_single_statement_bodies_keep_var() {
        let source = "if (ready) var flag = compute();\nwhile (more) var item = next();\nif (a) {} else var b = 1;\nouter: var c = 2;\n";
        let (code, labels) = run(source);
        assert_eq!(code, source);
        assert!(labels.is_empty());
        assert!(crate::validate(source, &code, Language::JavaScript).is_valid());
    }

    #[test]
    fn test_destructuring_keeps_var() {
        let (code, labels) = run("var { a, b } = pair;\n");
        assert_eq!(code, "var { a, b } = pair;\n");
        assert!(labels.is_empty());
    }

    #[test]
    fn test_no_var_no_label() {
        let (code, labels) = run("let a = 1;\nconst b = a;\n");
        assert_eq!(code, "let a = 1;\nconst b = a;\n");
        assert!(labels.is_empty());
    }

    #[test]
    fn test_unparseable_untouched() {
        let (code, labels) = run("var a = ;\n");
        assert_eq!(code, "var a = ;\n");
        assert!(labels.is_empty());
    }

    #[test]
    fn test_fixed_point() {
        let (once, _) = run("var a = 1;\nvar b;\nb = a;\n");
        let (twice, labels) = run(&once);
        assert_eq!(once, twice);
        assert!(labels.is_empty());
    }

    #[test]
    fn test_non_javascript_untouched() {
        let output = VarDeclarationReplacer.apply(&RuleInput::text("var x = 1;", Language::Java)).unwrap();
        assert!(output.is_empty());
    }
}
