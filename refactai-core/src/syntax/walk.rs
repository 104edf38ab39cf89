//! Read-only pre-order traversal over tree-sitter nodes

use tree_sitter::Node;

/// What the visitor wants after seeing a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    SkipChildren,
}

/// Visit `root` and its descendants in document order.
///
/// Iterative, so deeply nested sources cannot exhaust the stack.
pub fn walk<'tree, F>(root: Node<'tree>, mut visit: F)
where
    F: FnMut(Node<'tree>) -> Walk,
{
    let mut cursor = root.walk();
    let mut depth = 0usize;

    loop {
        let descend = visit(cursor.node()) == Walk::Continue;
        if descend && cursor.goto_first_child() {
            depth += 1;
            continue;
        }

        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn identifiers(root: Node<'_>) -> Vec<Node<'_>> {
        let mut found = Vec::new();
        walk(root, |node| {
            if node.kind() == "identifier" {
                found.push(node);
            }
            Walk::Continue
        });
        found
    }

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(tree_sitter_python::language()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_visits_in_document_order() {
        let tree = parse("a = 1\nb = 2\n");
        let names: Vec<String> = identifiers(tree.root_node())
            .into_iter()
            .map(|n| n.start_position().row.to_string())
            .collect();
        assert_eq!(names, vec!["0", "1"]);
    }

    #[test]
    fn test_skip_children() {
        let tree = parse("def f():\n    x = 1\ny = 2\n");
        let mut identifiers = 0;
        walk(tree.root_node(), |node| {
            if node.kind() == "function_definition" {
                return Walk::SkipChildren;
            }
            if node.kind() == "identifier" {
                identifiers += 1;
            }
            Walk::Continue
        });
        assert_eq!(identifiers, 1);
    }

    #[test]
    fn test_subtree_walk_stays_inside() {
        let tree = parse("if a:\n    b = 1\nc = 2\n");
        let root = tree.root_node();
        let first = root.named_child(0).unwrap();
        let inside = identifiers(first);
        assert_eq!(inside.len(), 2);
    }
}
