//! Per-grammar node vocabularies
//!
//! Each structured language is described by a [`GrammarProfile`]: which
//! tree-sitter node kinds count as branch points, conditionals, functions,
//! classes and comments, how documentation is attached, and which naming
//! conventions apply. Analysis code never matches on a language directly.

use crate::language::Language;

/// Where documentation for a function lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStyle {
    /// First statement of the body is a string literal
    Docstring,
    /// A comment with one of these prefixes immediately precedes the declaration
    LeadingComment(&'static [&'static str]),
}

/// Identifier conventions checked by readability scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingConvention {
    /// `snake_case`, with `__dunder__` names accepted
    Snake,
    /// `camelCase`
    Camel,
    /// `camelCase` or `PascalCase` (component functions)
    CamelOrPascal,
    /// `PascalCase`
    Pascal,
}

impl NamingConvention {
    /// Whether `name` follows this convention
    pub fn accepts(self, name: &str) -> bool {
        let core = name.trim_start_matches('_');
        let Some(first) = core.chars().next() else {
            return false;
        };

        match self {
            Self::Snake => {
                if name.starts_with("__") && name.ends_with("__") && name.len() > 4 {
                    let inner = &name[2..name.len() - 2];
                    return !inner.contains("__") && is_lower_snake(inner);
                }
                !name.contains("__") && is_lower_snake(core)
            }
            Self::Camel => {
                (first.is_ascii_lowercase() || first == '$') && core.chars().all(|c| c.is_ascii_alphanumeric() || c == '$')
            }
            Self::CamelOrPascal => {
                (first.is_ascii_alphabetic() || first == '$') && core.chars().all(|c| c.is_ascii_alphanumeric() || c == '$')
            }
            Self::Pascal => first.is_ascii_uppercase() && core.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        }
    }
}

fn is_lower_snake(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase())
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Node vocabulary of one tree-sitter grammar
#[derive(Debug)]
pub struct GrammarProfile {
    /// Conditionals, else-if arms, loops, handlers and case arms
    pub branch_kinds: &'static [&'static str],
    /// Nodes that open a conditional for nesting purposes
    pub conditional_kinds: &'static [&'static str],
    /// Node kinds that are short-circuit boolean combinations on their own
    pub boolean_kinds: &'static [&'static str],
    /// Binary node kind whose `operator` decides whether it is a boolean combination
    pub logical_binary_kind: Option<&'static str>,
    /// Named function declarations
    pub function_kinds: &'static [&'static str],
    /// Function expressions that count only when bound to a variable
    pub bound_function_kinds: &'static [&'static str],
    pub class_kinds: &'static [&'static str],
    pub comment_kinds: &'static [&'static str],
    /// Wrappers a declaration may sit in; its documentation precedes the wrapper
    pub declaration_wrappers: &'static [&'static str],
    /// Siblings skipped when looking upward for documentation
    pub skipped_preceding_kinds: &'static [&'static str],
    pub doc_style: DocStyle,
    pub function_naming: NamingConvention,
    pub class_naming: NamingConvention,
    /// Comparison operators that can be simplified against a boolean literal
    pub equality_operators: &'static [&'static str],
    pub inequality_operators: &'static [&'static str],
    /// Logical negation prefix
    pub negation: &'static str,
    /// Return annotations are optional and worth suggesting
    pub annotations_optional: bool,
}

const JS_BRANCHES: &[&str] = &[
    "if_statement",
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
    "catch_clause",
    "switch_case",
];

const JS_FUNCTIONS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "method_definition",
];

const JS_BOUND_FUNCTIONS: &[&str] = &["arrow_function", "function", "function_expression"];

const JS_WRAPPERS: &[&str] = &["export_statement", "variable_declarator", "lexical_declaration", "variable_declaration"];

static PYTHON: GrammarProfile = GrammarProfile {
    branch_kinds: &["if_statement", "elif_clause", "for_statement", "while_statement", "except_clause"],
    conditional_kinds: &["if_statement"],
    boolean_kinds: &["boolean_operator"],
    logical_binary_kind: None,
    function_kinds: &["function_definition"],
    bound_function_kinds: &[],
    class_kinds: &["class_definition"],
    comment_kinds: &["comment"],
    declaration_wrappers: &["decorated_definition"],
    skipped_preceding_kinds: &[],
    doc_style: DocStyle::Docstring,
    function_naming: NamingConvention::Snake,
    class_naming: NamingConvention::Pascal,
    equality_operators: &["=="],
    inequality_operators: &["!="],
    negation: "not ",
    annotations_optional: true,
};

const JAVASCRIPT_PROFILE: GrammarProfile = GrammarProfile {
    branch_kinds: JS_BRANCHES,
    conditional_kinds: &["if_statement"],
    boolean_kinds: &[],
    logical_binary_kind: Some("binary_expression"),
    function_kinds: JS_FUNCTIONS,
    bound_function_kinds: JS_BOUND_FUNCTIONS,
    class_kinds: &["class_declaration"],
    comment_kinds: &["comment"],
    declaration_wrappers: JS_WRAPPERS,
    skipped_preceding_kinds: &["decorator"],
    doc_style: DocStyle::LeadingComment(&["/**"]),
    function_naming: NamingConvention::Camel,
    class_naming: NamingConvention::Pascal,
    equality_operators: &["==", "==="],
    inequality_operators: &["!=", "!=="],
    negation: "!",
    annotations_optional: false,
};

static JAVASCRIPT: GrammarProfile = JAVASCRIPT_PROFILE;

static JSX: GrammarProfile = GrammarProfile {
    function_naming: NamingConvention::CamelOrPascal,
    ..JAVASCRIPT_PROFILE
};

const TYPESCRIPT_PROFILE: GrammarProfile = GrammarProfile {
    class_kinds: &[
        "class_declaration",
        "abstract_class_declaration",
        "interface_declaration",
        "enum_declaration",
    ],
    ..JAVASCRIPT_PROFILE
};

static TYPESCRIPT: GrammarProfile = TYPESCRIPT_PROFILE;

static TSX: GrammarProfile = GrammarProfile {
    function_naming: NamingConvention::CamelOrPascal,
    ..TYPESCRIPT_PROFILE
};

static JAVA: GrammarProfile = GrammarProfile {
    branch_kinds: &[
        "if_statement",
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
        "catch_clause",
        "switch_label",
    ],
    conditional_kinds: &["if_statement"],
    boolean_kinds: &[],
    logical_binary_kind: Some("binary_expression"),
    function_kinds: &["method_declaration"],
    bound_function_kinds: &[],
    class_kinds: &["class_declaration", "interface_declaration", "enum_declaration", "record_declaration"],
    comment_kinds: &["comment", "line_comment", "block_comment"],
    declaration_wrappers: &[],
    skipped_preceding_kinds: &[],
    doc_style: DocStyle::LeadingComment(&["/**"]),
    function_naming: NamingConvention::Camel,
    class_naming: NamingConvention::Pascal,
    equality_operators: &["=="],
    inequality_operators: &["!="],
    negation: "!",
    annotations_optional: false,
};

static RUST: GrammarProfile = GrammarProfile {
    branch_kinds: &[
        "if_expression",
        "if_let_expression",
        "for_expression",
        "while_expression",
        "while_let_expression",
        "loop_expression",
        "match_arm",
    ],
    conditional_kinds: &["if_expression", "if_let_expression"],
    boolean_kinds: &[],
    logical_binary_kind: Some("binary_expression"),
    function_kinds: &["function_item"],
    bound_function_kinds: &[],
    class_kinds: &["struct_item", "enum_item", "trait_item", "union_item"],
    comment_kinds: &["line_comment", "block_comment"],
    declaration_wrappers: &[],
    skipped_preceding_kinds: &["attribute_item"],
    doc_style: DocStyle::LeadingComment(&["///", "/**"]),
    function_naming: NamingConvention::Snake,
    class_naming: NamingConvention::Pascal,
    equality_operators: &["=="],
    inequality_operators: &["!="],
    negation: "!",
    annotations_optional: false,
};

impl GrammarProfile {
    /// Profile for a structured language
    pub fn for_language(language: Language) -> Option<&'static Self> {
        match language {
            Language::Python => Some(&PYTHON),
            Language::JavaScript => Some(&JAVASCRIPT),
            Language::Jsx => Some(&JSX),
            Language::TypeScript => Some(&TYPESCRIPT),
            Language::Tsx => Some(&TSX),
            Language::Java => Some(&JAVA),
            Language::Rust => Some(&RUST),
            _ => None,
        }
    }

    pub fn is_branch(&self, kind: &str) -> bool {
        self.branch_kinds.contains(&kind)
    }

    pub fn is_conditional(&self, kind: &str) -> bool {
        self.conditional_kinds.contains(&kind)
    }

    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    pub fn is_bound_function(&self, kind: &str) -> bool {
        self.bound_function_kinds.contains(&kind)
    }

    pub fn is_class(&self, kind: &str) -> bool {
        self.class_kinds.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comment_kinds.contains(&kind)
    }

    /// Operator of a simplifiable comparison, with whether it tests equality
    pub fn comparison_polarity(&self, operator: &str) -> Option<bool> {
        if self.equality_operators.contains(&operator) {
            Some(true)
        } else if self.inequality_operators.contains(&operator) {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_structured_language_has_a_profile() {
        for lang in Language::all() {
            assert_eq!(
                GrammarProfile::for_language(*lang).is_some(),
                lang.has_structured_parser(),
                "{lang}"
            );
        }
    }

    #[test]
    fn test_snake_case() {
        let snake = NamingConvention::Snake;
        assert!(snake.accepts("load_config"));
        assert!(snake.accepts("_private"));
        assert!(snake.accepts("__init__"));
        assert!(snake.accepts("parse2"));
        assert!(!snake.accepts("loadConfig"));
        assert!(!snake.accepts("bad__name"));
        assert!(!snake.accepts("_"));
    }

    #[test]
    fn test_camel_and_pascal() {
        assert!(NamingConvention::Camel.accepts("fetchUser"));
        assert!(NamingConvention::Camel.accepts("$init"));
        assert!(!NamingConvention::Camel.accepts("FetchUser"));
        assert!(!NamingConvention::Camel.accepts("fetch_user"));
        assert!(NamingConvention::CamelOrPascal.accepts("UserCard"));
        assert!(NamingConvention::Pascal.accepts("UserRepository"));
        assert!(!NamingConvention::Pascal.accepts("userRepository"));
    }

    #[test]
    fn test_comparison_polarity() {
        let js = GrammarProfile::for_language(Language::JavaScript).unwrap();
        assert_eq!(js.comparison_polarity("==="), Some(true));
        assert_eq!(js.comparison_polarity("!=="), Some(false));
        assert_eq!(js.comparison_polarity("<"), None);

        let py = GrammarProfile::for_language(Language::Python).unwrap();
        assert_eq!(py.comparison_polarity("==="), None);
    }
}
