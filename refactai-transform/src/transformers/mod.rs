//! Transformer implementations
//!
//! Each rule of the catalogue is a [`Transformer`]. Rules read their input
//! and return text edits plus improvement labels; the engine decides when
//! edits are applied.

use crate::{edits::TextEdit, types::{Improvement, RuleKind}, Result};
use refactai_core::{Language, SyntaxTree};

pub mod boolean;
pub mod cleanup;
pub mod declarations;
pub mod documentation;
pub mod flags;

pub use boolean::BooleanSimplifier;
pub use cleanup::WhitespaceCleaner;
pub use declarations::VarDeclarationReplacer;
pub use documentation::DocumentationInserter;
pub use flags::{LongFunctionFlagger, TypeHintFlagger};

/// What a rule sees
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub source: &'a str,
    pub language: Language,
    /// Present only for structural rules, parsed from `source`
    pub tree: Option<&'a SyntaxTree<'a>>,
}

impl<'a> RuleInput<'a> {
    pub fn text(source: &'a str, language: Language) -> Self {
        Self { source, language, tree: None }
    }

    pub fn structural(tree: &'a SyntaxTree<'a>) -> Self {
        Self { source: tree.source(), language: tree.language(), tree: Some(tree) }
    }
}

/// Edits against the rule's input, and the labels they earn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOutput {
    pub edits: Vec<TextEdit>,
    pub improvements: Vec<Improvement>,
}

impl RuleOutput {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.improvements.is_empty()
    }
}

/// A rule of the catalogue
pub trait Transformer: Send + Sync {
    fn kind(&self) -> RuleKind;

    /// Whether the rule has anything to say about `language`
    fn applies_to(&self, _language: Language) -> bool {
        true
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput>;
}
