//! Report-only rules
//!
//! These rules never edit text; they label functions that deserve a human
//! look.

use super::{RuleInput, RuleOutput, Transformer};
use crate::{types::{Improvement, RuleKind}, Result};
use refactai_core::constants::StructuredCalibration;
use refactai_core::Language;

/// Labels functions whose span exceeds a line limit
#[derive(Debug, Clone, Copy)]
pub struct LongFunctionFlagger {
    max_lines: usize,
}

impl Default for LongFunctionFlagger {
    fn default() -> Self {
        Self::new(StructuredCalibration::LONG_FUNCTION_LINES)
    }
}

impl LongFunctionFlagger {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }
}

impl Transformer for LongFunctionFlagger {
    fn kind(&self) -> RuleKind {
        RuleKind::LongFunctions
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        let Some(tree) = input.tree else {
            return Ok(RuleOutput::default());
        };

        let improvements = tree
            .functions()
            .into_iter()
            .filter(|function| function.span() > self.max_lines)
            .map(|function| Improvement::LongFunction { lines: function.span(), name: function.name })
            .collect();

        Ok(RuleOutput { edits: Vec::new(), improvements })
    }
}

/// Labels functions with parameters but no return annotation
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeHintFlagger;

impl Transformer for TypeHintFlagger {
    fn kind(&self) -> RuleKind {
        RuleKind::TypeHints
    }

    fn applies_to(&self, language: Language) -> bool {
        refactai_core::syntax::GrammarProfile::for_language(language).is_some_and(|g| g.annotations_optional)
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        let Some(tree) = input.tree else {
            return Ok(RuleOutput::default());
        };
        if !tree.grammar().annotations_optional {
            return Ok(RuleOutput::default());
        }

        let improvements = tree
            .functions()
            .into_iter()
            .filter(|function| function.has_parameters && !function.has_return_annotation)
            .map(|function| Improvement::MissingTypeHints { name: function.name })
            .collect();

        Ok(RuleOutput { edits: Vec::new(), improvements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refactai_core::StructuralAnalyzer;

    fn labels(rule: &dyn Transformer, source: &str, language: Language) -> Vec<String> {
        let tree = StructuralAnalyzer::parse(source, language).unwrap();
        let output = rule.apply(&RuleInput::structural(&tree)).unwrap();
        assert!(output.edits.is_empty());
        output.improvements.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_long_function() {
        let mut source = String::from("def load(path):\n");
        for i in 0..55 {
            source.push_str(&format!("    step_{i} = {i}\n"));
        }
        source.push_str("\ndef short():\n    return 1\n");

        assert_eq!(
            labels(&LongFunctionFlagger::default(), &source, Language::Python),
            vec!["Long function detected: load (55 lines)"]
        );
        assert!(labels(&LongFunctionFlagger::new(100), &source, Language::Python).is_empty());
    }

    #[test]
    fn test_type_hints_python_only() {
        let source = "def a(x):\n    return x\n\ndef b(x) -> int:\n    return x\n\ndef c():\n    return 1\n";
        assert_eq!(
            labels(&TypeHintFlagger, source, Language::Python),
            vec!["Function a could benefit from type hints"]
        );

        assert!(labels(&TypeHintFlagger, "function a(x) { return x; }", Language::JavaScript).is_empty());
        assert!(TypeHintFlagger.applies_to(Language::Python));
        assert!(!TypeHintFlagger.applies_to(Language::Java));
    }

    #[test]
    fn test_method_with_self_counts_as_parameters() {
        let source = "class A:\n    def run(self):\n        pass\n";
        assert_eq!(
            labels(&TypeHintFlagger, source, Language::Python),
            vec!["Function run could benefit from type hints"]
        );
    }
}
