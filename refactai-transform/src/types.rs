//! Transformation Types and Core Data Structures
//!
//! Rule identifiers, improvement labels and the results returned to callers.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Every rule in the catalogue, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// `x == True` and friends in conditions
    BooleanSimplification,
    /// Report functions over the length limit
    LongFunctions,
    /// Report unannotated functions where annotations are optional
    TypeHints,
    /// Placeholder documentation for public functions
    Documentation,
    /// `var` to `const`/`let`
    Declarations,
    /// Blank-line collapse and trailing whitespace
    Cleanup,
}

impl RuleKind {
    /// Get all rules in application order
    pub fn all() -> &'static [Self] {
        &[
            Self::BooleanSimplification,
            Self::LongFunctions,
            Self::TypeHints,
            Self::Documentation,
            Self::Declarations,
            Self::Cleanup,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BooleanSimplification => "boolean_simplification",
            Self::LongFunctions => "long_functions",
            Self::TypeHints => "type_hints",
            Self::Documentation => "documentation",
            Self::Declarations => "declarations",
            Self::Cleanup => "cleanup",
        }
    }

    /// Get display name for reports
    pub fn display_name(self) -> &'static str {
        match self {
            Self::BooleanSimplification => "Boolean Comparison Simplification",
            Self::LongFunctions => "Long Function Detection",
            Self::TypeHints => "Type Hint Suggestions",
            Self::Documentation => "Documentation Placeholders",
            Self::Declarations => "Block-Scoped Declarations",
            Self::Cleanup => "Whitespace Cleanup",
        }
    }

    /// Structural rules need an error-free syntax tree
    pub fn is_structural(self) -> bool {
        matches!(self, Self::BooleanSimplification | Self::LongFunctions | Self::TypeHints)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown rule: {s}"))
    }
}

/// Comment style of an inserted documentation placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocKind {
    Docstring,
    JsDoc,
    Javadoc,
    DocComment,
}

/// One applied transformation or observation, rendered as a fixed label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Improvement {
    SimplifiedBooleanComparison { operator: String, literal: String },
    LongFunction { name: String, lines: usize },
    MissingTypeHints { name: String },
    DocPlaceholder { name: String, kind: DocKind },
    ReplacedVarDeclarations { count: usize },
    CollapsedBlankLines,
    StrippedTrailingWhitespace,
}

impl Improvement {
    /// Rule that produces this label
    pub fn rule(&self) -> RuleKind {
        match self {
            Self::SimplifiedBooleanComparison { .. } => RuleKind::BooleanSimplification,
            Self::LongFunction { .. } => RuleKind::LongFunctions,
            Self::MissingTypeHints { .. } => RuleKind::TypeHints,
            Self::DocPlaceholder { .. } => RuleKind::Documentation,
            Self::ReplacedVarDeclarations { .. } => RuleKind::Declarations,
            Self::CollapsedBlankLines | Self::StrippedTrailingWhitespace => RuleKind::Cleanup,
        }
    }
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimplifiedBooleanComparison { operator, literal } => {
                write!(f, "Simplified boolean comparison ({operator} {literal})")
            }
            Self::LongFunction { name, lines } => write!(f, "Long function detected: {name} ({lines} lines)"),
            Self::MissingTypeHints { name } => write!(f, "Function {name} could benefit from type hints"),
            Self::DocPlaceholder { name, kind } => match kind {
                DocKind::Docstring => write!(f, "Added docstring placeholder for {name}"),
                DocKind::JsDoc => write!(f, "Added JSDoc comment placeholder for {name}"),
                DocKind::Javadoc => write!(f, "Added Javadoc comment placeholder for {name}"),
                DocKind::DocComment => write!(f, "Added doc comment placeholder for {name}"),
            },
            Self::ReplacedVarDeclarations { count } => write!(f, "Replaced {count} var declarations"),
            Self::CollapsedBlankLines => write!(f, "Cleaned up excessive blank lines"),
            Self::StrippedTrailingWhitespace => write!(f, "Removed trailing whitespace"),
        }
    }
}

impl Serialize for Improvement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of checking original and transformed text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub original_valid: bool,
    pub transformed_valid: bool,
    /// Syntax failures, removed declarations and other concerns, in order
    pub warnings: Vec<String>,
    /// Neutral structural observations such as added declarations
    pub changes: Vec<String>,
}

impl ValidationResult {
    /// Both sides valid, nothing to report
    pub fn clean() -> Self {
        Self { original_valid: true, transformed_valid: true, warnings: Vec::new(), changes: Vec::new() }
    }

    pub fn is_valid(&self) -> bool {
        self.original_valid && self.transformed_valid
    }
}

/// Outcome of transforming one source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResult {
    pub success: bool,
    /// Equal to the input whenever `success` is false
    pub transformed_code: String,
    /// Labels in the order their rules ran
    pub improvements: Vec<Improvement>,
    pub validation: ValidationResult,
    pub error: Option<String>,
}

impl TransformResult {
    /// Failed transformation: original text, no improvements
    pub fn failure(original: &str, validation: ValidationResult, error: impl Into<String>) -> Self {
        Self {
            success: false,
            transformed_code: original.to_string(),
            improvements: Vec::new(),
            validation,
            error: Some(error.into()),
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.validation.warnings
    }

    /// Improvement labels as display strings
    pub fn labels(&self) -> Vec<String> {
        self.improvements.iter().map(ToString::to_string).collect()
    }

    pub fn changed(&self, original: &str) -> bool {
        self.transformed_code != original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_conversion() {
        for kind in RuleKind::all() {
            let parsed: RuleKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
        assert!("magic_numbers".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_rule_order_matches_catalogue() {
        let mut sorted = RuleKind::all().to_vec();
        sorted.sort();
        assert_eq!(sorted, RuleKind::all());
        assert!(RuleKind::BooleanSimplification.is_structural());
        assert!(!RuleKind::Documentation.is_structural());
    }

    #[test]
    fn test_improvement_labels() {
        let label = Improvement::SimplifiedBooleanComparison { operator: "==".into(), literal: "True".into() };
        assert_eq!(label.to_string(), "Simplified boolean comparison (== True)");
        assert_eq!(
            Improvement::LongFunction { name: "load".into(), lines: 61 }.to_string(),
            "Long function detected: load (61 lines)"
        );
        assert_eq!(Improvement::ReplacedVarDeclarations { count: 3 }.to_string(), "Replaced 3 var declarations");
        assert!(Improvement::CollapsedBlankLines.to_string().contains("blank lines"));
    }

    #[test]
    fn test_improvements_serialize_as_labels() {
        let result = TransformResult {
            success: true,
            transformed_code: String::new(),
            improvements: vec![Improvement::CollapsedBlankLines],
            validation: ValidationResult::clean(),
            error: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["improvements"][0], "Cleaned up excessive blank lines");
    }

    #[test]
    fn test_failure_keeps_original() {
        let result = TransformResult::failure("x = 1\n", ValidationResult::clean(), "boom");
        assert!(!result.success);
        assert_eq!(result.transformed_code, "x = 1\n");
        assert!(result.improvements.is_empty());
        assert!(!result.changed("x = 1\n"));
    }
}
