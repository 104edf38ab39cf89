//! Nested-conditional findings and refactoring suggestions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern tag carried by every nesting finding
pub const NESTED_CONDITIONALS: &str = "nested_conditionals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    /// High at or above `high_depth`, medium otherwise
    pub fn for_depth(depth: usize, high_depth: usize) -> Self {
        if depth >= high_depth {
            Self::High
        } else {
            Self::Medium
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A conditional nested deeper than the reporting threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedConditionalFinding {
    /// 1-based first line of the outermost conditional
    pub line_start: usize,
    /// 1-based last line of the nest
    pub line_end: usize,
    /// Number of nested conditionals, the outermost counting as 1
    pub depth: usize,
    pub severity: Severity,
    pub suggestion: String,
    pub pattern: String,
}

/// Shape of a proposed refactoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    ExtractMethod,
    ExtractFunction,
    SimplifyConditionals,
}

/// Advice for one finding; never applied automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactorSuggestion {
    pub kind: SuggestionKind,
    /// Source lines covered by the finding
    pub original_code: String,
    pub suggestion: String,
    /// Illustrative before/after rewrite, when the language has one
    pub example: Option<String>,
    pub benefits: Vec<String>,
    /// 1-based inclusive line range
    pub line_range: (usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_depth() {
        assert_eq!(Severity::for_depth(3, 4), Severity::Medium);
        assert_eq!(Severity::for_depth(4, 4), Severity::High);
        assert_eq!(Severity::for_depth(7, 4), Severity::High);
    }

    #[test]
    fn test_serialized_shape() {
        let finding = NestedConditionalFinding {
            line_start: 2,
            line_end: 9,
            depth: 4,
            severity: Severity::High,
            suggestion: "Extract nested conditions".to_string(),
            pattern: NESTED_CONDITIONALS.to_string(),
        };
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["severity"], "high");
        assert_eq!(value["pattern"], "nested_conditionals");

        let kind = serde_json::to_value(SuggestionKind::SimplifyConditionals).unwrap();
        assert_eq!(kind, "simplify_conditionals");
    }
}
