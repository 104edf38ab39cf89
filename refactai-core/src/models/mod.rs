//! Data models module for RefactAI core
//!
//! Values produced per source unit: the unit itself, quality metrics,
//! nested-conditional findings and refactoring suggestions. Everything here
//! is plain data, serializable for reports.

pub mod findings;
pub mod metrics;
pub mod source_unit;

pub use findings::{
    NestedConditionalFinding, RefactorSuggestion, Severity, SuggestionKind, NESTED_CONDITIONALS,
};
pub use metrics::QualityMetrics;
pub use source_unit::SourceUnit;
