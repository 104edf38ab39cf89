//! RefactAI Core - Analysis Engine and Data Structures
//!
//! This crate provides the analysis half of RefactAI:
//! - Language classification from path and content
//! - Structural views over tree-sitter grammars, with typed parse failures
//! - Quality scoring (complexity, readability, maintainability)
//! - Nested-conditional detection and refactoring suggestions
//!
//! Every engine is stateless apart from an immutable [`ScoringConfig`], so a
//! single instance can score files from many threads at once.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,  // Often necessary for clarity
    clippy::must_use_candidate,
)]

pub mod analysis;
pub mod config;
pub mod constants;
pub mod language;
pub mod models;
pub mod syntax;

// Re-export commonly used types for convenience
pub use analysis::{suggest_refactors, NestingDetector, QualityScorer};
pub use config::{KeywordProfile, NestingThresholds, ScoringConfig, CONFIG_VERSION};
pub use constants::QualityGrades;
pub use language::{classify, Language};
pub use models::{
    NestedConditionalFinding, QualityMetrics, RefactorSuggestion, Severity, SourceUnit,
    SuggestionKind, NESTED_CONDITIONALS,
};
pub use syntax::{ParseError, StructuralAnalyzer, StructuralView, SyntaxTree};

/// Result type used throughout RefactAI core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for RefactAI core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source text could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] refactai_utils::UtilError),
}
