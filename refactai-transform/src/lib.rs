//! RefactAI Transform - Rule-Based Transformation Engine
//!
//! This crate rewrites source text to improve its quality scores while
//! keeping it syntactically valid.
//!
//! Key features:
//! - A fixed, ordered rule catalogue (structural rules first, formatting last)
//! - Structural rules that read an immutable syntax tree and emit text edits
//! - Textual rules that work on any language
//! - A validator that parses before and after where a grammar exists
//! - [`RefactorEngine`], one facade over classification, scoring, detection
//!   and transformation

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod edits;
pub mod engine;
pub mod lexical;
mod scopes;
pub mod transformers;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use edits::{apply_edits, TextEdit};
pub use engine::{EngineConfig, FileReport, RefactorEngine, TransformationEngine};
pub use transformers::{RuleInput, RuleOutput, Transformer};
pub use types::{Improvement, RuleKind, TransformResult, ValidationResult};
pub use validation::validate;

/// Result type for transformation operations
pub type Result<T> = std::result::Result<T, TransformError>;

/// Error types for transformation operations
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A rule could not complete
    #[error("Rule {rule} failed: {message}")]
    Rule { rule: RuleKind, message: String },

    /// Two edits touch the same text
    #[error("Overlapping edits at bytes {first_end} and {second_start}")]
    OverlappingEdits { first_end: usize, second_start: usize },

    /// An edit falls outside the text or splits a character
    #[error("Invalid edit range {start}..{end} for text of {len} bytes")]
    InvalidEdit { start: usize, end: usize, len: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// RefactAI core error
    #[error("Core error: {0}")]
    Core(#[from] refactai_core::Error),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] refactai_utils::UtilError),

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
