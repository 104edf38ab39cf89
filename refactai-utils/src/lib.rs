//! RefactAI Utilities
//!
//! Shared plumbing for the RefactAI crates: configuration loading and
//! merging, tracing subscriber setup, and line-oriented text helpers used by
//! both the scorer and the transformer.

//#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod logging;
pub mod string;

/// Re-export commonly used utilities
pub use config::{load_config, load_config_with_defaults, ConfigFormat};
pub use logging::{init_logging, level_from_verbosity, LogLevel, LoggerConfig};
pub use string::{
    collapse_blank_lines, indent_width, indentation, is_blank, join_lines,
    split_lines, strip_trailing_whitespace,
};

/// Result type used throughout RefactAI utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
