//! Scoring Calibration
//!
//! Calibrated constants behind the default [`crate::ScoringConfig`]. Changing
//! any of these shifts every score the engine produces, so they are kept in
//! one place and covered by tests.

use serde::{Deserialize, Serialize};

/// Constants for the syntax-tree scoring path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredCalibration;

impl StructuredCalibration {
    /// Complexity score = 100 - WEIGHT * branch points, never below FLOOR
    pub const COMPLEXITY_WEIGHT: i32 = 2;
    pub const COMPLEXITY_FLOOR: i32 = 65;

    /// Readability
    pub const LONG_LINE: usize = 100;
    pub const LONG_LINE_PENALTY: i32 = 2;
    pub const LOW_COMMENT_RATIO: f64 = 0.1;
    pub const LOW_COMMENT_PENALTY: i32 = 15;
    pub const HIGH_COMMENT_RATIO: f64 = 0.3;
    pub const HIGH_COMMENT_BONUS: i32 = 10;
    pub const NAMING_PENALTY: i32 = 3;

    /// Maintainability
    pub const LONG_FUNCTION_LINES: usize = 50;
    pub const LONG_FUNCTION_PENALTY: i32 = 10;
    pub const MEDIUM_FUNCTION_LINES: usize = 30;
    pub const MEDIUM_FUNCTION_PENALTY: i32 = 5;
    pub const LOW_DOC_RATIO: f64 = 0.5;
    pub const LOW_DOC_PENALTY: i32 = 15;
    pub const HIGH_DOC_RATIO: f64 = 0.8;
    pub const HIGH_DOC_BONUS: i32 = 10;
}

/// Constants for the keyword-count heuristic used by C-family languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicCalibration;

impl HeuristicCalibration {
    pub const KEYWORD_WEIGHT: i32 = 2;
    pub const LONG_LINE: usize = 100;
    pub const LONG_LINE_PENALTY: i32 = 2;
    pub const MIN_COMMENT_RATIO: f64 = 0.1;
    pub const LOW_COMMENT_PENALTY: i32 = 20;
    pub const MAX_INCLUDES: usize = 10;
    pub const EXCESS_INCLUDE_PENALTY: i32 = 10;
    pub const FUNCTION_DEFINITION_BONUS: i32 = 10;
}

/// Constants for the line-count strategy used when nothing better exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCountCalibration;

impl LineCountCalibration {
    pub const COMPLEXITY_BASE: i32 = 100;
    pub const COMPLEXITY_LINES_PER_POINT: usize = 10;
    pub const COMPLEXITY_FLOOR: i32 = 65;

    pub const READABILITY_BASE: i32 = 90;
    pub const LONG_LINE: usize = 120;
    pub const LONG_LINE_PENALTY: i32 = 5;
    pub const READABILITY_FLOOR: i32 = 40;

    pub const MAINTAINABILITY_BASE: i32 = 85;
    pub const MAINTAINABILITY_LINES_PER_POINT: usize = 20;
    pub const MAINTAINABILITY_FLOOR: i32 = 45;
}

/// Low-confidence scores given to source that fails to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackCalibration;

impl FallbackCalibration {
    pub const COMPLEXITY: u8 = 65;
    pub const READABILITY: u8 = 20;
    pub const MAINTAINABILITY: u8 = 25;
}

/// Weights of the overall score, in tenths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallWeights;

impl OverallWeights {
    pub const COMPLEXITY: u32 = 4;
    pub const READABILITY: u32 = 3;
    pub const MAINTAINABILITY: u32 = 3;
}

/// Nesting depth thresholds for conditional findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestingCalibration;

impl NestingCalibration {
    pub const MIN_REPORTED_DEPTH: usize = 3;
    pub const HIGH_SEVERITY_DEPTH: usize = 4;
}
