//! Constants module for RefactAI core
//!
//! Calibrated thresholds, weights and grade boundaries. The defaults of
//! [`crate::ScoringConfig`] are built from these values.

pub mod quality_grades;
pub mod scoring_calibration;

pub use quality_grades::QualityGrades;
pub use scoring_calibration::{
    FallbackCalibration, HeuristicCalibration, LineCountCalibration, NestingCalibration,
    OverallWeights, StructuredCalibration,
};
