//! Quality Grades
//!
//! Boundaries used to turn an overall score into a human-readable grade for
//! reports.

use serde::{Deserialize, Serialize};

/// Overall score boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityGrades;

impl QualityGrades {
    pub const EXCELLENT: u8 = 90;
    pub const GOOD: u8 = 80;
    pub const FAIR: u8 = 70;

    /// Get quality status description
    ///
    /// # Arguments
    /// * `overall` - Overall score in 0..=100
    ///
    /// # Returns
    /// A grade label
    pub fn get_quality_status(overall: u8) -> &'static str {
        match overall {
            s if s >= Self::EXCELLENT => "Excellent",
            s if s >= Self::GOOD => "Good",
            s if s >= Self::FAIR => "Fair",
            _ => "Poor",
        }
    }

    /// Whether a file with this score should be offered for transformation
    pub fn needs_improvement(overall: u8) -> bool {
        overall < Self::GOOD
    }
}
