//! Quality metrics model

use crate::constants::{FallbackCalibration, OverallWeights};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complexity, readability and maintainability sub-scores, each in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub complexity: u8,
    pub readability: u8,
    pub maintainability: u8,
}

impl QualityMetrics {
    pub fn new(complexity: u8, readability: u8, maintainability: u8) -> Self {
        Self {
            complexity: complexity.min(100),
            readability: readability.min(100),
            maintainability: maintainability.min(100),
        }
    }

    /// Build from unclamped intermediate scores
    pub fn clamped(complexity: i32, readability: i32, maintainability: i32) -> Self {
        Self {
            complexity: clamp_score(complexity),
            readability: clamp_score(readability),
            maintainability: clamp_score(maintainability),
        }
    }

    /// Scores given to source that should parse but does not
    pub fn fallback() -> Self {
        Self {
            complexity: FallbackCalibration::COMPLEXITY,
            readability: FallbackCalibration::READABILITY,
            maintainability: FallbackCalibration::MAINTAINABILITY,
        }
    }

    /// Weighted overall score: round(0.4c + 0.3r + 0.3m), halves rounded up.
    ///
    /// Computed in tenths so the rounding is exact.
    pub fn overall(&self) -> u8 {
        let tenths = OverallWeights::COMPLEXITY * u32::from(self.complexity)
            + OverallWeights::READABILITY * u32::from(self.readability)
            + OverallWeights::MAINTAINABILITY * u32::from(self.maintainability);
        // at most 1000, so the quotient fits in u8 after clamping
        u8::try_from((tenths + 5) / 10).unwrap_or(100).min(100)
    }
}

fn clamp_score(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(0)
}

impl fmt::Display for QualityMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "complexity {}, readability {}, maintainability {} (overall {})",
            self.complexity,
            self.readability,
            self.maintainability,
            self.overall()
        )
    }
}
