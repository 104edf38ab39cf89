//! Analysis engines
//!
//! Quality scoring, nested-conditional detection and refactoring advice.
//! Every engine here is a pure function of its input plus an immutable
//! configuration, so one instance can be shared across worker threads.

pub mod nesting;
pub mod quality;
pub mod suggestions;

pub use nesting::NestingDetector;
pub use quality::QualityScorer;
pub use suggestions::suggest_refactors;

use crate::language::Language;

/// Groups of languages that share advice wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdviceFamily {
    Python,
    JavaLike,
    JavaScript,
    Rust,
    Generic,
}

impl AdviceFamily {
    pub(crate) fn of(language: Language) -> Self {
        match language {
            Language::Python => Self::Python,
            Language::Java | Language::CSharp | Language::Kotlin | Language::Scala => Self::JavaLike,
            Language::JavaScript | Language::Jsx | Language::TypeScript | Language::Tsx => Self::JavaScript,
            Language::Rust => Self::Rust,
            _ => Self::Generic,
        }
    }

    /// One-line advice attached to each nesting finding
    pub(crate) fn finding_text(self) -> &'static str {
        match self {
            Self::Python => "Extract nested conditions into separate functions or use guard clauses",
            Self::JavaLike => "Extract nested conditions into separate methods or use early returns",
            Self::JavaScript | Self::Rust => "Extract nested conditions into separate functions or use early returns",
            Self::Generic => "Consider refactoring nested conditions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_family() {
        assert_eq!(AdviceFamily::of(Language::Tsx), AdviceFamily::JavaScript);
        assert_eq!(AdviceFamily::of(Language::Kotlin), AdviceFamily::JavaLike);
        assert_eq!(AdviceFamily::of(Language::Go), AdviceFamily::Generic);
        assert_eq!(
            AdviceFamily::of(Language::Unknown).finding_text(),
            "Consider refactoring nested conditions"
        );
    }
}
