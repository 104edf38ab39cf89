//! Scoring configuration
//!
//! Every threshold and weight the scorer and detector use lives in
//! [`ScoringConfig`]. The defaults reproduce the calibrated constants in
//! [`crate::constants`]; a TOML, JSON or YAML file may override any subset.

use crate::constants::{
    HeuristicCalibration, LineCountCalibration, NestingCalibration, StructuredCalibration,
};
use crate::language::Language;
use crate::models::QualityMetrics;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Configuration format version understood by this build
pub const CONFIG_VERSION: u32 = 1;

/// Thresholds and weights for every scoring strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub version: u32,
    pub structured: StructuredThresholds,
    /// Keyword-count profiles for languages without a grammar
    pub heuristic: BTreeMap<Language, KeywordProfile>,
    /// Line-count strategy for languages with neither
    pub generic: LineCountProfile,
    /// Scores assigned when a structured parse fails
    pub fallback: QualityMetrics,
    pub nesting: NestingThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let c_family = KeywordProfile::c_family();
        let mut heuristic = BTreeMap::new();
        heuristic.insert(Language::C, c_family.clone());
        heuristic.insert(Language::Cpp, c_family);

        Self {
            version: CONFIG_VERSION,
            structured: StructuredThresholds::default(),
            heuristic,
            generic: LineCountProfile::default(),
            fallback: QualityMetrics::fallback(),
            nesting: NestingThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Load a possibly partial configuration file over the defaults
    pub fn load(path: &Path) -> crate::Result<Self> {
        let config: Self = refactai_utils::load_config_with_defaults(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot honour
    pub fn validate(&self) -> crate::Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(crate::Error::Config(format!(
                "unsupported scoring config version {} (expected {CONFIG_VERSION})",
                self.version
            )));
        }

        let ratios = [
            ("structured.low_comment_ratio", self.structured.low_comment_ratio),
            ("structured.high_comment_ratio", self.structured.high_comment_ratio),
            ("structured.low_doc_ratio", self.structured.low_doc_ratio),
            ("structured.high_doc_ratio", self.structured.high_doc_ratio),
        ];
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(crate::Error::Config(format!("{name} must be within 0..=1, got {ratio}")));
            }
        }

        let fallback = [
            ("fallback.complexity", self.fallback.complexity),
            ("fallback.readability", self.fallback.readability),
            ("fallback.maintainability", self.fallback.maintainability),
        ];
        for (name, score) in fallback {
            if score > 100 {
                return Err(crate::Error::Config(format!("{name} must be within 0..=100, got {score}")));
            }
        }

        if self.nesting.min_depth == 0 || self.nesting.high_severity_depth < self.nesting.min_depth {
            return Err(crate::Error::Config(
                "nesting.high_severity_depth must be at least nesting.min_depth, which must be positive".to_string(),
            ));
        }

        for (language, profile) in &self.heuristic {
            if language.has_structured_parser() {
                return Err(crate::Error::Config(format!(
                    "{language} has a grammar and cannot take a keyword profile"
                )));
            }
            profile.compile().map_err(|e| crate::Error::Config(format!("{language}: {e}")))?;
        }

        Ok(())
    }
}

/// Thresholds for the syntax-tree scoring path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredThresholds {
    pub complexity_weight: i32,
    pub complexity_floor: i32,
    pub long_line: usize,
    pub long_line_penalty: i32,
    pub low_comment_ratio: f64,
    pub low_comment_penalty: i32,
    pub high_comment_ratio: f64,
    pub high_comment_bonus: i32,
    pub naming_penalty: i32,
    pub long_function_lines: usize,
    pub long_function_penalty: i32,
    pub medium_function_lines: usize,
    pub medium_function_penalty: i32,
    pub low_doc_ratio: f64,
    pub low_doc_penalty: i32,
    pub high_doc_ratio: f64,
    pub high_doc_bonus: i32,
}

impl Default for StructuredThresholds {
    fn default() -> Self {
        Self {
            complexity_weight: StructuredCalibration::COMPLEXITY_WEIGHT,
            complexity_floor: StructuredCalibration::COMPLEXITY_FLOOR,
            long_line: StructuredCalibration::LONG_LINE,
            long_line_penalty: StructuredCalibration::LONG_LINE_PENALTY,
            low_comment_ratio: StructuredCalibration::LOW_COMMENT_RATIO,
            low_comment_penalty: StructuredCalibration::LOW_COMMENT_PENALTY,
            high_comment_ratio: StructuredCalibration::HIGH_COMMENT_RATIO,
            high_comment_bonus: StructuredCalibration::HIGH_COMMENT_BONUS,
            naming_penalty: StructuredCalibration::NAMING_PENALTY,
            long_function_lines: StructuredCalibration::LONG_FUNCTION_LINES,
            long_function_penalty: StructuredCalibration::LONG_FUNCTION_PENALTY,
            medium_function_lines: StructuredCalibration::MEDIUM_FUNCTION_LINES,
            medium_function_penalty: StructuredCalibration::MEDIUM_FUNCTION_PENALTY,
            low_doc_ratio: StructuredCalibration::LOW_DOC_RATIO,
            low_doc_penalty: StructuredCalibration::LOW_DOC_PENALTY,
            high_doc_ratio: StructuredCalibration::HIGH_DOC_RATIO,
            high_doc_bonus: StructuredCalibration::HIGH_DOC_BONUS,
        }
    }
}

impl StructuredThresholds {
    /// Maintainability penalty for one function body span
    pub fn function_length_penalty(&self, span: usize) -> i32 {
        if span > self.long_function_lines {
            self.long_function_penalty
        } else if span > self.medium_function_lines {
            self.medium_function_penalty
        } else {
            0
        }
    }
}

/// When a pattern rule adjusts maintainability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Once per match
    PerMatch,
    /// Once if there is at least one match
    Present,
    /// Once if there is no match
    Absent,
    /// Once if there are more than this many matches
    MoreThan(usize),
}

/// A regex-driven maintainability adjustment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub name: String,
    /// Regex, matched in multi-line mode
    pub pattern: String,
    pub trigger: Trigger,
    /// Added to maintainability when triggered (negative for penalties)
    pub adjustment: i32,
}

impl PatternRule {
    pub fn new(name: &str, pattern: &str, trigger: Trigger, adjustment: i32) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            trigger,
            adjustment,
        }
    }

    /// Adjustment for a given match count
    pub fn adjustment_for(&self, matches: usize) -> i32 {
        match self.trigger {
            Trigger::PerMatch => self
                .adjustment
                .saturating_mul(i32::try_from(matches).unwrap_or(i32::MAX)),
            Trigger::Present if matches > 0 => self.adjustment,
            Trigger::Absent if matches == 0 => self.adjustment,
            Trigger::MoreThan(limit) if matches > limit => self.adjustment,
            _ => 0,
        }
    }
}

/// Keyword-count scoring for a language without a grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordProfile {
    /// Branching keywords, matched as whole words
    pub keywords: Vec<String>,
    pub keyword_weight: i32,
    pub complexity_floor: i32,
    pub long_line: usize,
    pub long_line_penalty: i32,
    /// A line containing any marker counts as a comment line
    pub comment_markers: Vec<String>,
    pub min_comment_ratio: f64,
    pub low_comment_penalty: i32,
    pub rules: Vec<PatternRule>,
}

impl Default for KeywordProfile {
    fn default() -> Self {
        Self::c_family()
    }
}

impl KeywordProfile {
    /// Profile for C and C++
    pub fn c_family() -> Self {
        Self {
            keywords: ["if", "else", "for", "while", "switch", "case"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            keyword_weight: HeuristicCalibration::KEYWORD_WEIGHT,
            complexity_floor: StructuredCalibration::COMPLEXITY_FLOOR,
            long_line: HeuristicCalibration::LONG_LINE,
            long_line_penalty: HeuristicCalibration::LONG_LINE_PENALTY,
            comment_markers: vec!["//".to_string(), "/*".to_string()],
            min_comment_ratio: HeuristicCalibration::MIN_COMMENT_RATIO,
            low_comment_penalty: HeuristicCalibration::LOW_COMMENT_PENALTY,
            rules: vec![
                PatternRule::new(
                    "excess_includes",
                    r"^\s*#include\b",
                    Trigger::MoreThan(HeuristicCalibration::MAX_INCLUDES),
                    -HeuristicCalibration::EXCESS_INCLUDE_PENALTY,
                ),
                PatternRule::new(
                    "function_definitions",
                    r"\w+\s+\w+\s*\([^)]*\)\s*\{",
                    Trigger::Present,
                    HeuristicCalibration::FUNCTION_DEFINITION_BONUS,
                ),
            ],
        }
    }

    /// Compile the keyword matcher and every rule pattern
    pub fn compile(&self) -> std::result::Result<CompiledProfile, regex::Error> {
        let keywords = if self.keywords.is_empty() {
            None
        } else {
            let alternation = self
                .keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"\b(?:{alternation})\b"))?)
        };

        let rules = self
            .rules
            .iter()
            .map(|rule| Ok((rule.clone(), Regex::new(&format!("(?m){}", rule.pattern))?)))
            .collect::<std::result::Result<Vec<_>, regex::Error>>()?;

        Ok(CompiledProfile { profile: self.clone(), keywords, rules })
    }
}

/// A keyword profile with its regexes compiled
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub profile: KeywordProfile,
    pub keywords: Option<Regex>,
    pub rules: Vec<(PatternRule, Regex)>,
}

/// Line-count scoring used when a language has no grammar and no profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineCountProfile {
    pub complexity_base: i32,
    pub complexity_lines_per_point: usize,
    pub complexity_floor: i32,
    pub readability_base: i32,
    pub long_line: usize,
    pub long_line_penalty: i32,
    pub readability_floor: i32,
    pub maintainability_base: i32,
    pub maintainability_lines_per_point: usize,
    pub maintainability_floor: i32,
}

impl Default for LineCountProfile {
    fn default() -> Self {
        Self {
            complexity_base: LineCountCalibration::COMPLEXITY_BASE,
            complexity_lines_per_point: LineCountCalibration::COMPLEXITY_LINES_PER_POINT,
            complexity_floor: LineCountCalibration::COMPLEXITY_FLOOR,
            readability_base: LineCountCalibration::READABILITY_BASE,
            long_line: LineCountCalibration::LONG_LINE,
            long_line_penalty: LineCountCalibration::LONG_LINE_PENALTY,
            readability_floor: LineCountCalibration::READABILITY_FLOOR,
            maintainability_base: LineCountCalibration::MAINTAINABILITY_BASE,
            maintainability_lines_per_point: LineCountCalibration::MAINTAINABILITY_LINES_PER_POINT,
            maintainability_floor: LineCountCalibration::MAINTAINABILITY_FLOOR,
        }
    }
}

/// Depth thresholds for nested-conditional findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NestingThresholds {
    pub min_depth: usize,
    pub high_severity_depth: usize,
}

impl Default for NestingThresholds {
    fn default() -> Self {
        Self {
            min_depth: NestingCalibration::MIN_REPORTED_DEPTH,
            high_severity_depth: NestingCalibration::HIGH_SEVERITY_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.heuristic.contains_key(&Language::Cpp));
        assert!(!config.heuristic.contains_key(&Language::Go));
    }

    #[test]
    fn test_function_length_penalty() {
        let thresholds = StructuredThresholds::default();
        assert_eq!(thresholds.function_length_penalty(10), 0);
        assert_eq!(thresholds.function_length_penalty(30), 0);
        assert_eq!(thresholds.function_length_penalty(31), 5);
        assert_eq!(thresholds.function_length_penalty(50), 5);
        assert_eq!(thresholds.function_length_penalty(51), 10);
    }

    #[test]
    fn test_pattern_rule_triggers() {
        let per_match = PatternRule::new("vars", r"\bvar\b", Trigger::PerMatch, -5);
        assert_eq!(per_match.adjustment_for(3), -15);

        let more_than = PatternRule::new("includes", "#include", Trigger::MoreThan(10), -10);
        assert_eq!(more_than.adjustment_for(10), 0);
        assert_eq!(more_than.adjustment_for(11), -10);

        let absent = PatternRule::new("functions", r"function", Trigger::Absent, -20);
        assert_eq!(absent.adjustment_for(0), -20);
        assert_eq!(absent.adjustment_for(1), 0);
    }

    #[test]
    fn test_partial_toml_overrides() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scoring.toml");
        std::fs::write(
            &path,
            "[structured]\nlong_line = 80\n\n[nesting]\nmin_depth = 2\nhigh_severity_depth = 3\n",
        )?;

        let config = ScoringConfig::load(&path)?;
        assert_eq!(config.structured.long_line, 80);
        assert_eq!(config.structured.long_line_penalty, 2);
        assert_eq!(config.nesting.min_depth, 2);
        assert_eq!(config.heuristic.len(), 2);
        Ok(())
    }

    #[test]
    fn test_heuristic_profile_from_json() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scoring.json");
        std::fs::write(
            &path,
            r#"{"heuristic": {"go": {"keywords": ["if", "for", "switch", "case"], "keyword_weight": 3,
                "rules": [{"name": "goroutines", "pattern": "\\bgo\\s+\\w+\\(", "trigger": {"more_than": 20}, "adjustment": -5}]}}}"#,
        )?;

        let config = ScoringConfig::load(&path)?;
        let go = config.heuristic.get(&Language::Go).expect("go profile");
        assert_eq!(go.keyword_weight, 3);
        assert_eq!(go.rules[0].trigger, Trigger::MoreThan(20));
        // unspecified profile fields keep the C-family defaults
        assert_eq!(go.long_line, 100);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_version() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scoring.yaml");
        std::fs::write(&path, "version: 7\n")?;
        assert!(matches!(ScoringConfig::load(&path), Err(crate::Error::Config(_))));
        Ok(())
    }

    #[test]
    fn test_rejects_fallback_above_100() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("scoring.toml");
        std::fs::write(&path, "[fallback]\ncomplexity = 200\nreadability = 20\nmaintainability = 25\n")?;

        let error = ScoringConfig::load(&path).unwrap_err();
        assert!(error.to_string().contains("fallback.complexity must be within 0..=100, got 200"));

        let mut config = ScoringConfig::default();
        config.fallback.maintainability = 101;
        assert!(config.validate().is_err());
        config.fallback.maintainability = 100;
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_rejects_profile_for_structured_language() {
        let mut config = ScoringConfig::default();
        config.heuristic.insert(Language::Python, KeywordProfile::c_family());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_rule_regex() {
        let mut config = ScoringConfig::default();
        let mut profile = KeywordProfile::c_family();
        profile.rules.push(PatternRule::new("broken", "(", Trigger::Present, 1));
        config.heuristic.insert(Language::C, profile);
        assert!(config.validate().is_err());
    }
}
