//! Quality Scorer - complexity, readability and maintainability per source unit
//!
//! Three strategies, chosen by what the language offers:
//! - structured: branch points, comments, naming and documentation read off a syntax tree
//! - keyword profile: weighted keyword counts and regex rules for configured languages
//! - line count: size-based estimates for everything else
//!
//! A structured language whose text fails to parse gets the configured
//! fallback metrics instead of an error.

use crate::config::{CompiledProfile, LineCountProfile, ScoringConfig, StructuredThresholds};
use crate::language::Language;
use crate::models::QualityMetrics;
use crate::syntax::{StructuralAnalyzer, StructuralView, SyntaxTree};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Structural facts gathered from one syntax tree
#[derive(Debug, Default)]
struct StructuredFacts {
    branch_points: usize,
    long_lines: usize,
    comment_lines: usize,
    non_blank_lines: usize,
    misnamed: usize,
    function_spans: Vec<usize>,
    documented_functions: usize,
}

/// Scores source units against an immutable [`ScoringConfig`]
#[derive(Debug, Clone)]
pub struct QualityScorer {
    config: ScoringConfig,
    profiles: BTreeMap<Language, CompiledProfile>,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::build(ScoringConfig::default())
    }
}

impl QualityScorer {
    /// Validate the configuration and compile its keyword profiles
    pub fn new(config: ScoringConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScoringConfig) -> Self {
        let profiles = config
            .heuristic
            .iter()
            .filter_map(|(language, profile)| match profile.compile() {
                Ok(compiled) => Some((*language, compiled)),
                Err(e) => {
                    warn!("Dropping keyword profile for {}: {}", language, e);
                    None
                }
            })
            .collect();
        Self { config, profiles }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score source text in a given language
    pub fn score(&self, source: &str, language: Language) -> QualityMetrics {
        match StructuralAnalyzer::view(source, language) {
            StructuralView::Tree(tree) => self.score_tree(&tree),
            StructuralView::Broken(error) => {
                debug!("Using fallback metrics for unparseable {} source: {}", language, error);
                let fallback = self.config.fallback;
                QualityMetrics::clamped(
                    i32::from(fallback.complexity),
                    i32::from(fallback.readability),
                    i32::from(fallback.maintainability),
                )
            }
            StructuralView::Text => match self.profiles.get(&language) {
                Some(profile) => score_with_profile(source, profile),
                None => score_by_line_count(source, &self.config.generic),
            },
        }
    }

    /// Overall score of a set of metrics
    pub fn overall(metrics: &QualityMetrics) -> u8 {
        metrics.overall()
    }

    /// Score an already parsed tree
    pub fn score_tree(&self, tree: &SyntaxTree<'_>) -> QualityMetrics {
        let facts = gather_facts(tree, &self.config.structured);
        let thresholds = &self.config.structured;

        let complexity = (100 - thresholds.complexity_weight.saturating_mul(as_score(facts.branch_points + 1)))
            .clamp(thresholds.complexity_floor.min(100), 100);

        QualityMetrics::clamped(
            complexity,
            structured_readability(&facts, thresholds),
            structured_maintainability(&facts, thresholds),
        )
    }
}

fn gather_facts(tree: &SyntaxTree<'_>, thresholds: &StructuredThresholds) -> StructuredFacts {
    let grammar = tree.grammar();
    let source = tree.source();

    let mut facts = StructuredFacts {
        branch_points: tree.branch_points(),
        comment_lines: tree.comment_lines(),
        ..StructuredFacts::default()
    };

    for line in source.split('\n') {
        if line.chars().count() > thresholds.long_line {
            facts.long_lines += 1;
        }
        if !line.trim().is_empty() {
            facts.non_blank_lines += 1;
        }
    }

    for function in tree.functions() {
        if !grammar.function_naming.accepts(&function.name) {
            facts.misnamed += 1;
        }
        if function.documented {
            facts.documented_functions += 1;
        }
        facts.function_spans.push(function.span());
    }

    facts.misnamed += tree
        .classes()
        .iter()
        .filter(|class| !grammar.class_naming.accepts(&class.name))
        .count();

    facts
}

fn structured_readability(facts: &StructuredFacts, thresholds: &StructuredThresholds) -> i32 {
    let mut score = 100 - thresholds.long_line_penalty.saturating_mul(as_score(facts.long_lines));

    if facts.non_blank_lines > 0 {
        let ratio = ratio(facts.comment_lines, facts.non_blank_lines);
        if ratio < thresholds.low_comment_ratio {
            score -= thresholds.low_comment_penalty;
        } else if ratio > thresholds.high_comment_ratio {
            score += thresholds.high_comment_bonus;
        }
    }

    score.saturating_sub(thresholds.naming_penalty.saturating_mul(as_score(facts.misnamed)))
}

fn structured_maintainability(facts: &StructuredFacts, thresholds: &StructuredThresholds) -> i32 {
    let mut score: i32 = 100;

    for span in &facts.function_spans {
        score = score.saturating_sub(thresholds.function_length_penalty(*span));
    }

    if !facts.function_spans.is_empty() {
        let coverage = ratio(facts.documented_functions, facts.function_spans.len());
        if coverage < thresholds.low_doc_ratio {
            score -= thresholds.low_doc_penalty;
        } else if coverage > thresholds.high_doc_ratio {
            score += thresholds.high_doc_bonus;
        }
    }

    score
}

/// Keyword-count scoring for languages with a configured profile
fn score_with_profile(source: &str, compiled: &CompiledProfile) -> QualityMetrics {
    let profile = &compiled.profile;

    let keyword_hits = compiled
        .keywords
        .as_ref()
        .map_or(0, |re| re.find_iter(source).count());
    let complexity = (100 - profile.keyword_weight.saturating_mul(as_score(keyword_hits)))
        .clamp(profile.complexity_floor.min(100), 100);

    let mut long_lines = 0usize;
    let mut comment_lines = 0usize;
    let mut non_blank = 0usize;
    for line in source.split('\n') {
        if line.chars().count() > profile.long_line {
            long_lines += 1;
        }
        if profile.comment_markers.iter().any(|marker| line.contains(marker.as_str())) {
            comment_lines += 1;
        }
        if !line.trim().is_empty() {
            non_blank += 1;
        }
    }

    let mut readability = 100 - profile.long_line_penalty.saturating_mul(as_score(long_lines));
    if non_blank > 0 && ratio(comment_lines, non_blank) < profile.min_comment_ratio {
        readability -= profile.low_comment_penalty;
    }

    let maintainability = compiled.rules.iter().fold(100i32, |score, (rule, re)| {
        score.saturating_add(rule.adjustment_for(re.find_iter(source).count()))
    });

    QualityMetrics::clamped(complexity, readability, maintainability)
}

/// Size-based estimates for languages with neither grammar nor profile
fn score_by_line_count(source: &str, profile: &LineCountProfile) -> QualityMetrics {
    let non_blank = source.split('\n').filter(|line| !line.trim().is_empty()).count();
    let long_lines = source
        .split('\n')
        .filter(|line| line.chars().count() > profile.long_line)
        .count();

    let complexity = (profile.complexity_base - as_score(non_blank / profile.complexity_lines_per_point.max(1)))
        .clamp(profile.complexity_floor.min(100), 100);
    let readability = (profile.readability_base - profile.long_line_penalty.saturating_mul(as_score(long_lines)))
        .clamp(profile.readability_floor.min(100), 100);
    let maintainability = (profile.maintainability_base
        - as_score(non_blank / profile.maintainability_lines_per_point.max(1)))
    .clamp(profile.maintainability_floor.min(100), 100);

    QualityMetrics::clamped(complexity, readability, maintainability)
}

fn as_score(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}
