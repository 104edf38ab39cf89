//! Central Transformation Engine
//!
//! [`TransformationEngine`] owns the rule catalogue and runs it over one
//! source text. [`RefactorEngine`] is the facade the CLI and other callers
//! use: classification, scoring, nesting detection, transformation and
//! validation behind one immutable, shareable value.

use crate::{
    edits::apply_edits,
    transformers::{
        BooleanSimplifier, DocumentationInserter, LongFunctionFlagger, RuleInput, Transformer,
        TypeHintFlagger, VarDeclarationReplacer, WhitespaceCleaner,
    },
    types::{Improvement, RuleKind, TransformResult},
    validation::validate,
    Result, TransformError,
};
use refactai_core::constants::StructuredCalibration;
use refactai_core::{
    classify, suggest_refactors, Language, NestedConditionalFinding, NestingDetector, QualityMetrics,
    QualityScorer, RefactorSuggestion, ScoringConfig, SourceUnit, StructuralAnalyzer, StructuralView,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for the transformation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thresholds for the scorer and the nesting detector
    pub scoring: ScoringConfig,
    /// Functions spanning more lines than this are flagged
    pub long_function_lines: usize,
    /// Rules left out of the catalogue
    pub disabled_rules: Vec<RuleKind>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            long_function_lines: StructuredCalibration::LONG_FUNCTION_LINES,
            disabled_rules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load a possibly partial configuration file over the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = refactai_utils::load_config_with_defaults(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.long_function_lines == 0 {
            return Err(TransformError::Config("long_function_lines must be positive".to_string()));
        }
        self.scoring.validate()?;
        Ok(())
    }

    pub fn is_enabled(&self, rule: RuleKind) -> bool {
        !self.disabled_rules.contains(&rule)
    }
}

/// Runs the rule catalogue over source text
pub struct TransformationEngine {
    /// Registered rules, iterated in catalogue order
    transformers: BTreeMap<RuleKind, Box<dyn Transformer>>,
}

impl std::fmt::Debug for TransformationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationEngine")
            .field("rules", &self.available_rules())
            .finish()
    }
}

impl Default for TransformationEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl TransformationEngine {
    /// Create an engine with every enabled rule registered
    pub fn new(config: &EngineConfig) -> Self {
        let mut engine = Self { transformers: BTreeMap::new() };
        engine.register_default_transformers(config);
        engine
    }

    /// Create an engine with no rules
    pub fn empty() -> Self {
        Self { transformers: BTreeMap::new() }
    }

    fn register_default_transformers(&mut self, config: &EngineConfig) {
        let defaults: Vec<Box<dyn Transformer>> = vec![
            Box::new(BooleanSimplifier),
            Box::new(LongFunctionFlagger::new(config.long_function_lines)),
            Box::new(TypeHintFlagger),
            Box::new(DocumentationInserter),
            Box::new(VarDeclarationReplacer),
            Box::new(WhitespaceCleaner),
        ];

        for transformer in defaults {
            if config.is_enabled(transformer.kind()) {
                self.register_transformer(transformer);
            }
        }
    }

    /// Register a rule, replacing any rule of the same kind
    pub fn register_transformer(&mut self, transformer: Box<dyn Transformer>) {
        let kind = transformer.kind();
        if self.transformers.insert(kind, transformer).is_some() {
            debug!("Replaced transformer for {}", kind);
        }
    }

    /// Registered rules in catalogue order
    pub fn available_rules(&self) -> Vec<RuleKind> {
        self.transformers.keys().copied().collect()
    }

    /// Run every applicable rule over `source`
    ///
    /// Never fails: a rule error yields an unsuccessful result carrying the
    /// original text.
    pub fn transform(&self, source: &str, language: Language) -> TransformResult {
        match self.run_rules(source, language) {
            Ok((transformed_code, improvements)) => {
                let validation = validate(source, &transformed_code, language);
                TransformResult { success: true, transformed_code, improvements, validation, error: None }
            }
            Err(error) => {
                warn!("Transformation of {} source failed: {}", language, error);
                TransformResult::failure(source, validate(source, source, language), error.to_string())
            }
        }
    }

    fn run_rules(&self, source: &str, language: Language) -> Result<(String, Vec<Improvement>)> {
        let mut improvements = Vec::new();
        let mut current = self.run_structural(source, language, &mut improvements)?;

        for (kind, transformer) in &self.transformers {
            if kind.is_structural() || !transformer.applies_to(language) {
                continue;
            }
            let output = transformer
                .apply(&RuleInput::text(&current, language))
                .map_err(|e| rule_error(*kind, e))?;
            if !output.edits.is_empty() {
                current = apply_edits(&current, &output.edits).map_err(|e| rule_error(*kind, e))?;
            }
            improvements.extend(output.improvements);
        }

        Ok((current, improvements))
    }

    /// Structural rules share one parse; their edits are applied together
    fn run_structural(&self, source: &str, language: Language, improvements: &mut Vec<Improvement>) -> Result<String> {
        let rules: Vec<(RuleKind, &dyn Transformer)> = self
            .transformers
            .iter()
            .filter(|(kind, transformer)| kind.is_structural() && transformer.applies_to(language))
            .map(|(kind, transformer)| (*kind, transformer.as_ref()))
            .collect();
        if rules.is_empty() {
            return Ok(source.to_string());
        }

        let tree = match StructuralAnalyzer::view(source, language) {
            StructuralView::Tree(tree) => tree,
            StructuralView::Broken(error) => {
                debug!("Skipping structural rules for unparseable {} source: {}", language, error);
                return Ok(source.to_string());
            }
            StructuralView::Text => return Ok(source.to_string()),
        };

        let input = RuleInput::structural(&tree);
        let mut edits = Vec::new();
        for (kind, transformer) in rules {
            let output = transformer.apply(&input).map_err(|e| rule_error(kind, e))?;
            edits.extend(output.edits);
            improvements.extend(output.improvements);
        }
        apply_edits(source, &edits)
    }
}

fn rule_error(rule: RuleKind, error: TransformError) -> TransformError {
    match error {
        TransformError::Rule { .. } => error,
        other => TransformError::Rule { rule, message: other.to_string() },
    }
}

/// Before/after summary of one processed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub language: Language,
    pub metrics_before: QualityMetrics,
    pub metrics_after: QualityMetrics,
    pub overall_before: u8,
    pub overall_after: u8,
    /// `overall_after - overall_before`
    pub delta: i16,
    pub findings: Vec<NestedConditionalFinding>,
    pub suggestions: Vec<RefactorSuggestion>,
    pub transform: TransformResult,
}

/// Scoring, detection and transformation behind one value
///
/// Holds only immutable configuration and compiled rules, so one engine can
/// be shared by reference across worker threads.
#[derive(Debug, Default)]
pub struct RefactorEngine {
    config: EngineConfig,
    scorer: QualityScorer,
    detector: NestingDetector,
    transformer: TransformationEngine,
}

impl RefactorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from a validated configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scorer = QualityScorer::new(config.scoring.clone())?;
        let detector = NestingDetector::new(config.scoring.nesting);
        let transformer = TransformationEngine::new(&config);
        info!("Refactor engine ready with rules: {:?}", transformer.available_rules());
        Ok(Self { config, scorer, detector, transformer })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transformation_engine(&self) -> &TransformationEngine {
        &self.transformer
    }

    /// Replace the rule catalogue, e.g. to register custom rules
    pub fn with_transformation_engine(mut self, transformer: TransformationEngine) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn classify(&self, path: &Path, content: &str) -> Language {
        classify(path, content)
    }

    pub fn score(&self, content: &str, language: Language) -> QualityMetrics {
        self.scorer.score(content, language)
    }

    pub fn overall_score(&self, metrics: &QualityMetrics) -> u8 {
        QualityScorer::overall(metrics)
    }

    pub fn detect_nested_conditionals(&self, content: &str, language: Language) -> Vec<NestedConditionalFinding> {
        self.detector.detect(content, language)
    }

    pub fn suggest_refactors(
        &self,
        content: &str,
        language: Language,
        findings: &[NestedConditionalFinding],
    ) -> Vec<RefactorSuggestion> {
        suggest_refactors(content, language, findings)
    }

    /// Transform `content`; an unknown language is classified from `path`
    pub fn transform(&self, content: &str, language: Language, path: &Path) -> TransformResult {
        let language = if language == Language::Unknown { classify(path, content) } else { language };
        debug!("Transforming {} as {}", path.display(), language);
        self.transformer.transform(content, language)
    }

    pub fn validate(&self, original: &str, transformed: &str, language: Language) -> crate::ValidationResult {
        validate(original, transformed, language)
    }

    /// Score, detect, transform and re-score one unit
    pub fn process(&self, unit: &SourceUnit) -> FileReport {
        let metrics_before = self.score(&unit.content, unit.language);
        let findings = self.detect_nested_conditionals(&unit.content, unit.language);
        let suggestions = self.suggest_refactors(&unit.content, unit.language, &findings);
        let transform = self.transform(&unit.content, unit.language, &unit.path);
        let metrics_after = self.score(&transform.transformed_code, unit.language);

        let overall_before = self.overall_score(&metrics_before);
        let overall_after = self.overall_score(&metrics_after);
        debug!(
            "{}: overall {} -> {}, {} findings, {} improvements",
            unit.path.display(),
            overall_before,
            overall_after,
            findings.len(),
            transform.improvements.len()
        );

        FileReport {
            path: unit.path.clone(),
            language: unit.language,
            metrics_before,
            metrics_after,
            overall_before,
            overall_after,
            delta: i16::from(overall_after) - i16::from(overall_before),
            findings,
            suggestions,
            transform,
        }
    }
}
