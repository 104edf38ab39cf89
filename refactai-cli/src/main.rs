//! RefactAI CLI Entry Point
//!
//! Classify, score, inspect and transform single files, or analyze a whole
//! tree in parallel and emit a JSON report.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use refactai_core::{Language, QualityGrades, QualityMetrics, SourceUnit};
use refactai_transform::{EngineConfig, FileReport, RefactorEngine, RuleKind};
use refactai_utils::logging::{init_logging, level_from_verbosity, LoggerConfig};
use serde::Serialize;
use similar::TextDiff;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into by `analyze`
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "__pycache__", "venv", "dist", "build"];

#[derive(Parser)]
#[command(name = "refactai")]
#[command(about = "RefactAI - Code quality scoring and rule-based refactoring")]
#[command(version)]
struct Cli {
    /// Scoring and transformation configuration (TOML, JSON or YAML)
    #[arg(short = 'c', long, global = true, env = "REFACTAI_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected language of a file
    Classify {
        file: PathBuf,
    },

    /// Print quality metrics for a file
    Score {
        file: PathBuf,

        /// Override the detected language
        #[arg(short = 'l', long)]
        language: Option<Language>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Report deeply nested conditionals
    Detect {
        file: PathBuf,

        #[arg(short = 'l', long)]
        language: Option<Language>,

        /// Include refactoring suggestions
        #[arg(short = 's', long)]
        suggest: bool,

        #[arg(long)]
        json: bool,
    },

    /// Apply the rule catalogue to a file
    Transform {
        file: PathBuf,

        #[arg(short = 'l', long)]
        language: Option<Language>,

        /// Write the result back to the file
        #[arg(short = 'w', long)]
        write: bool,

        /// Print a unified diff instead of the transformed text
        #[arg(short = 'd', long)]
        diff: bool,

        #[arg(long)]
        json: bool,
    },

    /// Score, inspect and transform every source file under a directory
    Analyze {
        directory: PathBuf,

        /// Write the JSON report here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Write transformed files back
        #[arg(short = 'w', long)]
        write: bool,
    },

    /// List the rule catalogue and whether each rule is enabled
    Rules,
}

/// Aggregate figures for an `analyze` run
#[derive(Debug, Serialize)]
struct Summary {
    files: usize,
    average_before: f64,
    average_after: f64,
    findings: usize,
    improvements: usize,
    failed_transforms: usize,
    /// Files still graded below "Good" after transformation
    needs_improvement: usize,
}

#[derive(Debug, Serialize)]
struct AnalysisReport {
    root: PathBuf,
    summary: Summary,
    files: Vec<FileReport>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggerConfig { level: level_from_verbosity(cli.verbose), ..LoggerConfig::default() })?;

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = RefactorEngine::with_config(config)?;

    match cli.command {
        Commands::Classify { file } => {
            let unit = SourceUnit::from_file(&file).with_context(|| format!("reading {}", file.display()))?;
            println!("{}", unit.language);
        }

        Commands::Score { file, language, json } => {
            let unit = read_unit(&file, language)?;
            let metrics = engine.score(&unit.content, unit.language);
            let overall = engine.overall_score(&metrics);

            if json {
                let value = serde_json::json!({
                    "path": unit.path,
                    "language": unit.language,
                    "metrics": metrics,
                    "overall": overall,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} ({})", unit.path.display(), unit.language);
                print_metrics(&metrics, overall);
            }
        }

        Commands::Detect { file, language, suggest, json } => {
            let unit = read_unit(&file, language)?;
            let findings = engine.detect_nested_conditionals(&unit.content, unit.language);
            let suggestions =
                if suggest { engine.suggest_refactors(&unit.content, unit.language, &findings) } else { Vec::new() };

            if json {
                let value = serde_json::json!({ "findings": findings, "suggestions": suggestions });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if findings.is_empty() {
                println!("No deeply nested conditionals found");
            } else {
                for finding in &findings {
                    println!(
                        "lines {}-{}: depth {} ({}) - {}",
                        finding.line_start, finding.line_end, finding.depth, finding.severity, finding.suggestion
                    );
                }
                for suggestion in &suggestions {
                    println!("\nLines {}-{}: {}", suggestion.line_range.0, suggestion.line_range.1, suggestion.suggestion);
                    for benefit in &suggestion.benefits {
                        println!("  - {benefit}");
                    }
                    if let Some(example) = &suggestion.example {
                        println!("{example}");
                    }
                }
            }
        }

        Commands::Transform { file, language, write, diff, json } => {
            let unit = read_unit(&file, language)?;
            let result = engine.transform(&unit.content, unit.language, &unit.path);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if diff {
                print!("{}", unified_diff(&unit.path, &unit.content, &result.transformed_code));
            } else if !write {
                print!("{}", result.transformed_code);
            }

            for label in result.labels() {
                eprintln!("applied: {label}");
            }
            for warning in result.warnings() {
                eprintln!("warning: {warning}");
            }

            if !result.success {
                bail!(
                    "transformation failed: {}",
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            if write && result.changed(&unit.content) {
                std::fs::write(&file, &result.transformed_code)
                    .with_context(|| format!("writing {}", file.display()))?;
                info!("Wrote {}", file.display());
            }
        }

        Commands::Analyze { directory, output, write } => {
            if !directory.is_dir() {
                bail!("{} is not a directory", directory.display());
            }
            let report = analyze(&engine, &directory, write)?;
            let json = serde_json::to_string_pretty(&report)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                    println!(
                        "Analyzed {} files, average overall {:.1} -> {:.1}, {} below Good; report saved to {}",
                        report.summary.files,
                        report.summary.average_before,
                        report.summary.average_after,
                        report.summary.needs_improvement,
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }

        Commands::Rules => {
            let enabled = engine.transformation_engine().available_rules();
            for rule in RuleKind::all() {
                let state = if enabled.contains(rule) { "enabled" } else { "disabled" };
                println!("{:<24} {:<36} {}", rule.as_str(), rule.display_name(), state);
            }
        }
    }

    Ok(())
}

fn read_unit(path: &Path, language: Option<Language>) -> Result<SourceUnit> {
    let unit = SourceUnit::from_file(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(match language {
        Some(language) => SourceUnit { language, ..unit },
        None => unit,
    })
}

fn print_metrics(metrics: &QualityMetrics, overall: u8) {
    println!("  complexity:      {:>3}", metrics.complexity);
    println!("  readability:     {:>3}", metrics.readability);
    println!("  maintainability: {:>3}", metrics.maintainability);
    println!("  overall:         {:>3} ({})", overall, QualityGrades::get_quality_status(overall));
}

fn unified_diff(path: &Path, before: &str, after: &str) -> String {
    let name = path.display().to_string();
    let diff = TextDiff::from_lines(before, after);
    let mut unified = diff.unified_diff();
    unified.context_radius(3).header(&format!("a/{name}"), &format!("b/{name}"));
    unified.to_string()
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0
        && entry.file_type().is_dir()
        && (name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()))
}

fn analyze(engine: &RefactorEngine, root: &Path, write: bool) -> Result<AnalysisReport> {
    let paths: Vec<PathBuf> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect();

    let files: Vec<FileReport> = paths
        .par_iter()
        .filter_map(|path| {
            let unit = match SourceUnit::from_file(path) {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    return None;
                }
            };
            if unit.language == Language::Unknown {
                return None;
            }
            let report = engine.process(&unit);
            if write && report.transform.success && report.transform.changed(&unit.content) {
                if let Err(e) = std::fs::write(path, &report.transform.transformed_code) {
                    warn!("Could not write {}: {}", path.display(), e);
                }
            }
            Some(report)
        })
        .collect();

    info!("Analyzed {} of {} files under {}", files.len(), paths.len(), root.display());
    Ok(AnalysisReport { root: root.to_path_buf(), summary: summarize(&files), files })
}

fn summarize(files: &[FileReport]) -> Summary {
    let average = |score: fn(&FileReport) -> u8| {
        if files.is_empty() {
            0.0
        } else {
            files.iter().map(|report| f64::from(score(report))).sum::<f64>() / files.len() as f64
        }
    };

    Summary {
        files: files.len(),
        average_before: average(|report| report.overall_before),
        average_after: average(|report| report.overall_after),
        findings: files.iter().map(|report| report.findings.len()).sum(),
        improvements: files.iter().map(|report| report.transform.improvements.len()).sum(),
        failed_transforms: files.iter().filter(|report| !report.transform.success).count(),
        needs_improvement: files
            .iter()
            .filter(|report| QualityGrades::needs_improvement(report.overall_after))
            .count(),
    }
}
