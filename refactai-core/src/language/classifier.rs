//! Language classification from a path and a content sample
//!
//! Extension lookup comes first. Two ambiguous extensions are refined by
//! sniffing the content (`.js` family for JSX markup, `.h` for C++). Files
//! without a known extension fall back to shebang lines, then weighted
//! content patterns, then well-known file names.

use super::Language;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// Number of leading lines inspected by content sniffing
const SNIFF_LINES: usize = 50;

lazy_static! {
    static ref CONTENT_PATTERNS: Vec<(Language, Vec<Regex>)> = vec![
        (Language::Python, compile(&[
            r"^\s*def\s+\w+\s*\(",
            r"^\s*class\s+\w+\s*[\(:]",
            r"^\s*import\s+\w+",
            r"^\s*from\s+[\w.]+\s+import",
            r#"if\s+__name__\s*==\s*["']__main__["']"#,
        ])),
        (Language::JavaScript, compile(&[
            r"function\s+\w+\s*\(",
            r"\bvar\s+\w+\s*=",
            r"\bconst\s+\w+\s*=",
            r"console\.log\s*\(",
            r"require\s*\(",
            r"module\.exports",
        ])),
        (Language::Jsx, compile(&[
            r"</[A-Za-z][\w.]*>",
            r"className\s*=",
            r"onClick\s*=",
            r"useState\s*\(",
            r"useEffect\s*\(",
            r"import\s+React",
        ])),
        (Language::TypeScript, compile(&[
            r"\binterface\s+\w+\s*\{",
            r"\btype\s+\w+\s*=",
            r"export\s+interface",
            r"export\s+type",
            r":\s*(?:string|number|boolean|void)\b",
        ])),
        (Language::Java, compile(&[
            r"public\s+class\s+\w+",
            r"private\s+\w+\s+\w+\s*;",
            r"public\s+static\s+void\s+main",
            r"import\s+java\.",
            r"^\s*package\s+[\w.]+\s*;",
        ])),
        (Language::Cpp, compile(&[
            r"#include\s*<\w+>",
            r"using\s+namespace\s+std",
            r"std::\w+",
            r"\btemplate\s*<",
            r"\bcout\s*<<",
        ])),
        (Language::C, compile(&[
            r"#include\s*<\w+\.h>",
            r"int\s+main\s*\(",
            r"printf\s*\(",
            r"scanf\s*\(",
            r"malloc\s*\(",
        ])),
        (Language::CSharp, compile(&[
            r"using\s+System",
            r"^\s*namespace\s+[\w.]+",
            r"Console\.WriteLine",
            r"\{\s*get;\s*set;\s*\}",
        ])),
        (Language::Php, compile(&[
            r"<\?php",
            r"\$\w+\s*=",
            r"\becho\s+",
        ])),
        (Language::Ruby, compile(&[
            r"^\s*def\s+\w+[?!]?\s*$",
            r#"require\s+["']\w+["']"#,
            r"\bputs\s+",
            r"^\s*end\s*$",
        ])),
        (Language::Go, compile(&[
            r"^\s*package\s+\w+\s*$",
            r"\bfunc\s+(?:\([^)]*\)\s*)?\w+\s*\(",
            r"fmt\.Print",
            r":=",
        ])),
        (Language::Rust, compile(&[
            r"\bfn\s+\w+\s*[<(]",
            r"\blet\s+mut\s+\w+",
            r"^\s*use\s+\w+(::\w+)*",
            r"println!\s*\(",
            r"\bimpl\b",
        ])),
    ];

    static ref JSX_MARKUP: Vec<Regex> = compile(&[
        r"</[A-Za-z][\w.]*>",
        r"<[A-Za-z][\w.]*(?:\s+[^<>]*)?/>",
        r"className\s*=",
        r"onClick\s*=",
        r"useState\s*\(",
        r"useEffect\s*\(",
        r"import\s+React",
        r"return\s*\(?\s*<[A-Za-z]",
    ]);

    static ref CPP_CONSTRUCTS: Vec<Regex> = compile(&[
        r"\bclass\s+\w+\s*(?::[^{;]*)?\{",
        r"\bnamespace\s+\w+",
        r"\btemplate\s*<",
        r"std::",
        r"^\s*(?:public|private|protected)\s*:",
        r"\bvirtual\s+",
    ]);

    static ref SHEBANG: Regex = Regex::new(r"^#!\s*(?:/usr)?/bin/(?:env\s+)?(\w+)").expect("valid shebang pattern");
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?im){p}")).expect("valid content pattern"))
        .collect()
}

fn sample(content: &str) -> String {
    content.lines().take(SNIFF_LINES).collect::<Vec<_>>().join("\n")
}

/// Number of distinct patterns that match at least once
fn distinct_matches(patterns: &[Regex], sample: &str) -> usize {
    patterns.iter().filter(|re| re.is_match(sample)).count()
}

/// Classify a file. Never fails: anything unrecognised is [`Language::Unknown`].
pub fn classify(path: &Path, content: &str) -> Language {
    let extension = path.extension().and_then(|ext| ext.to_str());

    if let Some(language) = extension.and_then(Language::from_extension) {
        let refined = refine(language, content);
        if refined != language {
            debug!("Reclassified {} from {} to {}", path.display(), language, refined);
        }
        return refined;
    }

    if let Some(language) = from_shebang(content) {
        return language;
    }

    if let Some(language) = detect_from_content(content) {
        return language;
    }

    from_file_name(path).unwrap_or(Language::Unknown)
}

/// Dialect refinement for extensions that cover more than one language
fn refine(language: Language, content: &str) -> Language {
    match language {
        Language::JavaScript if distinct_matches(&JSX_MARKUP, &sample(content)) >= 2 => Language::Jsx,
        Language::C if distinct_matches(&CPP_CONSTRUCTS, &sample(content)) >= 1 => Language::Cpp,
        other => other,
    }
}

fn from_shebang(content: &str) -> Option<Language> {
    let first = content.lines().next()?;
    let interpreter = SHEBANG.captures(first)?.get(1)?.as_str();
    match interpreter {
        i if i.starts_with("python") => Some(Language::Python),
        "node" | "nodejs" => Some(Language::JavaScript),
        "ruby" => Some(Language::Ruby),
        "php" => Some(Language::Php),
        "sh" | "bash" | "zsh" | "ksh" | "dash" => Some(Language::Shell),
        _ => None,
    }
}

fn from_file_name(path: &Path) -> Option<Language> {
    let name = path.file_name()?.to_str()?.to_lowercase();
    if name.contains("makefile") || name.contains("dockerfile") || name.contains("containerfile") {
        return Some(Language::Shell);
    }
    match name.as_str() {
        "rakefile" | "gemfile" => Some(Language::Ruby),
        ".bashrc" | ".bash_profile" | ".zshrc" | ".profile" => Some(Language::Shell),
        _ => None,
    }
}

/// Best-scoring language by weighted content patterns, or `None`
///
/// The weight of a language is the total number of pattern matches in the
/// first lines of the file. Ties go to the earlier entry in the table.
pub fn detect_from_content(content: &str) -> Option<Language> {
    let sample = sample(content);
    if sample.trim().is_empty() {
        return None;
    }

    let mut best: Option<(Language, usize)> = None;
    for (language, patterns) in CONTENT_PATTERNS.iter() {
        let score: usize = patterns.iter().map(|re| re.find_iter(&sample).count()).sum();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((*language, score));
        }
    }

    best.map(|(language, _)| language)
}
