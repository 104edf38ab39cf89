//! Language tags and per-language capabilities
//!
//! [`Language`] is the closed dispatch key for every component. Languages
//! with a tree-sitter grammar take the structured path; everything else is
//! analysed heuristically.

pub mod classifier;

pub use classifier::{classify, detect_from_content};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported languages plus an explicit unknown case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    // Structured - tree-sitter grammars
    Python,
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Java,
    Rust,

    // Heuristic
    C,
    Cpp,
    CSharp,
    Go,
    Ruby,
    Php,
    Kotlin,
    Swift,
    Scala,
    Shell,

    Unknown,
}

/// How a language delimits nested blocks, for line-level scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Braces,
    Indentation,
}

impl Language {
    /// All tags in dispatch order
    pub fn all() -> &'static [Self] {
        &[
            Self::Python, Self::JavaScript, Self::Jsx, Self::TypeScript, Self::Tsx, Self::Java,
            Self::Rust, Self::C, Self::Cpp, Self::CSharp, Self::Go, Self::Ruby, Self::Php,
            Self::Kotlin, Self::Swift, Self::Scala, Self::Shell, Self::Unknown,
        ]
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::Jsx => "JSX",
            Self::TypeScript => "TypeScript",
            Self::Tsx => "TSX",
            Self::Java => "Java",
            Self::Rust => "Rust",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::CSharp => "C#",
            Self::Go => "Go",
            Self::Ruby => "Ruby",
            Self::Php => "PHP",
            Self::Kotlin => "Kotlin",
            Self::Swift => "Swift",
            Self::Scala => "Scala",
            Self::Shell => "Shell",
            Self::Unknown => "Unknown",
        }
    }

    /// File extensions claimed by this language (lowercase, without the dot)
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "pyw", "pyi", "pyx"],
            Self::JavaScript => &["js", "mjs", "cjs"],
            Self::Jsx => &["jsx"],
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
            Self::Java => &["java"],
            Self::Rust => &["rs"],
            Self::C => &["c", "h"],
            Self::Cpp => &["cpp", "cc", "cxx", "c++", "hpp", "hxx", "hh", "h++"],
            Self::CSharp => &["cs", "csx"],
            Self::Go => &["go"],
            Self::Ruby => &["rb", "rbw", "rake"],
            Self::Php => &["php", "phtml", "php3", "php4", "php5"],
            Self::Kotlin => &["kt", "kts"],
            Self::Swift => &["swift"],
            Self::Scala => &["scala", "sc"],
            Self::Shell => &["sh", "bash", "zsh", "ksh"],
            Self::Unknown => &[],
        }
    }

    /// Look up a language by extension, case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|lang| lang.extensions().contains(&extension.as_str()))
    }

    /// Tree-sitter grammar, when the language has one
    pub fn tree_sitter_language(self) -> Option<tree_sitter::Language> {
        match self {
            Self::Python => Some(tree_sitter_python::language()),
            Self::JavaScript | Self::Jsx => Some(tree_sitter_javascript::language()),
            Self::TypeScript => Some(tree_sitter_typescript::language_typescript()),
            Self::Tsx => Some(tree_sitter_typescript::language_tsx()),
            Self::Java => Some(tree_sitter_java::language()),
            Self::Rust => Some(tree_sitter_rust::language()),
            _ => None,
        }
    }

    /// Whether syntax trees can be built for this language
    pub fn has_structured_parser(self) -> bool {
        self.tree_sitter_language().is_some()
    }

    /// Block delimiting used by the line scanners
    pub fn block_style(self) -> BlockStyle {
        match self {
            Self::Python | Self::Ruby | Self::Shell | Self::Unknown => BlockStyle::Indentation,
            _ => BlockStyle::Braces,
        }
    }

    /// True for the JavaScript family of dialects
    pub fn is_javascript_family(self) -> bool {
        matches!(self, Self::JavaScript | Self::Jsx | Self::TypeScript | Self::Tsx)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Self::Python),
            "javascript" | "js" => Ok(Self::JavaScript),
            "jsx" => Ok(Self::Jsx),
            "typescript" | "ts" => Ok(Self::TypeScript),
            "tsx" => Ok(Self::Tsx),
            "java" => Ok(Self::Java),
            "rust" | "rs" => Ok(Self::Rust),
            "c" => Ok(Self::C),
            "c++" | "cpp" => Ok(Self::Cpp),
            "c#" | "csharp" | "cs" => Ok(Self::CSharp),
            "go" | "golang" => Ok(Self::Go),
            "ruby" | "rb" => Ok(Self::Ruby),
            "php" => Ok(Self::Php),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "swift" => Ok(Self::Swift),
            "scala" => Ok(Self::Scala),
            "shell" | "sh" | "bash" => Ok(Self::Shell),
            "unknown" | "generic" => Ok(Self::Unknown),
            _ => Err(format!("Unknown language: '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".RS"), Some(Language::Rust));
        assert_eq!(Language::from_extension("tsx"), Some(Language::Tsx));
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("hpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_extensions_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for lang in Language::all() {
            for ext in lang.extensions() {
                assert!(seen.insert(*ext), "extension {ext} claimed twice");
            }
        }
    }

    #[test]
    fn test_structured_capability() {
        for lang in [Language::Python, Language::Jsx, Language::Tsx, Language::Java, Language::Rust] {
            assert!(lang.has_structured_parser(), "{lang} should be structured");
        }
        for lang in [Language::C, Language::Cpp, Language::Go, Language::Unknown] {
            assert!(!lang.has_structured_parser(), "{lang} should be heuristic");
        }
    }

    #[test]
    fn test_name_round_trip() {
        for lang in Language::all() {
            assert_eq!(lang.name().parse::<Language>(), Ok(*lang));
        }
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"csharp\"");
        let back: Language = serde_json::from_str("\"typescript\"").unwrap();
        assert_eq!(back, Language::TypeScript);
    }
}
