//! Source unit model

use crate::language::{classify, Language};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One file's text and language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub language: Language,
    pub content: String,
}

impl SourceUnit {
    /// Build a unit, classifying the language from path and content
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let language = classify(&path, &content);
        Self { path, language, content }
    }

    /// Build a unit with a known language
    pub fn with_language(path: impl Into<PathBuf>, language: Language, content: impl Into<String>) -> Self {
        Self { path: path.into(), language, content: content.into() }
    }

    /// Read and classify a file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(path, content))
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of lines, counting a final line without newline
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_classifies() {
        let unit = SourceUnit::new("src/app.py", "print('hi')\n");
        assert_eq!(unit.language, Language::Python);
        assert_eq!(unit.line_count(), 1);
        assert!(!unit.is_empty());
    }

    #[test]
    fn test_with_language_keeps_tag() {
        let unit = SourceUnit::with_language("snippet", Language::Rust, "");
        assert_eq!(unit.language, Language::Rust);
        assert!(unit.is_empty());
    }

    #[test]
    fn test_from_file() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("Main.java");
        std::fs::write(&path, "class Main {}\n")?;

        let unit = SourceUnit::from_file(&path)?;
        assert_eq!(unit.language, Language::Java);
        assert_eq!(unit.content, "class Main {}\n");
        Ok(())
    }
}
