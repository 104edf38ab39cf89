//! Whitespace cleanup, the last rule of the catalogue
//!
//! Blank lines and trailing whitespace inside multi-line string literals
//! (Python triple quotes, template literals) belong to the string and are
//! left as they are.

use super::{RuleInput, RuleOutput, Transformer};
use crate::{edits::TextEdit, lexical::NonCode, types::{Improvement, RuleKind}, Result};
use refactai_core::Language;
use refactai_utils::{collapse_blank_lines, strip_trailing_whitespace};

/// Collapses blank-line runs, then strips trailing whitespace
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceCleaner;

impl WhitespaceCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for WhitespaceCleaner {
    fn kind(&self) -> RuleKind {
        RuleKind::Cleanup
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        let mut output = RuleOutput::default();
        let mut current = input.source.to_string();

        let breaks = literal_line_breaks(&current, input.language);
        if let Some(collapsed) = collapse_blank_lines(&current, |i| i > 0 && breaks.get(i - 1).copied().unwrap_or(false)) {
            current = collapsed;
            output.improvements.push(Improvement::CollapsedBlankLines);
        }
        let breaks = literal_line_breaks(&current, input.language);
        if let Some(stripped) = strip_trailing_whitespace(&current, |i| breaks.get(i).copied().unwrap_or(false)) {
            current = stripped;
            output.improvements.push(Improvement::StrippedTrailingWhitespace);
        }

        if !output.improvements.is_empty() {
            output.edits.push(TextEdit::whole(input.source, current));
        }
        Ok(output)
    }
}

/// For each line break in `text`, whether it falls inside a string literal
fn literal_line_breaks(text: &str, language: Language) -> Vec<bool> {
    let non_code = NonCode::scan(text, language);
    text.match_indices('\n').map(|(offset, _)| non_code.in_literal(offset)).collect()
}
