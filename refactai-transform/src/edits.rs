//! Text edits
//!
//! Rules never mutate a tree. They describe replacements of byte ranges in
//! the text they were given, and all edits of one pass are applied together.

use crate::{Result, TransformError};
use serde::{Deserialize, Serialize};

/// Replace `start..end` (bytes) with `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self { start, end, replacement: replacement.into() }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    /// Replace the whole of `source`
    pub fn whole(source: &str, replacement: impl Into<String>) -> Self {
        Self::replace(0, source.len(), replacement)
    }
}

/// Apply non-overlapping edits to `source` in one pass
///
/// Insertions at the same offset keep their given order. Any edit outside
/// the text, off a character boundary, or overlapping another is an error and
/// nothing is applied.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (edit.start, edit.end));

    for edit in &ordered {
        if edit.start > edit.end
            || edit.end > source.len()
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            return Err(TransformError::InvalidEdit { start: edit.start, end: edit.end, len: source.len() });
        }
    }
    for pair in ordered.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if second.start < first.end {
            return Err(TransformError::OverlappingEdits { first_end: first.end, second_start: second.start });
        }
    }

    let mut result = source.to_string();
    for edit in ordered.iter().rev() {
        result.replace_range(edit.start..edit.end, &edit.replacement);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_in_one_pass() {
        let source = "if x == True:\n    pass\n";
        let edits = vec![
            TextEdit::replace(3, 12, "x"),
            TextEdit::insert(0, "# checked\n"),
        ];
        assert_eq!(apply_edits(source, &edits).unwrap(), "# checked\nif x:\n    pass\n");
    }

    #[test]
    fn test_no_edits_returns_source() {
        assert_eq!(apply_edits("abc", &[]).unwrap(), "abc");
    }

    #[test]
    fn test_overlapping_edits_are_rejected() {
        let edits = vec![TextEdit::replace(0, 4, "a"), TextEdit::replace(2, 6, "b")];
        assert!(matches!(
            apply_edits("0123456789", &edits),
            Err(TransformError::OverlappingEdits { first_end: 4, second_start: 2 })
        ));
    }

    #[test]
    fn test_out_of_range_edit_is_rejected() {
        let edits = vec![TextEdit::replace(2, 40, "x")];
        assert!(matches!(apply_edits("short", &edits), Err(TransformError::InvalidEdit { .. })));
    }

    #[test]
    fn test_char_boundary_is_checked() {
        // 'é' is two bytes
        let edits = vec![TextEdit::replace(1, 2, "x")];
        assert!(apply_edits("é", &edits).is_err());
    }

    #[test]
    fn test_adjacent_edits_and_insertions() {
        let edits = vec![
            TextEdit::replace(0, 1, "A"),
            TextEdit::replace(1, 2, "B"),
            TextEdit::insert(2, "-"),
        ];
        assert_eq!(apply_edits("abc", &edits).unwrap(), "AB-c");
    }

    #[test]
    fn test_whole_replacement() {
        let source = "a  \n";
        assert_eq!(apply_edits(source, &[TextEdit::whole(source, "a\n")]).unwrap(), "a\n");
    }
}
