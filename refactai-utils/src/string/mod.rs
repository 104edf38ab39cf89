//! Line-oriented text helpers
//!
//! Every helper treats `\n` as the only line separator and never touches
//! a `\r` that is not trailing whitespace, so splitting and joining always
//! reproduce the input byte for byte.

/// Split text into lines on `\n`; a trailing newline yields a final empty line
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Inverse of [`split_lines`]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// True for empty or whitespace-only lines
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Leading whitespace of a line
pub fn indentation(line: &str) -> &str {
    let trimmed = line.trim_start();
    &line[..line.len() - trimmed.len()]
}

/// Width of the leading whitespace, tabs counted as four columns
pub fn indent_width(line: &str) -> usize {
    indentation(line)
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Collapse every run of two or more blank lines into a single empty line
///
/// Lines for which `frozen` returns true (by 0-based index) are kept as they
/// are and end any run. Returns `None` when the text has no such run.
pub fn collapse_blank_lines(text: &str, frozen: impl Fn(usize) -> bool) -> Option<String> {
    let lines = split_lines(text);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut changed = false;
    let mut run = 0usize;

    for (i, line) in lines.iter().enumerate() {
        // The empty tail after a final newline is not a line of its own
        let is_tail = i + 1 == lines.len() && line.is_empty() && i > 0;
        if is_blank(line) && !is_tail && !frozen(i) {
            run += 1;
            if run == 1 {
                let next_blank = lines.get(i + 1).is_some_and(|next| is_blank(next) && !frozen(i + 1));
                out.push(if next_blank { "" } else { line });
            } else {
                changed = true;
            }
            continue;
        }
        run = 0;
        out.push(line);
    }

    if !changed {
        return None;
    }
    Some(join_lines(&out))
}

/// Remove trailing spaces, tabs and carriage returns from every line not `frozen`
///
/// Returns `None` when no such line carries trailing whitespace.
pub fn strip_trailing_whitespace(text: &str, frozen: impl Fn(usize) -> bool) -> Option<String> {
    let lines = split_lines(text);
    let stripped: Vec<&str> =
        lines.iter().enumerate().map(|(i, l)| if frozen(i) { *l } else { l.trim_end() }).collect();
    if stripped.iter().zip(&lines).all(|(after, before)| after.len() == before.len()) {
        return None;
    }
    Some(join_lines(&stripped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_join_round_trip() {
        let text = "a\n\nb\n";
        let lines = split_lines(text);
        assert_eq!(lines, vec!["a", "", "b", ""]);
        assert_eq!(join_lines(&lines), text);
    }

    #[test]
    fn test_indentation() {
        assert_eq!(indentation("    x = 1"), "    ");
        assert_eq!(indentation("\tx"), "\t");
        assert_eq!(indentation("x"), "");
        assert_eq!(indent_width("\t  x"), 6);
    }

    #[test]
    fn test_collapse_three_blank_lines() {
        let text = "a = 1\n\n\n\nb = 2\n";
        assert_eq!(collapse_blank_lines(text, |_| false), Some("a = 1\n\nb = 2\n".to_string()));
    }

    #[test]
    fn test_collapse_whitespace_only_run() {
        let text = "a\n   \n\t\nb";
        assert_eq!(collapse_blank_lines(text, |_| false), Some("a\n\nb".to_string()));
    }

    #[test]
    fn test_single_blank_line_untouched() {
        assert_eq!(collapse_blank_lines("a\n\nb\n", |_| false), None);
        assert_eq!(collapse_blank_lines("", |_| false), None);
        assert_eq!(collapse_blank_lines("\n", |_| false), None);
    }

    #[test]
    fn test_frozen_lines_are_kept() {
        let text = "a\n\n\n\nb\n\n\nc";
        // lines 1..=3 belong to something that must not change
        assert_eq!(collapse_blank_lines(text, |i| (1..=3).contains(&i)), Some("a\n\n\n\nb\n\nc".to_string()));
        assert_eq!(collapse_blank_lines("a\n\n\nb", |_| true), None);

        assert_eq!(strip_trailing_whitespace("a  \nb  \n", |i| i == 0), Some("a  \nb\n".to_string()));
        assert_eq!(strip_trailing_whitespace("a  \nb\n", |i| i == 0), None);
    }

    #[test]
    fn test_strip_trailing_whitespace() {
        assert_eq!(
            strip_trailing_whitespace("a  \nb\t\nc", |_| false),
            Some("a\nb\nc".to_string())
        );
        assert_eq!(strip_trailing_whitespace("a\nb\n", |_| false), None);
        assert_eq!(strip_trailing_whitespace("a\r\nb", |_| false), Some("a\nb".to_string()));
    }

    proptest! {
        #[test]
        fn collapse_is_a_fixed_point(text in "[ab \t\n]{0,64}") {
            let once = collapse_blank_lines(&text, |_| false).unwrap_or_else(|| text.clone());
            prop_assert_eq!(collapse_blank_lines(&once, |_| false), None);
        }

        #[test]
        fn strip_is_a_fixed_point(text in "[ab \t\r\n]{0,64}") {
            let once = strip_trailing_whitespace(&text, |_| false).unwrap_or_else(|| text.clone());
            prop_assert_eq!(strip_trailing_whitespace(&once, |_| false), None);
        }

        #[test]
        fn split_then_join_is_identity(text in "[a-z \n]{0,64}") {
            prop_assert_eq!(join_lines(&split_lines(&text)), text);
        }
    }
}
