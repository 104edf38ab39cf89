//! Comment and string ranges
//!
//! Textual rules match declarations with regexes; matches that start inside
//! a comment or a string literal are ignored. Whitespace cleanup leaves the
//! inside of multi-line string literals alone.

use refactai_core::language::{BlockStyle, Language};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Comment,
    Literal,
}

/// Byte ranges of comments and string literals, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonCode {
    ranges: Vec<Range<usize>>,
    literals: Vec<Range<usize>>,
}

impl NonCode {
    pub fn scan(source: &str, language: Language) -> Self {
        let spans = if language == Language::Python {
            scan_python(source)
        } else if language.block_style() == BlockStyle::Braces {
            scan_c_family(source)
        } else {
            scan_hash_comments(source)
        };
        let literals = spans.iter().filter(|(_, kind)| *kind == Kind::Literal).map(|(range, _)| range.clone()).collect();
        Self { ranges: spans.into_iter().map(|(range, _)| range).collect(), literals }
    }

    /// Whether byte `offset` lies inside a comment or string
    pub fn contains(&self, offset: usize) -> bool {
        covers(&self.ranges, offset)
    }

    /// Whether byte `offset` lies inside a string literal
    pub fn in_literal(&self, offset: usize) -> bool {
        covers(&self.literals, offset)
    }
}

fn covers(ranges: &[Range<usize>], offset: usize) -> bool {
    let index = ranges.partition_point(|range| range.end <= offset);
    ranges.get(index).is_some_and(|range| range.start <= offset)
}

fn scan_c_family(source: &str) -> Vec<(Range<usize>, Kind)> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                ranges.push((start..i, Kind::Comment));
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                ranges.push((start..i, Kind::Comment));
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i = skip_quoted(bytes, i, quote, quote == b'`');
                ranges.push((start..i, Kind::Literal));
            }
            _ => i += 1,
        }
    }
    ranges
}

fn scan_python(source: &str) -> Vec<(Range<usize>, Kind)> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                ranges.push((start..i, Kind::Comment));
            }
            quote @ (b'"' | b'\'') => {
                let triple = bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote);
                if triple {
                    i += 3;
                    while i < bytes.len()
                        && !(bytes[i] == quote && bytes.get(i + 1) == Some(&quote) && bytes.get(i + 2) == Some(&quote))
                    {
                        i += if bytes[i] == b'\\' { 2 } else { 1 };
                    }
                    i = (i + 3).min(bytes.len());
                } else {
                    i = skip_quoted(bytes, i, quote, false);
                }
                ranges.push((start..i, Kind::Literal));
            }
            _ => i += 1,
        }
    }
    ranges
}

fn scan_hash_comments(source: &str) -> Vec<(Range<usize>, Kind)> {
    let bytes = source.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        match bytes[i] {
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                ranges.push((start..i, Kind::Comment));
            }
            quote @ (b'"' | b'\'') => {
                i = skip_quoted(bytes, i, quote, false);
                ranges.push((start..i, Kind::Literal));
            }
            _ => i += 1,
        }
    }
    ranges
}

/// End of a quoted literal opened at `start`; single-line unless `multiline`
fn skip_quoted(bytes: &[u8], start: usize, quote: u8, multiline: bool) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if !multiline => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}
