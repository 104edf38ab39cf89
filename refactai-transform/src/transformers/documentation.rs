//! Documentation placeholders
//!
//! Finds public function declarations by pattern and inserts a placeholder
//! where the language expects documentation: a docstring as the first body
//! statement in Python, a doc-comment block above the declaration in the
//! C-family. A declaration that already has documentation is left alone, so
//! the rule is a fixed point on its own output.

use super::{RuleInput, RuleOutput, Transformer};
use crate::{
    edits::TextEdit,
    lexical::NonCode,
    types::{DocKind, Improvement, RuleKind},
    Result,
};
use lazy_static::lazy_static;
use refactai_core::Language;
use refactai_utils::{indent_width, indentation, is_blank};
use regex::Regex;

pub const PYTHON_PLACEHOLDER: &str = "\"\"\"TODO: Add function description\"\"\"";

const JSDOC_PLACEHOLDER: &[&str] = &["/**", " * TODO: Add function description", " */"];
const JAVADOC_PLACEHOLDER: &[&str] = &["/**", " * TODO: Add method description", " */"];
const RUST_PLACEHOLDER: &[&str] = &["/// TODO: Add function description"];

/// How far a Python signature may wrap before it is ignored
const MAX_HEADER_LINES: usize = 50;

lazy_static! {
    static ref PYTHON_DEF: Regex =
        Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").expect("valid python def regex");
    static ref PYTHON_STRING_START: Regex =
        Regex::new(r#"^[rRuUbBfF]{0,2}["']"#).expect("valid python string regex");
    static ref JS_DECLARATIONS: Vec<Regex> = vec![
        Regex::new(r"^\s*(?:export\s+(?:default\s+)?)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(")
            .expect("valid js function regex"),
        Regex::new(
            r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|[A-Za-z_$][\w$]*\s*=>)"
        )
        .expect("valid js binding regex"),
    ];
    static ref JAVA_METHOD: Regex =
        Regex::new(r"^\s*(?:public|protected)\s+((?:[\w<>\[\],.?]+\s+)*?)(\w+)\s*\(").expect("valid java regex");
    static ref RUST_FN: Regex = Regex::new(
        r#"^\s*pub(?:\([^)]*\))?\s+(?:(?:const|async|unsafe)\s+)*(?:extern\s+"[^"]*"\s+)?fn\s+(\w+)"#
    )
    .expect("valid rust regex");
}

const JAVA_TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record", "new", "@interface"];

/// Inserts placeholder documentation for undocumented public functions
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentationInserter;

impl DocumentationInserter {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for DocumentationInserter {
    fn kind(&self) -> RuleKind {
        RuleKind::Documentation
    }

    fn applies_to(&self, language: Language) -> bool {
        language == Language::Python
            || language == Language::Java
            || language == Language::Rust
            || language.is_javascript_family()
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<RuleOutput> {
        if !self.applies_to(input.language) {
            return Ok(RuleOutput::default());
        }
        let lines = SourceLines::new(input.source);
        let non_code = NonCode::scan(input.source, input.language);

        let mut output = RuleOutput::default();
        if input.language == Language::Python {
            document_python(&lines, &non_code, &mut output);
        } else {
            document_braced(&lines, &non_code, input.language, &mut output);
        }
        Ok(output)
    }
}

/// Lines of a text with the byte offset each starts at
struct SourceLines<'a> {
    lines: Vec<&'a str>,
    offsets: Vec<usize>,
}

impl<'a> SourceLines<'a> {
    fn new(source: &'a str) -> Self {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut offsets = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            offsets.push(offset);
            offset += line.len() + 1;
        }
        Self { lines, offsets }
    }

    /// Offset of the first non-whitespace character of a line
    fn code_start(&self, index: usize) -> usize {
        self.offsets[index] + indentation(self.lines[index]).len()
    }
}

fn document_python(lines: &SourceLines<'_>, non_code: &NonCode, output: &mut RuleOutput) {
    for (index, line) in lines.lines.iter().enumerate() {
        let Some(captures) = PYTHON_DEF.captures(line) else {
            continue;
        };
        if non_code.contains(lines.code_start(index)) {
            continue;
        }
        let name = &captures[1];
        if name.starts_with('_') {
            continue;
        }
        let Some(header_end) = python_header_end(&lines.lines, index) else {
            continue;
        };
        let Some(body) = (header_end + 1..lines.lines.len()).find(|&j| {
            let trimmed = lines.lines[j].trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        }) else {
            continue;
        };

        let body_line = lines.lines[body];
        if indent_width(body_line) <= indent_width(line) {
            continue;
        }
        if PYTHON_STRING_START.is_match(body_line.trim_start()) {
            continue;
        }

        let text = format!("{}{PYTHON_PLACEHOLDER}\n", indentation(body_line));
        output.edits.push(TextEdit::insert(lines.offsets[header_end + 1], text));
        output.improvements.push(Improvement::DocPlaceholder { name: name.to_string(), kind: DocKind::Docstring });
    }
}

/// Index of the line whose `:` ends a signature starting at `start`
fn python_header_end(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth: i32 = 0;

    for (index, line) in lines.iter().enumerate().skip(start).take(MAX_HEADER_LINES) {
        let mut quote: Option<char> = None;
        let mut code_end = line.len();
        let mut escaped = false;

        for (position, c) in line.char_indices() {
            if let Some(open) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == open {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some(c),
                '#' => {
                    code_end = position;
                    break;
                }
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => depth -= 1,
                _ => {}
            }
        }

        if depth <= 0 {
            return line[..code_end].trim_end().ends_with(':').then_some(index);
        }
    }
    None
}

fn document_braced(lines: &SourceLines<'_>, non_code: &NonCode, language: Language, output: &mut RuleOutput) {
    let (placeholder, kind) = match language {
        Language::Java => (JAVADOC_PLACEHOLDER, DocKind::Javadoc),
        Language::Rust => (RUST_PLACEHOLDER, DocKind::DocComment),
        _ => (JSDOC_PLACEHOLDER, DocKind::JsDoc),
    };

    for (index, line) in lines.lines.iter().enumerate() {
        let Some(name) = declared_name(line, language) else {
            continue;
        };
        if name.starts_with('_') || non_code.contains(lines.code_start(index)) {
            continue;
        }

        let anchor = annotation_block_start(&lines.lines, index);
        if anchor > 0 && is_doc_line(lines.lines[anchor - 1]) {
            continue;
        }

        let indent = indentation(line);
        let text: String = placeholder.iter().map(|part| format!("{indent}{part}\n")).collect();
        output.edits.push(TextEdit::insert(lines.offsets[anchor], text));
        output.improvements.push(Improvement::DocPlaceholder { name, kind });
    }
}

fn declared_name(line: &str, language: Language) -> Option<String> {
    match language {
        Language::Java => {
            let captures = JAVA_METHOD.captures(line)?;
            let modifiers = captures.get(1).map_or("", |m| m.as_str());
            if modifiers.split_whitespace().any(|word| JAVA_TYPE_KEYWORDS.contains(&word)) {
                return None;
            }
            Some(captures[2].to_string())
        }
        Language::Rust => RUST_FN.captures(line).map(|c| c[1].to_string()),
        _ => JS_DECLARATIONS
            .iter()
            .find_map(|re| re.captures(line))
            .map(|c| c[1].to_string()),
    }
}

/// First line of the annotation or attribute lines directly above `index`
fn annotation_block_start(lines: &[&str], index: usize) -> usize {
    let mut anchor = index;
    while anchor > 0 {
        let previous = lines[anchor - 1].trim_start();
        if previous.starts_with('@') || previous.starts_with("#[") {
            anchor -= 1;
        } else {
            break;
        }
    }
    anchor
}

fn is_doc_line(line: &str) -> bool {
    if is_blank(line) {
        return false;
    }
    let trimmed = line.trim();
    trimmed.starts_with("//") || trimmed.starts_with('*') || trimmed.starts_with("/*") || trimmed.ends_with("*/")
}
