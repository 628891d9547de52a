//! Advanced pass: a fixed, ordered chain of named text substitutions over
//! the whole document.
//!
//! Order matters. Later steps assume earlier ones already ran (for example
//! `collapse_equals` expects comments to be gone), so the chain is a static
//! list and each step can be applied alone by name in tests.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::CompressError;

/// One named substitution in the advanced chain.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    action: fn(&str) -> Result<String, CompressError>,
}

impl Step {
    pub fn apply(&self, input: &str) -> Result<String, CompressError> {
        (self.action)(input)
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

static STEPS: [Step; 15] = [
    Step { name: "normalize_line_endings", action: normalize_line_endings },
    Step { name: "collapse_blank_lines", action: collapse_blank_lines },
    Step { name: "trim_lines", action: trim_lines },
    Step { name: "strip_block_comments", action: strip_block_comments },
    Step { name: "strip_line_comments", action: strip_line_comments },
    Step { name: "strip_markup_comments", action: strip_markup_comments },
    Step { name: "remove_debug_statements", action: remove_debug_statements },
    Step { name: "collapse_open_braces", action: collapse_open_braces },
    Step { name: "collapse_close_braces", action: collapse_close_braces },
    Step { name: "collapse_semicolons", action: collapse_semicolons },
    Step { name: "collapse_commas", action: collapse_commas },
    Step { name: "collapse_equals", action: collapse_equals },
    Step { name: "trim_brace_padding", action: trim_brace_padding },
    Step { name: "collapse_inline_whitespace", action: collapse_inline_whitespace },
    Step { name: "final_blank_lines", action: final_blank_lines },
];

/// Lines starting with one of these keep their indentation.
const STRUCTURE_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "if", "else", "for", "while", "switch", "case", "return",
    "class", "import", "export", "async", "interface", "type", "def", "fn", "pub", "struct",
    "enum", "impl", "use", "mod", "package", "func",
];

const ANNOTATION_MARKERS: &[&str] = &["@", "TODO", "FIXME", "NOTE", "IMPORTANT"];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid advanced-pass regex")
}

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| compile(r"\r\n?"));
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| compile(r"\n(?:[ \t]*\n){2,}"));
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)/\*.*?\*/"));
static LINE_COMMENT: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(
        r#"(?<![:\\"'])//(?![^\n]*(?:@|TODO|FIXME|NOTE|IMPORTANT))[^\n]*"#,
    )
    .expect("valid line-comment regex")
});
static MARKUP_COMMENT: Lazy<Regex> = Lazy::new(|| compile(r"(?s)<!--.*?-->"));
static DEBUG_LINE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?m)^[ \t]*(?:console\.(?:log|debug|trace)\(.*\)|debugger|dbg!\(.*\));?[ \t]*$\n?",
    )
});
static OPEN_BRACE: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]*\{[ \t]*"));
static CLOSE_BRACE: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]*\}[ \t]*"));
static SEMICOLON: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]*;[ \t]*"));
static COMMA: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]*,[ \t]*"));
static EQUALS: Lazy<Regex> = Lazy::new(|| compile(r"[ \t]*=[ \t]*"));
static PAD_AFTER_OPEN: Lazy<Regex> = Lazy::new(|| compile(r"\{\n(?:[ \t]*\n)+"));
static PAD_BEFORE_CLOSE: Lazy<Regex> = Lazy::new(|| compile(r"\n(?:[ \t]*\n)+([ \t]*)\}"));
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| compile(r"(\S)[ \t]{2,}"));

fn owned(out: Cow<'_, str>) -> String {
    out.into_owned()
}

fn normalize_line_endings(input: &str) -> Result<String, CompressError> {
    Ok(owned(LINE_ENDINGS.replace_all(input, "\n")))
}

fn collapse_blank_lines(input: &str) -> Result<String, CompressError> {
    Ok(owned(BLANK_RUNS.replace_all(input, "\n\n")))
}

fn starts_with_keyword(line: &str) -> bool {
    let trimmed = line.trim_start();
    STRUCTURE_KEYWORDS.iter().any(|kw| {
        trimmed
            .strip_prefix(kw)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

fn trim_lines(input: &str) -> Result<String, CompressError> {
    let lines: Vec<&str> = input
        .split('\n')
        .map(|line| if starts_with_keyword(line) { line.trim_end() } else { line.trim() })
        .collect();
    Ok(lines.join("\n"))
}

fn strip_block_comments(input: &str) -> Result<String, CompressError> {
    Ok(owned(BLOCK_COMMENT.replace_all(input, "")))
}

fn strip_line_comments(input: &str) -> Result<String, CompressError> {
    LINE_COMMENT
        .try_replacen(input, 0, "")
        .map(owned)
        .map_err(|err| CompressError::Step { step: "strip_line_comments", source: Box::new(err) })
}

fn strip_markup_comments(input: &str) -> Result<String, CompressError> {
    let out = MARKUP_COMMENT.replace_all(input, |caps: &Captures<'_>| {
        let comment = &caps[0];
        if ANNOTATION_MARKERS.iter().any(|m| comment.contains(m)) {
            comment.to_string()
        } else {
            String::new()
        }
    });
    Ok(owned(out))
}

fn remove_debug_statements(input: &str) -> Result<String, CompressError> {
    Ok(owned(DEBUG_LINE.replace_all(input, "")))
}

fn collapse_open_braces(input: &str) -> Result<String, CompressError> {
    Ok(owned(OPEN_BRACE.replace_all(input, "{")))
}

fn collapse_close_braces(input: &str) -> Result<String, CompressError> {
    Ok(owned(CLOSE_BRACE.replace_all(input, "}")))
}

fn collapse_semicolons(input: &str) -> Result<String, CompressError> {
    Ok(owned(SEMICOLON.replace_all(input, ";")))
}

fn collapse_commas(input: &str) -> Result<String, CompressError> {
    Ok(owned(COMMA.replace_all(input, ",")))
}

fn collapse_equals(input: &str) -> Result<String, CompressError> {
    Ok(owned(EQUALS.replace_all(input, "=")))
}

fn trim_brace_padding(input: &str) -> Result<String, CompressError> {
    let after_open = PAD_AFTER_OPEN.replace_all(input, "{\n");
    Ok(owned(PAD_BEFORE_CLOSE.replace_all(&after_open, "\n${1}}")))
}

fn collapse_inline_whitespace(input: &str) -> Result<String, CompressError> {
    Ok(owned(INLINE_WHITESPACE.replace_all(input, "${1} ")))
}

fn final_blank_lines(input: &str) -> Result<String, CompressError> {
    Ok(BLANK_RUNS.replace_all(input, "\n\n").trim().to_string())
}

/// The chain, in application order.
pub fn steps() -> &'static [Step] {
    &STEPS
}

/// Apply a single step by name. `None` if no step has that name.
pub fn apply_step(name: &str, input: &str) -> Option<Result<String, CompressError>> {
    STEPS.iter().find(|step| step.name == name).map(|step| step.apply(input))
}

/// Result of the advanced pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedOutcome {
    pub content: String,
    /// `(original - final) / original`, in characters; 0 for empty input.
    pub ratio: f64,
}

fn run_chain(content: &str) -> Result<String, CompressError> {
    STEPS.iter().try_fold(content.to_string(), |text, step| step.apply(&text))
}

pub fn compress_advanced(content: &str) -> AdvancedOutcome {
    match run_chain(content) {
        Ok(compressed) => {
            let ratio = reduction_ratio(content, &compressed);
            AdvancedOutcome { content: compressed, ratio }
        }
        Err(err) => {
            tracing::warn!(error = %err, "advanced compression failed, keeping original");
            AdvancedOutcome { content: content.to_string(), ratio: 0.0 }
        }
    }
}

fn reduction_ratio(original: &str, compressed: &str) -> f64 {
    let before = original.chars().count();
    if before == 0 {
        return 0.0;
    }
    let after = compressed.chars().count();
    (before as f64 - after as f64) / before as f64
}
