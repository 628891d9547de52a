//! Basic pass: per-file, extension-aware structural shrinking followed by a
//! universal whitespace cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

use super::comments::{comment_syntax, strip_comments};
use super::minify::minify_script;
use super::CompressError;

const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".jsx", ".ts", ".tsx"];
const MARKUP_EXTENSIONS: &[&str] = &[".html", ".htm", ".xml", ".css", ".scss", ".less"];

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[\r\n]").expect("valid blank-line regex"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static PUNCTUATION_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,;]{2,}").expect("valid punctuation regex"));

/// Run the basic pass over one file's content. `extension` is the dotted,
/// lowercased extension (`".json"`), or empty.
pub fn compress_basic(content: &str, extension: &str) -> String {
    let stripped = strip_comments(content, comment_syntax(extension));
    let structured = match structural_pass(&stripped, extension) {
        Ok(out) => out,
        Err(err) => {
            tracing::debug!(extension, error = %err, "structural pass skipped");
            stripped
        }
    };
    universal_cleanup(&structured)
}

fn structural_pass(content: &str, extension: &str) -> Result<String, CompressError> {
    if SCRIPT_EXTENSIONS.contains(&extension) {
        return Ok(minify_script(content)?);
    }
    if extension == ".json" {
        let value: serde_json::Value = serde_json::from_str(content)?;
        return Ok(value.to_string());
    }
    if MARKUP_EXTENSIONS.contains(&extension) {
        return Ok(collapse_and_trim(content));
    }
    Ok(content.to_string())
}

/// Blank-line removal, whitespace collapse, punctuation-run removal, trim.
pub fn universal_cleanup(content: &str) -> String {
    let no_blank = BLANK_LINES.replace_all(content, "");
    let collapsed = WHITESPACE_RUNS.replace_all(&no_blank, " ");
    let punctuated = PUNCTUATION_RUNS.replace_all(&collapsed, "");
    punctuated.trim().to_string()
}

/// Collapse every whitespace run to one space and trim. Idempotent.
pub fn collapse_and_trim(content: &str) -> String {
    WHITESPACE_RUNS.replace_all(content, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_is_compacted_with_key_order() {
        let src = "{\n  \"b\": 2,\n  \"a\": 1\n}";
        assert_eq!(compress_basic(src, ".json"), "{\"b\":2,\"a\":1}");
        assert_eq!(compress_basic("{\n  \"a\": 1,\n  \"b\": 2\n}", ".json"), "{\"a\":1,\"b\":2}");
    }

    #[test]
    fn malformed_json_is_left_for_the_universal_pass() {
        let src = "{\n  \"a\": 1,\n}";
        assert_eq!(compress_basic(src, ".json"), "{ \"a\": 1, }");
    }

    #[test]
    fn scripts_are_stripped_and_minified() {
        let src = "// helper\nfunction add(a, b) {\n  return a + b; /* sum */\n}\n";
        assert_eq!(compress_basic(src, ".js"), "function add(a,b){return a+b;}");
    }

    #[test]
    fn unterminated_script_literal_skips_minification() {
        let src = "const s = \"open\nconst   t = 1;";
        assert_eq!(compress_basic(src, ".ts"), "const s = \"open const t = 1;");
    }

    #[test]
    fn markup_loses_comments_and_whitespace() {
        let src = "<ul>\n  <!-- items -->\n  <li>one</li>\n</ul>\n";
        assert_eq!(compress_basic(src, ".html"), "<ul> <li>one</li> </ul>");
    }

    #[test]
    fn punctuation_runs_are_removed() {
        assert_eq!(universal_cleanup("wait... what,, ok;;\n\n\nnext"), "wait what ok next");
    }

    #[test]
    fn collapse_and_trim_is_idempotent() {
        let once = collapse_and_trim("  a \t b\n\n c  ");
        assert_eq!(once, "a b c");
        assert_eq!(collapse_and_trim(&once), once);
    }

    #[test]
    fn plain_text_only_gets_universal_cleanup() {
        let src = "# Title\n\nSome   text.\n";
        assert_eq!(compress_basic(src, ".md"), "# Title Some text.");
    }
}
