//! Best-effort comment stripping.
//!
//! Not a parser: string literals are skipped so `"http://x"` survives, but
//! anything exotic (raw strings, heredocs, nested templates) may be left
//! alone or trimmed imperfectly.

/// Comment flavour picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSyntax {
    /// `// line` and `/* block */`
    CStyle,
    /// `# line`
    Hash,
    /// `<!-- block -->`
    Markup,
    /// Formats without comments (JSON, Markdown, plain text)
    None,
}

pub fn comment_syntax(extension: &str) -> CommentSyntax {
    match extension {
        ".js" | ".mjs" | ".cjs" | ".jsx" | ".ts" | ".tsx" | ".rs" | ".go" | ".java" | ".kt"
        | ".kts" | ".c" | ".h" | ".cpp" | ".hpp" | ".cc" | ".cxx" | ".cs" | ".swift"
        | ".scala" | ".php" | ".css" | ".scss" | ".less" | ".dart" | ".proto" => {
            CommentSyntax::CStyle
        }
        ".py" | ".pyi" | ".rb" | ".sh" | ".bash" | ".zsh" | ".yaml" | ".yml" | ".toml"
        | ".r" | ".pl" | ".ini" | ".cfg" | ".dockerfile" => CommentSyntax::Hash,
        ".html" | ".htm" | ".xml" | ".vue" | ".svelte" => CommentSyntax::Markup,
        _ => CommentSyntax::None,
    }
}

pub fn strip_comments(content: &str, syntax: CommentSyntax) -> String {
    match syntax {
        CommentSyntax::CStyle => strip_c_style(content),
        CommentSyntax::Hash => strip_hash(content),
        CommentSyntax::Markup => strip_markup(content),
        CommentSyntax::None => content.to_string(),
    }
}

/// Copy a quoted literal starting at `chars[start]` into `out`. Single and
/// double quotes end at a newline if unterminated; backticks may span lines.
/// Returns the index just past the literal.
fn copy_literal(chars: &[char], start: usize, out: &mut String) -> usize {
    let quote = chars[start];
    out.push(quote);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            out.push(c);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
            }
            i += 2;
            continue;
        }
        if c == '\n' && quote != '`' {
            return i;
        }
        out.push(c);
        i += 1;
        if c == quote {
            return i;
        }
    }
    i
}

fn strip_c_style(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match (c, next) {
            ('"' | '\'' | '`', _) => i = copy_literal(&chars, i, &mut out),
            ('/', Some('/')) => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn strip_hash(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' | '\'' => i = copy_literal(&chars, i, &mut out),
            '#' if i == 0 || chars[i - 1].is_whitespace() => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn strip_markup(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start + 4..].find("-->") {
            Some(end) => rest = &rest[start + 4 + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
