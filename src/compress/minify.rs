//! Whitespace minifier for JavaScript/TypeScript sources.
//!
//! Drops whitespace that carries no meaning and keeps string, template and
//! regex literals byte-for-byte. Identifiers are never renamed, so the
//! output stays readable in a prompt. Comments are expected to have been
//! stripped already.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MinifyError {
    #[error("unterminated {kind} literal starting at char {offset}")]
    Unterminated { kind: &'static str, offset: usize },
}

/// Keywords after which a `/` starts a regex literal rather than a division.
const REGEX_PREFIX_KEYWORDS: &[&str] =
    &["return", "typeof", "case", "else", "in", "of", "yield", "throw", "void", "delete", "do"];

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn can_end_statement(c: char) -> bool {
    is_word(c) || matches!(c, ')' | ']' | '}' | '"' | '\'' | '`' | '+' | '-')
}

fn can_start_statement(c: char) -> bool {
    is_word(c) || matches!(c, '(' | '[' | '{' | '"' | '\'' | '`' | '+' | '-' | '!' | '~' | '/')
}

fn trailing_word(out: &str) -> &str {
    let start = out
        .char_indices()
        .rev()
        .find(|(_, c)| !is_word(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &out[start..]
}

fn regex_allowed(out: &str, last: Option<char>) -> bool {
    match last {
        None => true,
        Some(c) if is_word(c) => REGEX_PREFIX_KEYWORDS.contains(&trailing_word(out)),
        Some(c) => matches!(
            c,
            '(' | ',' | '=' | ':' | '[' | '!' | '&' | '|' | '?' | '{' | '}' | ';' | '+' | '-'
                | '*' | '%' | '<' | '>' | '~' | '^'
        ),
    }
}

pub fn minify_script(source: &str) -> Result<String, MinifyError> {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut last: Option<char> = None;
    let mut pending_space = false;
    let mut pending_newline = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            pending_space = true;
            pending_newline |= c == '\n';
            i += 1;
            continue;
        }

        if pending_space {
            if let Some(prev) = last {
                if pending_newline && can_end_statement(prev) && can_start_statement(c) {
                    out.push('\n');
                } else if (is_word(prev) && is_word(c))
                    || (prev == '+' && c == '+')
                    || (prev == '-' && c == '-')
                    || (prev == '/' && c == '/')
                {
                    out.push(' ');
                }
            }
            pending_space = false;
            pending_newline = false;
        }

        match c {
            '"' | '\'' | '`' => {
                i = copy_quoted(&chars, i, &mut out)?;
            }
            '/' if regex_allowed(&out, last) => {
                i = copy_regex(&chars, i, &mut out)?;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
        last = out.chars().last();
    }

    Ok(out)
}

fn copy_quoted(chars: &[char], start: usize, out: &mut String) -> Result<usize, MinifyError> {
    let quote = chars[start];
    let kind = if quote == '`' { "template" } else { "string" };
    out.push(quote);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        match c {
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
            }
            '\n' if quote != '`' => break,
            c if c == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(MinifyError::Unterminated { kind, offset: start })
}

fn copy_regex(chars: &[char], start: usize, out: &mut String) -> Result<usize, MinifyError> {
    out.push('/');
    let mut i = start + 1;
    let mut in_class = false;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            break;
        }
        out.push(c);
        match c {
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    out.push(next);
                }
                i += 2;
                continue;
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Ok(i + 1),
            _ => {}
        }
        i += 1;
    }
    Err(MinifyError::Unterminated { kind: "regex", offset: start })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_insignificant_whitespace() {
        let src = "function add ( a , b ) {\n    return a + b ;\n}\n";
        assert_eq!(minify_script(src).expect("minify"), "function add(a,b){return a+b;}");
    }

    #[test]
    fn keeps_statement_breaks_between_words() {
        let src = "let a = 1\nlet b = 2\n";
        assert_eq!(minify_script(src).expect("minify"), "let a=1\nlet b=2");
    }

    #[test]
    fn literals_are_preserved() {
        let src = "const s = \"a   b\";\nconst t = `x ${ y }  z`;\nconst r = str.split(/ +/);";
        assert_eq!(
            minify_script(src).expect("minify"),
            "const s=\"a   b\";const t=`x ${ y }  z`;const r=str.split(/ +/);"
        );
    }

    #[test]
    fn division_is_not_a_regex() {
        assert_eq!(minify_script("x = a / b / c;").expect("minify"), "x=a/b/c;");
    }

    #[test]
    fn unary_operators_do_not_fuse() {
        assert_eq!(minify_script("a = b + +c - -d;").expect("minify"), "a=b+ +c- -d;");
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = minify_script("const s = \"open\nconst t = 1;").expect_err("unterminated");
        assert_eq!(err, MinifyError::Unterminated { kind: "string", offset: 10 });
    }
}
