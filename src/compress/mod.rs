//! Text compression for assembled prompts.
//!
//! Two independent passes: [`basic`] shrinks one file based on its
//! extension, [`advanced`] runs a named regex chain over any text. The
//! [`CompressionMode`] picks which of them run. Neither pass ever fails the
//! caller; on an internal error the input comes back unchanged.

use thiserror::Error;

use crate::domain::CompressionMode;

pub mod advanced;
pub mod basic;
pub mod comments;
pub mod minify;

pub use advanced::{apply_step, compress_advanced, steps, AdvancedOutcome, Step};
pub use basic::{collapse_and_trim, compress_basic, universal_cleanup};
pub use comments::{comment_syntax, strip_comments, CommentSyntax};
pub use minify::{minify_script, MinifyError};

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("script minification failed: {0}")]
    Minify(#[from] MinifyError),

    #[error("JSON compaction failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step `{step}` failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// Content after compression, plus the advanced-pass reduction ratio when
/// that pass ran.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressed {
    pub content: String,
    pub ratio: Option<f64>,
}

/// Apply `mode` to one file's content. `both` runs basic first, then
/// advanced on its output.
pub fn compress(content: &str, extension: &str, mode: CompressionMode) -> Compressed {
    let after_basic = if mode.runs_basic() {
        compress_basic(content, extension)
    } else {
        content.to_string()
    };

    if mode.runs_advanced() {
        let outcome = compress_advanced(&after_basic);
        return Compressed { content: outcome.content, ratio: Some(outcome.ratio) };
    }
    Compressed { content: after_basic, ratio: None }
}
