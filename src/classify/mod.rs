//! Content classification: decide whether a selected file is emitted as
//! text, as a binary placeholder, or as a skip/error notice.

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::{FailureStage, DEFAULT_MAX_FILE_BYTES};
use crate::utils::dotted_extension;

/// Extensions treated as binary without looking at the content.
pub const BINARY_EXTENSIONS: &[&str] = &[
    // Images
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".bmp", ".tiff", ".ico", ".icns", ".psd",
    ".ai", ".sketch",
    // Documents and archives
    ".pdf", ".zip", ".tar", ".gz", ".7z", ".rar", ".iso", ".dmg",
    // Media
    ".mp3", ".mp4", ".mov", ".avi",
    // Executables and bytecode
    ".exe", ".dll", ".so", ".bin", ".class", ".jar", ".apk",
    // Fonts
    ".woff", ".woff2", ".ttf", ".eot", ".otf",
];

pub fn is_binary_extension(path: &str) -> bool {
    let ext = dotted_extension(path);
    !ext.is_empty() && BINARY_EXTENSIONS.contains(&ext.as_str())
}

/// Number of `\n`-delimited segments; a trailing newline adds an empty one.
pub fn count_lines(content: &str) -> usize {
    content.split('\n').count()
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    Text { content: String, line_count: usize, size_bytes: u64 },
    Binary { size_bytes: u64 },
    Oversized { size_bytes: u64 },
    Unreadable { stage: FailureStage, reason: String },
}

#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    max_file_bytes: u64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_BYTES)
    }
}

impl Classifier {
    pub fn new(max_file_bytes: u64) -> Self {
        Self { max_file_bytes }
    }

    /// Classify `root/relative_path`: stat, then extension table, then size
    /// ceiling, then a UTF-8 read. Binary and oversized files are never
    /// opened.
    pub fn classify(&self, root: &Path, relative_path: &str) -> Classified {
        let full = root.join(relative_path);
        let size_bytes = match fs::metadata(&full) {
            Ok(meta) => meta.len(),
            Err(err) => {
                return Classified::Unreadable {
                    stage: FailureStage::Access,
                    reason: short_reason(&err),
                }
            }
        };

        if is_binary_extension(relative_path) {
            return Classified::Binary { size_bytes };
        }
        if size_bytes > self.max_file_bytes {
            return Classified::Oversized { size_bytes };
        }

        let bytes = match fs::read(&full) {
            Ok(bytes) => bytes,
            Err(err) => {
                return Classified::Unreadable {
                    stage: FailureStage::Read,
                    reason: short_reason(&err),
                }
            }
        };
        match String::from_utf8(bytes) {
            Ok(content) => {
                let line_count = count_lines(&content);
                Classified::Text { content, line_count, size_bytes }
            }
            Err(err) => Classified::Unreadable {
                stage: FailureStage::Read,
                reason: format!("not valid UTF-8 (byte {})", err.utf8_error().valid_up_to()),
            },
        }
    }
}

fn short_reason(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "file not found".to_string(),
        io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => err.to_string(),
    }
}
