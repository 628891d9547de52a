//! Prompt assembly: classify and compress every selected file, then
//! concatenate the per-file sections in selection order.

use std::path::Path;

use rayon::prelude::*;

use crate::classify::{Classified, Classifier};
use crate::compress::compress;
use crate::domain::{CompressionMode, CompressionSummary, FailureStage, FileClass, FileRecord};
use crate::utils::{dotted_extension, format_mib};

/// The assembled prompt and everything the caller may want to display.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: String,
    pub records: Vec<FileRecord>,
    /// Length of `document` in characters
    pub total_chars: usize,
    /// Present when a compression mode other than `none` ran
    pub summary: Option<CompressionSummary>,
}

impl Assembly {
    pub fn count(&self, class: FileClass) -> usize {
        self.records.iter().filter(|r| r.class == class).count()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Assembler {
    classifier: Classifier,
    mode: CompressionMode,
}

impl Assembler {
    pub fn new(classifier: Classifier, mode: CompressionMode) -> Self {
        Self { classifier, mode }
    }

    pub fn assemble<S>(&self, root: &Path, paths: &[S]) -> Assembly
    where
        S: AsRef<str> + Sync,
    {
        self.assemble_with(root, paths, |_| {})
    }

    /// Like [`assemble`](Self::assemble), calling `on_file` as each file
    /// finishes. Calls come from worker threads in completion order; the
    /// returned document is always in `paths` order.
    pub fn assemble_with<S, F>(&self, root: &Path, paths: &[S], on_file: F) -> Assembly
    where
        S: AsRef<str> + Sync,
        F: Fn(&FileRecord) + Sync,
    {
        let built: Vec<(FileRecord, usize)> = paths
            .par_iter()
            .map(|path| {
                let built = self.build_record(root, path.as_ref());
                on_file(&built.0);
                built
            })
            .collect();

        let original_chars: usize = built.iter().map(|(_, chars)| chars).sum();
        let records: Vec<FileRecord> = built.into_iter().map(|(record, _)| record).collect();
        let final_chars: usize = records
            .iter()
            .filter_map(|r| r.content.as_deref())
            .map(|content| content.chars().count())
            .sum();

        let document: String = records.iter().map(render_section).collect();
        let total_chars = document.chars().count();
        let summary = (self.mode != CompressionMode::None).then(|| CompressionSummary {
            file_count: records.len(),
            final_size: total_chars,
            method: self.mode.method().to_string(),
            ratio: reduction(original_chars, final_chars),
        });

        tracing::debug!(
            files = records.len(),
            chars = total_chars,
            mode = %self.mode,
            "assembled document"
        );

        Assembly { document, records, total_chars, summary }
    }

    /// Classify one file and, for text, apply the compression mode. The
    /// second value is the text length in characters before compression.
    fn build_record(&self, root: &Path, path: &str) -> (FileRecord, usize) {
        let mut original_chars = 0;
        let mut record = FileRecord {
            path: path.to_string(),
            class: FileClass::Unreadable,
            size_bytes: 0,
            content: None,
            line_count: None,
            reason: None,
            failure_stage: None,
            compression_ratio: None,
        };

        match self.classifier.classify(root, path) {
            Classified::Text { content, line_count, size_bytes } => {
                let compressed = compress(&content, &dotted_extension(path), self.mode);
                original_chars = content.chars().count();
                record.class = FileClass::Text;
                record.size_bytes = size_bytes;
                record.content = Some(compressed.content);
                record.line_count = Some(line_count);
                record.compression_ratio = compressed.ratio;
            }
            Classified::Binary { size_bytes } => {
                record.class = FileClass::Binary;
                record.size_bytes = size_bytes;
            }
            Classified::Oversized { size_bytes } => {
                record.class = FileClass::Oversized;
                record.size_bytes = size_bytes;
            }
            Classified::Unreadable { stage, reason } => {
                tracing::debug!(path, ?stage, %reason, "file could not be read");
                record.reason = Some(reason);
                record.failure_stage = Some(stage);
            }
        }
        (record, original_chars)
    }
}

fn reduction(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) / before as f64
}

/// `\n// -------- {path} --------\n`, with the line count for text files.
pub fn section_header(record: &FileRecord) -> String {
    match record.line_count {
        Some(lines) if record.class == FileClass::Text => {
            format!("\n// -------- {} ({} lines) --------\n", record.path, lines)
        }
        _ => format!("\n// -------- {} --------\n", record.path),
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Header plus body for one record.
pub fn render_section(record: &FileRecord) -> String {
    let mut section = section_header(record);
    match record.class {
        FileClass::Text => {
            section.push_str(record.content.as_deref().unwrap_or_default());
            section.push('\n');
        }
        FileClass::Binary => {
            section.push_str(&format!("[Binary file: {}]\n", file_name(&record.path)));
        }
        FileClass::Oversized => {
            section.push_str(&format!(
                "[Skipped: File too large ({} MB)]\n",
                format_mib(record.size_bytes)
            ));
        }
        FileClass::Unreadable => {
            let action = match record.failure_stage {
                Some(FailureStage::Access) => "accessing",
                _ => "reading",
            };
            section.push_str(&format!(
                "[Error {action} file: {}]\n",
                record.reason.as_deref().unwrap_or("unknown error")
            ));
        }
    }
    section
}
