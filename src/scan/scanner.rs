//! Working-tree scanner producing the candidate file set.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::ignore_rules::{load_user_rules, IgnoreRules};
use crate::domain::ScanStats;
use crate::utils::normalize_path;

pub struct FileScanner {
    root: PathBuf,
    ignore_file: Option<PathBuf>,
    stats: ScanStats,
}

impl FileScanner {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_file: None,
            stats: ScanStats::default(),
        }
    }

    /// Ignore file to read rules from; relative paths resolve against the root.
    pub fn ignore_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignore_file = Some(path.into());
        self
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Walk the root and return every non-ignored regular file, relative to
    /// the root, deduplicated and in lexical order.
    pub fn scan(&mut self) -> Result<Vec<String>> {
        let metadata = fs::metadata(&self.root)
            .with_context(|| format!("cannot access {}", self.root.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("{} is not a directory", self.root.display());
        }

        let user_rules = match &self.ignore_file {
            Some(file) if file.is_absolute() => load_user_rules(file),
            Some(file) => load_user_rules(&self.root.join(file)),
            None => Vec::new(),
        };

        let rules = Arc::new(IgnoreRules::new(&user_rules));
        self.stats = ScanStats { user_rules: rules.user_rule_count(), ..ScanStats::default() };

        let pruned = Arc::new(AtomicUsize::new(0));
        let walker = {
            let rules = Arc::clone(&rules);
            let pruned = Arc::clone(&pruned);
            let root = self.root.clone();
            WalkBuilder::new(&self.root)
                .standard_filters(false)
                .follow_links(false)
                .filter_entry(move |entry| {
                    if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_dir()) {
                        return true;
                    }
                    let Ok(rel) = entry.path().strip_prefix(&root) else {
                        return true;
                    };
                    if rules.is_ignored(&normalize_path(rel)) {
                        pruned.fetch_add(1, Ordering::Relaxed);
                        return false;
                    }
                    true
                })
                .build()
        };

        let mut listed = BTreeSet::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.depth() == 0 || entry.file_type().is_some_and(|t| t.is_dir()) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            self.stats.files_walked += 1;

            let rel = normalize_path(rel);
            if rules.is_ignored(&rel) {
                self.stats.files_ignored += 1;
                continue;
            }
            listed.insert(rel);
        }
        self.stats.dirs_pruned = pruned.load(Ordering::Relaxed);

        let files = retain_regular_files(&self.root, listed, &mut self.stats);
        self.stats.files_discovered = files.len();
        tracing::debug!(
            discovered = files.len(),
            ignored = self.stats.files_ignored,
            pruned = self.stats.dirs_pruned,
            "scan complete"
        );
        Ok(files)
    }
}

/// Keep only paths that are regular files right now. Anything that vanished
/// or changed type since it was listed is dropped without error.
pub fn retain_regular_files(
    root: &Path,
    listed: impl IntoIterator<Item = String>,
    stats: &mut ScanStats,
) -> Vec<String> {
    listed
        .into_iter()
        .filter(|rel| match fs::metadata(root.join(rel)) {
            Ok(meta) if meta.is_file() => true,
            _ => {
                tracing::debug!(path = %rel, "dropping entry that is no longer a regular file");
                stats.files_vanished += 1;
                false
            }
        })
        .collect()
}
