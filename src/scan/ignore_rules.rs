//! Ignore rules: the fixed built-in set plus patterns from the ignore file.
//!
//! Patterns follow a small subset of gitignore syntax. A pattern without a
//! `/` matches any single path component (`dist`, `*.log`); a pattern with a
//! `/` is anchored at the scan root (`docs/*.md`, `/dist`); a trailing `/`
//! alone does not count (`build/`). A path is ignored when the path itself
//! or any of its parent directories matches.
//! Built-in rules live in their own matcher so nothing in the ignore file can
//! re-include what they exclude.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

/// Always-on exclusions: VCS metadata, installed dependencies, OS/editor
/// artifacts and every dotfile or dot-directory.
pub const BUILTIN_RULES: &[&str] = &[".git", "node_modules", ".DS_Store", ".vscode", ".*"];

/// Split ignore-file content into rules: trimmed, no blanks, no `#` comments.
pub fn parse_rule_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect()
}

/// Read user rules from `path`. A missing or unreadable file means no rules.
pub fn load_user_rules(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_rule_lines(&content),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "no ignore file loaded");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone)]
struct RuleSet {
    anchored: GlobSet,
    component: GlobSet,
    len: usize,
}

impl RuleSet {
    fn build<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut anchored = GlobSetBuilder::new();
        let mut component = GlobSetBuilder::new();
        let mut len = 0;

        for raw in patterns {
            let raw = raw.as_ref();
            if raw.starts_with('!') {
                tracing::warn!(pattern = raw, "negated ignore patterns are not supported");
                continue;
            }
            let body = raw.trim_end_matches('/');
            let is_anchored = body.contains('/');
            let pattern = body.trim_start_matches('/');
            if pattern.is_empty() {
                continue;
            }
            let glob = match GlobBuilder::new(pattern).literal_separator(true).build() {
                Ok(glob) => glob,
                Err(err) => {
                    tracing::warn!(pattern = raw, error = %err, "skipping invalid ignore pattern");
                    continue;
                }
            };
            if is_anchored {
                anchored.add(glob);
            } else {
                component.add(glob);
            }
            len += 1;
        }

        Self {
            anchored: anchored.build().unwrap_or_else(|_| GlobSet::empty()),
            component: component.build().unwrap_or_else(|_| GlobSet::empty()),
            len,
        }
    }

    fn matches(&self, relative_path: &str) -> bool {
        if self.len == 0 {
            return false;
        }
        let mut prefix_end = 0;
        for segment in relative_path.split('/') {
            if segment.is_empty() {
                prefix_end += 1;
                continue;
            }
            prefix_end += segment.len();
            if self.component.is_match(segment) {
                return true;
            }
            let prefix = relative_path[..prefix_end].trim_start_matches('/');
            if !self.anchored.is_empty() && self.anchored.is_match(prefix) {
                return true;
            }
            // account for the separator that follows this segment
            prefix_end += 1;
        }
        false
    }
}

/// Compiled built-in and user rules.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    builtin: RuleSet,
    user: RuleSet,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::new(&[] as &[String])
    }
}

impl IgnoreRules {
    pub fn new<S: AsRef<str>>(user_rules: &[S]) -> Self {
        Self { builtin: RuleSet::build(BUILTIN_RULES), user: RuleSet::build(user_rules) }
    }

    /// Number of usable user rules.
    pub fn user_rule_count(&self) -> usize {
        self.user.len
    }

    pub fn is_ignored(&self, relative_path: &str) -> bool {
        self.builtin.matches(relative_path) || self.user.matches(relative_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_and_blank_lines_are_dropped() {
        let rules = parse_rule_lines("# build output\n\n  dist  \n*.log\n   # indented comment\n");
        assert_eq!(rules, vec!["dist".to_string(), "*.log".to_string()]);
    }

    #[test]
    fn missing_ignore_file_yields_no_rules() {
        let rules = load_user_rules(Path::new("/definitely/not/here/.jympignore"));
        assert!(rules.is_empty());
    }

    #[test]
    fn builtin_rules_apply_without_user_config() {
        let rules = IgnoreRules::default();
        assert!(rules.is_ignored(".git/config"));
        assert!(rules.is_ignored("node_modules/react/index.js"));
        assert!(rules.is_ignored("packages/app/node_modules/x.js"));
        assert!(rules.is_ignored(".env"));
        assert!(rules.is_ignored("src/.cache/data.json"));
        assert!(rules.is_ignored(".vscode/settings.json"));
        assert!(!rules.is_ignored("src/main.rs"));
        assert!(!rules.is_ignored("README.md"));
    }

    #[test]
    fn user_rules_cannot_reinclude_builtin_exclusions() {
        let rules = IgnoreRules::new(&["!node_modules", "!.git"]);
        assert_eq!(rules.user_rule_count(), 0);
        assert!(rules.is_ignored("node_modules/a.js"));
        assert!(rules.is_ignored(".git/HEAD"));
    }

    #[test]
    fn component_patterns_match_at_any_depth() {
        let rules = IgnoreRules::new(&["dist", "*.log"]);
        assert!(rules.is_ignored("dist/bundle.js"));
        assert!(rules.is_ignored("web/dist/bundle.js"));
        assert!(rules.is_ignored("logs/server.log"));
        assert!(!rules.is_ignored("distribution/notes.md"));
    }

    #[test]
    fn slash_patterns_are_anchored_at_root() {
        let rules = IgnoreRules::new(&["docs/*.md", "/src/generated/"]);
        assert!(rules.is_ignored("docs/guide.md"));
        assert!(!rules.is_ignored("docs/nested/guide.md"));
        assert!(!rules.is_ignored("other/docs/guide.md"));
        assert!(rules.is_ignored("src/generated/api.rs"));
        assert!(!rules.is_ignored("src/generator.rs"));
    }

    #[test]
    fn leading_slash_anchors_single_component() {
        let rules = IgnoreRules::new(&["/dist", "build/"]);
        assert!(rules.is_ignored("dist/bundle.js"));
        assert!(!rules.is_ignored("web/dist/bundle.js"));
        assert!(rules.is_ignored("build/out.js"));
        assert!(rules.is_ignored("web/build/out.js"));
    }
}
