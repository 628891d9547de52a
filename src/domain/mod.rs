//! Core domain types and models
//!
//! Defines the configuration, compression modes, per-file records and the
//! statistics shared by the scanner, selector and assembler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default ignore file read from the working directory.
pub const DEFAULT_IGNORE_FILE: &str = ".jympignore";

/// Files larger than this are never opened (2 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// How many candidates the relevance selector falls back to.
pub const DEFAULT_FALLBACK_COUNT: usize = 5;

/// Which compressor passes run over each text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    #[default]
    None,
    Basic,
    #[serde(alias = "llmlingua")]
    Advanced,
    Both,
}

impl CompressionMode {
    /// Label used in the compression summary.
    pub fn method(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Both => "basic+advanced",
        }
    }

    pub fn runs_basic(self) -> bool {
        matches!(self, Self::Basic | Self::Both)
    }

    pub fn runs_advanced(self) -> bool {
        matches!(self, Self::Advanced | Self::Both)
    }
}

impl fmt::Display for CompressionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// How the user narrows the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Full,
    #[serde(alias = "ai", alias = "prompt")]
    Query,
    Manual,
}

/// Classification of a selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClass {
    Text,
    Binary,
    Oversized,
    Unreadable,
}

/// Where an unreadable file failed: the metadata lookup or the read itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Access,
    Read,
}

/// One file's contribution to an assembled document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the working directory (`/`-separated)
    pub path: String,

    pub class: FileClass,

    /// Size reported by the filesystem, 0 when it could not be read
    #[serde(default)]
    pub size_bytes: u64,

    /// Decoded (and possibly compressed) content, text files only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Line count of the decoded content, text files only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,

    /// Short diagnostic for unreadable files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_stage: Option<FailureStage>,

    /// Advanced-pass reduction, `(original - final) / original` in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
}

/// Reported when any compression mode other than `none` ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionSummary {
    pub file_count: usize,
    pub final_size: usize,
    pub method: String,
    /// Reduction over all text content, in characters
    pub ratio: f64,
}

/// Statistics from walking the working tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Regular files seen by the walker
    pub files_walked: usize,

    /// Files excluded by built-in or user ignore rules
    pub files_ignored: usize,

    /// Directories skipped wholesale because an ignore rule matched them
    pub dirs_pruned: usize,

    /// Files that vanished or stopped being regular files before the stat check
    pub files_vanished: usize,

    /// Files returned as candidates
    pub files_discovered: usize,

    /// Number of user rules loaded from the ignore file
    pub user_rules: usize,
}

/// Relevance oracle settings.
///
/// The credential itself never lives in configuration; only the name of
/// the environment variable that holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_oracle_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_oracle_model")]
    pub model: String,

    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_oracle_endpoint(),
            model: default_oracle_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Main configuration for jymp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Working directory to scan (defaults to the current directory)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Ignore file, relative to the working directory unless absolute
    #[serde(default = "default_ignore_file")]
    pub ignore_file: PathBuf,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    #[serde(default)]
    pub compression: CompressionMode,

    #[serde(default = "default_fallback_count")]
    pub fallback_count: usize,

    #[serde(default)]
    pub oracle: OracleConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            ignore_file: default_ignore_file(),
            max_file_bytes: default_max_file_bytes(),
            compression: CompressionMode::None,
            fallback_count: default_fallback_count(),
            oracle: OracleConfig::default(),
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_ignore_file() -> PathBuf {
    PathBuf::from(DEFAULT_IGNORE_FILE)
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

fn default_fallback_count() -> usize {
    DEFAULT_FALLBACK_COUNT
}

fn default_oracle_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_oracle_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "JYMP_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_mode_accepts_llmlingua_alias() {
        let mode: CompressionMode = serde_json::from_str("\"llmlingua\"").expect("alias");
        assert_eq!(mode, CompressionMode::Advanced);
        assert!(mode.runs_advanced());
        assert!(!mode.runs_basic());
    }

    #[test]
    fn both_runs_every_pass() {
        assert!(CompressionMode::Both.runs_basic());
        assert!(CompressionMode::Both.runs_advanced());
        assert_eq!(CompressionMode::Both.method(), "basic+advanced");
    }

    #[test]
    fn config_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.max_file_bytes, 2_097_152);
        assert_eq!(config.ignore_file, PathBuf::from(".jympignore"));
        assert_eq!(config.fallback_count, 5);
        assert_eq!(config.oracle.api_key_env, "JYMP_API_KEY");
    }

    #[test]
    fn file_record_omits_absent_fields() {
        let record = FileRecord {
            path: "logo.png".to_string(),
            class: FileClass::Binary,
            size_bytes: 10,
            content: None,
            line_count: None,
            reason: None,
            failure_stage: None,
            compression_ratio: None,
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["class"], "binary");
        assert!(value.get("content").is_none());
        assert!(value.get("line_count").is_none());
        assert!(value.get("compression_ratio").is_none());
    }
}
