//! Configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, a `jymp.toml` /
//! `.jymp.yml` file in the working directory (or an explicit `--config`),
//! `JYMP_*` environment variables, then CLI overrides.

use crate::domain::Config;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

/// Config files probed in the working directory, in order.
const CONFIG_CANDIDATES: &[&str] = &["jymp.toml", ".jymp.toml", ".jymp.yml", ".jymp.yaml"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Load configuration anchored at `root`, optionally from an explicit file.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    let file = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(root),
    };

    if let Some(file) = file {
        tracing::debug!(config = %file.display(), "loading config file");
        figment = if is_yaml(&file) {
            figment.merge(Yaml::file(file))
        } else {
            figment.merge(Toml::file(file))
        };
    }

    figment
        .merge(Env::prefixed("JYMP_").split("__"))
        .extract()
        .map_err(|e| ConfigError::Invalid(Box::new(e)))
}

fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|name| root.join(name)).find(|p| p.is_file())
}

fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yml") | Some("yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompressionMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_config_yields_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = load_config(dir.path(), None).expect("defaults");
        assert_eq!(config.max_file_bytes, 2 * 1024 * 1024);
        assert_eq!(config.compression, CompressionMode::None);
    }

    #[test]
    fn toml_file_in_root_is_picked_up() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join("jymp.toml"),
            "compression = \"both\"\nfallback_count = 3\n\n[oracle]\nenabled = false\n",
        )
        .expect("write config");

        let config = load_config(dir.path(), None).expect("config");
        assert_eq!(config.compression, CompressionMode::Both);
        assert_eq!(config.fallback_count, 3);
        assert!(!config.oracle.enabled);
        assert_eq!(config.oracle.timeout_secs, 30);
    }

    #[test]
    fn yaml_file_accepts_llmlingua_alias() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(".jymp.yml"), "compression: llmlingua\nmax_file_bytes: 1024\n")
            .expect("write config");

        let config = load_config(dir.path(), None).expect("config");
        assert_eq!(config.compression, CompressionMode::Advanced);
        assert_eq!(config.max_file_bytes, 1024);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let err = load_config(dir.path(), Some(&dir.path().join("nope.toml")))
            .expect_err("missing explicit config");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
