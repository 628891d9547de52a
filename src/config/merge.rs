//! CLI argument merging with config

use crate::domain::{CompressionMode, Config};
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub path: Option<PathBuf>,
    pub ignore_file: Option<PathBuf>,
    pub max_file_bytes: Option<u64>,
    pub compression: Option<CompressionMode>,
    pub fallback_count: Option<usize>,
    pub oracle_enabled: Option<bool>,
    pub oracle_endpoint: Option<String>,
    pub oracle_model: Option<String>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(path) = cli.path {
        base_config.path = Some(path);
    }
    if let Some(ignore_file) = cli.ignore_file {
        base_config.ignore_file = ignore_file;
    }

    if let Some(max_file_bytes) = cli.max_file_bytes {
        base_config.max_file_bytes = max_file_bytes;
    }
    if let Some(compression) = cli.compression {
        base_config.compression = compression;
    }
    if let Some(fallback_count) = cli.fallback_count {
        base_config.fallback_count = fallback_count;
    }

    if let Some(enabled) = cli.oracle_enabled {
        base_config.oracle.enabled = enabled;
    }
    if let Some(endpoint) = cli.oracle_endpoint {
        base_config.oracle.endpoint = endpoint;
    }
    if let Some(model) = cli.oracle_model {
        base_config.oracle.model = model;
    }

    base_config
}
