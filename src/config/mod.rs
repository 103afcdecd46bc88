//! Configuration management for metric evaluation.
//!
//! Configurations can be built programmatically, read from `.toml`/`.json`
//! files, or taken from `SEGMETRICS_*` environment variables. All sources end
//! in [`EvaluationConfig::validate`].

pub mod core;

pub use self::core::{EvaluationConfig, EvaluationConfigBuilder, DEFAULT_METRICS};

use crate::core::error::{Result, SegMetricsError};
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// TOML configuration format
    #[default]
    Toml,
    /// JSON configuration format
    Json,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(SegMetricsError::config(
                "Unsupported config file format. Use .json or .toml",
            )),
        }
    }
}

/// Utility functions for configuration management
pub mod utils {
    use super::*;
    use crate::config::core::sentinel;
    use std::collections::HashMap;

    /// Parse configuration from key-value pairs.
    ///
    /// Keys are the field names of [`EvaluationConfig`]. Unknown keys are
    /// logged and skipped.
    pub fn parse_config_from_map(map: HashMap<String, String>) -> Result<EvaluationConfig> {
        let mut builder = EvaluationConfig::default();

        for (key, value) in map {
            match key.as_str() {
                "metrics" => {
                    builder.metrics = value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "err_value" => {
                    builder.err_value = sentinel::parse(&value)
                        .map_err(|e| SegMetricsError::config(format!("Invalid err_value: {}", e)))?;
                }
                "empty_score" => {
                    builder.empty_score = sentinel::parse(&value)
                        .map_err(|e| SegMetricsError::config(format!("Invalid empty_score: {}", e)))?;
                }
                "parallel" => {
                    builder.parallel = value
                        .trim()
                        .parse::<bool>()
                        .map_err(|_| SegMetricsError::config(format!("Invalid parallel: {}", value)))?;
                }
                "num_threads" => {
                    builder.num_threads = value
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| SegMetricsError::config(format!("Invalid num_threads: {}", value)))?;
                }
                _ => {
                    log::warn!("Unknown configuration parameter: {}", key);
                }
            }
        }

        builder.validate()?;
        Ok(builder)
    }
}
