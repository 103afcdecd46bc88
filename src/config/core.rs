//! Evaluation configuration and its builder.
//!
//! An [`EvaluationConfig`] names the metrics an aggregator runs, the sentinel
//! values forwarded to them, and whether batches are evaluated on the rayon
//! pool.

use crate::config::ConfigFormat;
use crate::core::constants::*;
use crate::core::error::{Result, SegMetricsError};
use crate::core::types::MetricValue;
use crate::metrics::{BuiltinMetric, MetricOptions};

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Metrics evaluated when the configuration does not name any.
pub const DEFAULT_METRICS: [&str; 8] = [
    "dice_score",
    "precision_score",
    "recall_score",
    "specificity_score",
    "intersection_over_union",
    "accuracy_score",
    "hausdorff_score",
    "mse",
];

/// Main configuration structure for metric evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Names of the built-in metrics to evaluate, in result order
    pub metrics: Vec<String>,
    /// Value returned by ratio metrics when their denominator is zero
    #[serde(with = "sentinel")]
    pub err_value: MetricValue,
    /// Value returned by Dice when both arrays are empty
    #[serde(with = "sentinel")]
    pub empty_score: MetricValue,
    /// Evaluate the samples of a batch on the rayon pool
    pub parallel: bool,
    /// Worker threads for parallel evaluation (0 = all cores)
    pub num_threads: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            metrics: DEFAULT_METRICS.iter().map(|s| s.to_string()).collect(),
            err_value: DEFAULT_ERR_VALUE,
            empty_score: DEFAULT_EMPTY_SCORE,
            parallel: false,
            num_threads: DEFAULT_NUM_THREADS,
        }
    }
}

impl EvaluationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a configuration from defaults
    pub fn builder() -> EvaluationConfigBuilder {
        EvaluationConfigBuilder::new()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            !self.metrics.is_empty(),
            SegMetricsError::invalid_parameter("metrics", "[]", "at least one metric is required")
        );

        let mut seen = HashSet::new();
        for name in &self.metrics {
            name.parse::<BuiltinMetric>()?;
            if !seen.insert(name.as_str()) {
                return Err(SegMetricsError::duplicate_metric(name.as_str()));
            }
        }

        crate::ensure!(
            self.num_threads == 0 || self.parallel,
            SegMetricsError::invalid_parameter(
                "num_threads",
                self.num_threads.to_string(),
                "requires parallel evaluation",
            )
        );

        if self.num_threads > num_cpus::get() * 4 {
            log::warn!(
                "num_threads ({}) is much larger than available CPU cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        Ok(())
    }

    /// Sentinels forwarded to the built-in metrics
    pub fn metric_options(&self) -> MetricOptions {
        MetricOptions {
            err_value: self.err_value,
            empty_score: self.empty_score,
        }
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: EvaluationConfig = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        log::debug!("Loaded evaluation config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.json` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| SegMetricsError::config(format!("Failed to serialize to TOML: {}", e)))?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from `SEGMETRICS_*` environment variables.
    ///
    /// Recognised variables: `SEGMETRICS_METRICS` (comma separated),
    /// `SEGMETRICS_ERR_VALUE`, `SEGMETRICS_EMPTY_SCORE`,
    /// `SEGMETRICS_PARALLEL` and `SEGMETRICS_NUM_THREADS`.
    pub fn load_from_environment() -> Result<Self> {
        let map: HashMap<String, String> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|param| (param.to_ascii_lowercase(), value))
            })
            .collect();

        crate::config::utils::parse_config_from_map(map)
    }

    /// Merge another configuration into this one (other takes precedence)
    pub fn merge(&mut self, other: &EvaluationConfig) -> Result<()> {
        self.metrics = other.metrics.clone();
        self.err_value = other.err_value;
        self.empty_score = other.empty_score;
        self.parallel = other.parallel;
        self.num_threads = other.num_threads;

        self.validate()
    }
}

/// Builder for [`EvaluationConfig`]
#[derive(Debug)]
pub struct EvaluationConfigBuilder {
    config: EvaluationConfig,
}

impl EvaluationConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        EvaluationConfigBuilder {
            config: EvaluationConfig::default(),
        }
    }

    /// Replace the metric list
    pub fn metrics<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// Append one metric to the list
    pub fn metric<S: Into<String>>(mut self, metric: S) -> Self {
        self.config.metrics.push(metric.into());
        self
    }

    /// Set the ratio metric sentinel
    pub fn err_value<V: Into<MetricValue>>(mut self, err_value: V) -> Self {
        self.config.err_value = err_value.into();
        self
    }

    /// Set the Dice sentinel for two empty arrays
    pub fn empty_score<V: Into<MetricValue>>(mut self, empty_score: V) -> Self {
        self.config.empty_score = empty_score.into();
        self
    }

    /// Enable or disable parallel evaluation
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the number of worker threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvaluationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for EvaluationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serde adapter for sentinel fields.
///
/// Neither TOML nor JSON can hold an "undefined" float reliably, so the
/// undefined case is written as the string `"undefined"`. JSON also has no
/// infinities, so non-finite values are written as `"inf"`/`"-inf"`. On input a
/// number, `null`, or one of the strings `undefined`/`nan`/`none`/`null`, or any
/// text that parses as a float, is accepted.
pub(crate) mod sentinel {
    use crate::core::types::MetricValue;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(crate) fn serialize<S: Serializer>(value: &MetricValue, serializer: S) -> Result<S::Ok, S::Error> {
        match value.value() {
            Some(v) if v.is_finite() => serializer.serialize_f64(v),
            Some(v) if v == f64::INFINITY => serializer.serialize_str("inf"),
            Some(v) if v == f64::NEG_INFINITY => serializer.serialize_str("-inf"),
            _ => serializer.serialize_str("undefined"),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MetricValue, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(MetricValue::Undefined),
            Some(Repr::Number(v)) => Ok(MetricValue::new(v)),
            Some(Repr::Text(text)) => parse(&text).map_err(D::Error::custom),
        }
    }

    /// Parse a sentinel from its textual form
    pub(crate) fn parse(text: &str) -> Result<MetricValue, String> {
        match text.trim().to_ascii_lowercase().as_str() {
            "undefined" | "nan" | "none" | "null" => Ok(MetricValue::Undefined),
            other => other
                .parse::<f64>()
                .map(MetricValue::new)
                .map_err(|_| format!("invalid sentinel value: {}", text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EvaluationConfig::default();
        assert_eq!(config.metrics.len(), DEFAULT_METRICS.len());
        assert_eq!(config.err_value, DEFAULT_ERR_VALUE);
        assert_eq!(config.empty_score, MetricValue::Undefined);
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EvaluationConfig::default();

        config.metrics.clear();
        assert!(matches!(
            config.validate(),
            Err(SegMetricsError::InvalidParameter { .. })
        ));

        config.metrics = vec!["dice_score".into(), "dice_score".into()];
        assert!(matches!(
            config.validate(),
            Err(SegMetricsError::DuplicateMetric { .. })
        ));

        config.metrics = vec!["f1".into()];
        assert!(matches!(
            config.validate(),
            Err(SegMetricsError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn test_config_builder() {
        let config = EvaluationConfigBuilder::new()
            .metrics(["dice_score", "mse"])
            .metric("hausdorff_score")
            .err_value(f64::NAN)
            .empty_score(1.0)
            .parallel(true)
            .num_threads(2)
            .build()
            .unwrap();

        assert_eq!(config.metrics, vec!["dice_score", "mse", "hausdorff_score"]);
        assert_eq!(config.err_value, MetricValue::Undefined);
        assert_eq!(config.empty_score, MetricValue::Defined(1.0));
        assert_eq!(config.effective_num_threads(), 2);
        assert_eq!(
            config.metric_options(),
            MetricOptions {
                err_value: MetricValue::Undefined,
                empty_score: MetricValue::Defined(1.0),
            }
        );
    }

    #[test]
    fn test_config_builder_validation() {
        let result = EvaluationConfigBuilder::new().num_threads(4).build();
        assert!(matches!(
            result,
            Err(SegMetricsError::InvalidParameter { .. })
        ));

        let result = EvaluationConfigBuilder::new().metrics(Vec::<String>::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_call_order_does_not_matter() {
        let threads_last = EvaluationConfigBuilder::new()
            .parallel(true)
            .num_threads(2)
            .build()
            .unwrap();
        let threads_first = EvaluationConfigBuilder::new()
            .num_threads(2)
            .parallel(true)
            .build()
            .unwrap();

        assert_eq!(threads_last, threads_first);
        assert_eq!(threads_first.effective_num_threads(), 2);
    }

    #[test]
    fn test_threads_without_parallel_rejected_from_files() {
        let toml_result: EvaluationConfig = toml::from_str("num_threads = 2").unwrap();
        assert!(matches!(
            toml_result.validate(),
            Err(SegMetricsError::InvalidParameter { .. })
        ));

        let json_result: EvaluationConfig =
            serde_json::from_str(r#"{"num_threads": 2, "parallel": true}"#).unwrap();
        assert!(json_result.validate().is_ok());
    }

    #[test]
    fn test_infinite_sentinels_survive_json_and_toml() {
        let config = EvaluationConfigBuilder::new()
            .err_value(f64::INFINITY)
            .empty_score(f64::NEG_INFINITY)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""err_value":"inf""#));
        let from_json: EvaluationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(from_json.err_value, MetricValue::Defined(f64::INFINITY));
        assert_eq!(from_json.empty_score, MetricValue::Defined(f64::NEG_INFINITY));

        let text = toml::to_string(&config).unwrap();
        let from_toml: EvaluationConfig = toml::from_str(&text).unwrap();
        assert_eq!(from_toml, config);
    }

    #[test]
    fn test_config_toml_sentinels() {
        let config: EvaluationConfig = toml::from_str(
            r#"
            metrics = ["dice_score", "precision_score"]
            err_value = "undefined"
            empty_score = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.err_value, MetricValue::Undefined);
        assert_eq!(config.empty_score, MetricValue::Defined(0.0));
        assert!(!config.parallel);

        let text = toml::to_string(&config).unwrap();
        let reparsed: EvaluationConfig = toml::from_str(&text).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn test_config_json_null_sentinel() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"metrics": ["mse"], "empty_score": null, "err_value": 0.5}"#)
                .unwrap();
        assert_eq!(config.empty_score, MetricValue::Undefined);
        assert_eq!(config.err_value, MetricValue::Defined(0.5));
        assert_eq!(config.num_threads, DEFAULT_NUM_THREADS);
    }

    #[test]
    fn test_sentinel_parse() {
        assert_eq!(sentinel::parse("NaN").unwrap(), MetricValue::Undefined);
        assert_eq!(sentinel::parse(" 0.25 ").unwrap(), MetricValue::Defined(0.25));
        assert!(sentinel::parse("zero").is_err());
    }

    #[test]
    fn test_config_merge() {
        let mut base = EvaluationConfig::default();
        let other = EvaluationConfigBuilder::new()
            .metrics(["mse"])
            .parallel(true)
            .build()
            .unwrap();

        base.merge(&other).unwrap();
        assert_eq!(base.metrics, vec!["mse"]);
        assert!(base.parallel);
    }
}
