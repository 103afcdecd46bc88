//! # Segmentation Metrics
//!
//! Evaluation metrics for image segmentation models, computed on
//! [`ndarray`] arrays, plus an aggregator that averages them over a dataset.
//!
//! ## Features
//!
//! - **Overlap metrics**: Dice (binary and multi-class), intersection over
//!   union, precision, recall, specificity and accuracy.
//! - **Distance metrics**: directed Hausdorff distance for 2D, 3D and 4D
//!   volumes.
//! - **Regression metrics**: mean squared error.
//! - **Explicit undefined results**: degenerate inputs yield
//!   [`MetricValue::Undefined`] instead of a silent NaN.
//! - **Aggregation**: run a named set of metrics over batches, optionally on
//!   a rayon pool, and summarize with undefined results ignored.
//!
//! ## Quick Start
//!
//! ```rust
//! use segmentation_metrics::{EvaluationConfig, MetricAggregator};
//! use ndarray::array;
//!
//! # fn main() -> segmentation_metrics::Result<()> {
//! let config = EvaluationConfig::builder()
//!     .metrics(["precision_score", "recall_score", "dice_score"])
//!     .build()?;
//!
//! let mut aggregator = MetricAggregator::from_config(&config)?;
//!
//! let predictions = vec![array![[1.0, 0.0], [0.0, 1.0]]];
//! let ground_truths = vec![array![[1.0, 0.0], [0.0, 1.0]]];
//! aggregator.apply(&predictions, &ground_truths)?;
//!
//! let report = aggregator.summarize();
//! assert_eq!(report.value("dice_score"), Some(1.0));
//! assert_eq!(aggregator.num_samples(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: error type, metric value types and constants
//! - [`metrics`]: the metric functions and the named-metric registry
//! - [`evaluation`]: the aggregator and its report
//! - [`config`]: evaluation configuration from code, files or environment

#![doc(html_root_url = "https://docs.rs/segmentation-metrics/")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Metric functions
pub mod metrics;

// Dataset-level aggregation
pub mod evaluation;

// Re-export core functionality for convenience
pub use self::core::{
    constants::*,
    error::{Result, SegMetricsError},
    types::*,
};

// Re-export configuration functionality
pub use config::{ConfigFormat, EvaluationConfig, EvaluationConfigBuilder, DEFAULT_METRICS};

// Re-export metric functions
pub use metrics::{
    accuracy_score, dice_score, directed_hausdorff, hausdorff_score, intersection_over_union,
    mse, multi_class_dice_score, numeric_score, precision_score, recall_score, resolve_builtin,
    specificity_score, BuiltinMetric, MetricOptions, NamedMetric,
};

// Re-export evaluation functionality
pub use evaluation::{AggregateReport, AggregatorState, MetricAggregator};

// Version information
pub use self::core::constants::SEGMENTATION_METRICS_VERSION as VERSION;

/// Initialize the library.
///
/// Installs an `env_logger` logger (unless the host already installed one)
/// so that the crate's `log` output becomes visible. Metric functions work
/// without calling this.
///
/// # Examples
///
/// ```rust
/// fn main() -> segmentation_metrics::Result<()> {
///     segmentation_metrics::init()?;
///     assert!(segmentation_metrics::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    core::is_core_initialized()
}

/// Get library capabilities.
///
/// # Examples
///
/// ```rust
/// let caps = segmentation_metrics::capabilities();
/// println!("{}", caps.summary());
/// ```
pub fn capabilities() -> core::CoreCapabilities {
    core::CoreCapabilities::current()
}
