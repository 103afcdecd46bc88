//! Error handling and error types for segmentation metrics.
//!
//! Two kinds of failure exist in this crate. Structural problems (arrays that
//! cannot be compared, misconfigured aggregators) are reported through
//! [`SegMetricsError`]. Degenerate-but-valid inputs such as two empty masks are
//! not errors at all; they yield a [`MetricValue`](crate::core::types::MetricValue)
//! sentinel instead.

use std::io;
use thiserror::Error;

/// Main error type for the segmentation metrics library.
#[derive(Error, Debug)]
pub enum SegMetricsError {
    /// Compared arrays do not share the same shape
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Array rank not supported by the metric
    #[error("Invalid dimension: {message}")]
    InvalidDimension { message: String },

    /// Prediction and ground-truth batches have different lengths
    #[error("Batch length mismatch: {predictions} predictions, {ground_truths} ground truths")]
    BatchLengthMismatch {
        predictions: usize,
        ground_truths: usize,
    },

    /// Two registered metrics share a name
    #[error("Duplicate metric name: {name}")]
    DuplicateMetric { name: String },

    /// Metric name not found in the built-in registry
    #[error("Unknown metric: {name}")]
    UnknownMetric { name: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

/// Type alias for Results using SegMetricsError
pub type Result<T> = std::result::Result<T, SegMetricsError>;

impl SegMetricsError {
    /// Create a shape mismatch error from two array shapes
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        SegMetricsError::ShapeMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    /// Create an invalid dimension error
    pub fn invalid_dimension<S: Into<String>>(message: S) -> Self {
        SegMetricsError::InvalidDimension {
            message: message.into(),
        }
    }

    /// Create a batch length mismatch error
    pub fn batch_length_mismatch(predictions: usize, ground_truths: usize) -> Self {
        SegMetricsError::BatchLengthMismatch {
            predictions,
            ground_truths,
        }
    }

    /// Create a duplicate metric error
    pub fn duplicate_metric<S: Into<String>>(name: S) -> Self {
        SegMetricsError::DuplicateMetric { name: name.into() }
    }

    /// Create an unknown metric error
    pub fn unknown_metric<S: Into<String>>(name: S) -> Self {
        SegMetricsError::UnknownMetric { name: name.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        SegMetricsError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        SegMetricsError::Config {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Shape and dimension errors point at misaligned input data: the same
    /// sample will fail again, so none of them are recoverable. I/O errors
    /// may succeed on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SegMetricsError::ShapeMismatch { .. } => false,
            SegMetricsError::InvalidDimension { .. } => false,
            SegMetricsError::BatchLengthMismatch { .. } => false,
            SegMetricsError::DuplicateMetric { .. } => false,
            SegMetricsError::UnknownMetric { .. } => false,
            SegMetricsError::InvalidParameter { .. } => false,
            SegMetricsError::Config { .. } => false,
            SegMetricsError::IO { .. } => true,
            SegMetricsError::Json { .. } => false,
            SegMetricsError::Toml { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            SegMetricsError::ShapeMismatch { .. } => "shape_mismatch",
            SegMetricsError::InvalidDimension { .. } => "invalid_dimension",
            SegMetricsError::BatchLengthMismatch { .. } => "batch_length_mismatch",
            SegMetricsError::DuplicateMetric { .. } => "duplicate_metric",
            SegMetricsError::UnknownMetric { .. } => "unknown_metric",
            SegMetricsError::InvalidParameter { .. } => "invalid_parameter",
            SegMetricsError::Config { .. } => "config",
            SegMetricsError::IO { .. } => "io",
            SegMetricsError::Json { .. } => "json",
            SegMetricsError::Toml { .. } => "toml",
        }
    }
}

/// Convenience macro for configuration errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::SegMetricsError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::SegMetricsError::config(format!($fmt, $($arg)*))
    };
}

/// Return early with the given error when the condition does not hold
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let err = SegMetricsError::shape_mismatch(&[2, 2], &[3, 3]);
        let message = err.to_string();
        assert!(message.contains("Shape mismatch"));
        assert!(message.contains("[2, 2]"));
        assert!(message.contains("[3, 3]"));
        assert_eq!(err.category(), "shape_mismatch");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("bad value");
        assert!(matches!(err, SegMetricsError::Config { .. }));

        let err = config_error!("bad value: {}", 42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: usize) -> Result<usize> {
            ensure!(value > 0, SegMetricsError::invalid_dimension("zero"));
            Ok(value)
        }

        assert!(check(1).is_ok());
        assert!(matches!(
            check(0),
            Err(SegMetricsError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_parameter_errors() {
        let err = SegMetricsError::invalid_parameter("num_threads", "-1", "must be non-negative");
        assert_eq!(err.category(), "invalid_parameter");
        assert!(err.to_string().contains("num_threads"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: SegMetricsError = io_err.into();
        assert!(matches!(err, SegMetricsError::IO { .. }));
        assert_eq!(err.category(), "io");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_batch_length_mismatch() {
        let err = SegMetricsError::batch_length_mismatch(3, 2);
        assert_eq!(err.category(), "batch_length_mismatch");
        assert!(err.to_string().contains("3 predictions"));
    }
}
