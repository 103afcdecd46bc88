//! Core data types for segmentation metrics.
//!
//! [`MetricValue`] is the result of every metric function. It keeps a
//! computed number apart from the "not applicable" case (zero denominator,
//! two empty masks) instead of overloading NaN for both meanings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of evaluating one metric on one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum MetricValue {
    /// A computed scalar
    Defined(f64),
    /// The metric does not apply to this sample
    #[default]
    Undefined,
}

impl MetricValue {
    /// Wrap a scalar, mapping NaN to [`MetricValue::Undefined`].
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            MetricValue::Undefined
        } else {
            MetricValue::Defined(value)
        }
    }

    /// The computed scalar, if any.
    ///
    /// A `Defined(NaN)` built directly through the variant is still treated
    /// as undefined here.
    pub fn value(&self) -> Option<f64> {
        match *self {
            MetricValue::Defined(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    /// Whether this result carries a usable scalar
    pub fn is_defined(&self) -> bool {
        self.value().is_some()
    }

    /// The scalar, or `default` when undefined
    pub fn unwrap_or(&self, default: f64) -> f64 {
        self.value().unwrap_or(default)
    }

    /// The scalar, with NaN standing in for undefined
    pub fn to_f64(&self) -> f64 {
        self.unwrap_or(f64::NAN)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::new(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Undefined, MetricValue::new)
    }
}

impl From<MetricValue> for Option<f64> {
    fn from(value: MetricValue) -> Self {
        value.value()
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "undefined"),
        }
    }
}

/// Confusion counts between a binary prediction and a binary ground truth.
///
/// Counts are reals so that ratios derived from them divide exactly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Predicted 1, ground truth 0
    pub false_positive: f64,
    /// Predicted 0, ground truth 1
    pub false_negative: f64,
    /// Predicted 1, ground truth 1
    pub true_positive: f64,
    /// Predicted 0, ground truth 0
    pub true_negative: f64,
}

impl ConfusionCounts {
    /// Create counts in (FP, FN, TP, TN) order
    pub fn new(false_positive: f64, false_negative: f64, true_positive: f64, true_negative: f64) -> Self {
        ConfusionCounts {
            false_positive,
            false_negative,
            true_positive,
            true_negative,
        }
    }

    /// Sum of all four counts
    pub fn total(&self) -> f64 {
        self.false_positive + self.false_negative + self.true_positive + self.true_negative
    }

    /// Counts as an (FP, FN, TP, TN) tuple
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (
            self.false_positive,
            self.false_negative,
            self.true_positive,
            self.true_negative,
        )
    }
}

/// Whether larger values of a metric indicate a better segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricDirection {
    /// Larger is better (overlap and ratio metrics)
    Maximize,
    /// Smaller is better (distances and errors)
    Minimize,
}

impl fmt::Display for MetricDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricDirection::Maximize => write!(f, "maximize"),
            MetricDirection::Minimize => write!(f, "minimize"),
        }
    }
}
