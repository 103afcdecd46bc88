//! Named metric functions and the catalogue of built-in metrics.
//!
//! A [`NamedMetric`] pairs a stable identifier with a callable of fixed
//! signature. The identifier is the key under which the aggregator stores
//! results, so it must be unique within one aggregator.

use crate::core::{
    constants::{DEFAULT_EMPTY_SCORE, DEFAULT_ERR_VALUE},
    error::{Result, SegMetricsError},
    types::{MetricDirection, MetricValue},
};
use crate::metrics::{
    accuracy_score, dice_score, hausdorff_score, intersection_over_union, mse,
    multi_class_dice_score, precision_score, recall_score, specificity_score,
};
use ndarray::ArrayViewD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Signature shared by every metric the aggregator can run.
pub type MetricFn =
    dyn Fn(&ArrayViewD<'_, f64>, &ArrayViewD<'_, f64>) -> Result<MetricValue> + Send + Sync;

/// A metric function together with its result key.
#[derive(Clone)]
pub struct NamedMetric {
    name: String,
    direction: MetricDirection,
    func: Arc<MetricFn>,
}

impl NamedMetric {
    /// Create a named metric from any compatible closure or function.
    pub fn new<S, F>(name: S, direction: MetricDirection, func: F) -> Self
    where
        S: Into<String>,
        F: Fn(&ArrayViewD<'_, f64>, &ArrayViewD<'_, f64>) -> Result<MetricValue>
            + Send
            + Sync
            + 'static,
    {
        NamedMetric {
            name: name.into(),
            direction,
            func: Arc::new(func),
        }
    }

    /// Result key of this metric
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether larger values are better
    pub fn direction(&self) -> MetricDirection {
        self.direction
    }

    /// Evaluate the metric on one sample
    pub fn evaluate(
        &self,
        prediction: &ArrayViewD<'_, f64>,
        groundtruth: &ArrayViewD<'_, f64>,
    ) -> Result<MetricValue> {
        (self.func)(prediction, groundtruth)
    }
}

impl fmt::Debug for NamedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedMetric")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Tunables forwarded to built-in metrics that take a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricOptions {
    /// Returned by ratio metrics when their denominator is zero
    pub err_value: MetricValue,
    /// Returned by Dice when both arrays are empty
    pub empty_score: MetricValue,
}

impl Default for MetricOptions {
    fn default() -> Self {
        MetricOptions {
            err_value: DEFAULT_ERR_VALUE,
            empty_score: DEFAULT_EMPTY_SCORE,
        }
    }
}

/// Metrics shipped with the crate, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinMetric {
    /// Soft Dice coefficient
    DiceScore,
    /// Mean Dice over the class axis
    MultiClassDiceScore,
    /// TP / (TP + FP)
    PrecisionScore,
    /// TP / (TP + FN)
    RecallScore,
    /// TN / (TN + FP)
    SpecificityScore,
    /// TP / (TP + FP + FN)
    IntersectionOverUnion,
    /// (TP + TN) / N
    AccuracyScore,
    /// Directed Hausdorff distance
    HausdorffScore,
    /// Mean squared error
    Mse,
}

impl BuiltinMetric {
    /// Every built-in metric, in catalogue order
    pub const ALL: [BuiltinMetric; 9] = [
        BuiltinMetric::DiceScore,
        BuiltinMetric::MultiClassDiceScore,
        BuiltinMetric::PrecisionScore,
        BuiltinMetric::RecallScore,
        BuiltinMetric::SpecificityScore,
        BuiltinMetric::IntersectionOverUnion,
        BuiltinMetric::AccuracyScore,
        BuiltinMetric::HausdorffScore,
        BuiltinMetric::Mse,
    ];

    /// Stable result key
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinMetric::DiceScore => "dice_score",
            BuiltinMetric::MultiClassDiceScore => "multi_class_dice_score",
            BuiltinMetric::PrecisionScore => "precision_score",
            BuiltinMetric::RecallScore => "recall_score",
            BuiltinMetric::SpecificityScore => "specificity_score",
            BuiltinMetric::IntersectionOverUnion => "intersection_over_union",
            BuiltinMetric::AccuracyScore => "accuracy_score",
            BuiltinMetric::HausdorffScore => "hausdorff_score",
            BuiltinMetric::Mse => "mse",
        }
    }

    /// Whether larger values are better
    pub fn direction(&self) -> MetricDirection {
        match self {
            BuiltinMetric::HausdorffScore | BuiltinMetric::Mse => MetricDirection::Minimize,
            _ => MetricDirection::Maximize,
        }
    }

    /// Bind the metric to its tunables
    pub fn to_named_metric(self, options: MetricOptions) -> NamedMetric {
        let MetricOptions {
            err_value,
            empty_score,
        } = options;
        let name = self.name();
        let direction = self.direction();

        match self {
            BuiltinMetric::DiceScore => {
                NamedMetric::new(name, direction, move |p, g| dice_score(p, g, empty_score))
            }
            BuiltinMetric::MultiClassDiceScore => {
                NamedMetric::new(name, direction, |p, g| multi_class_dice_score(p, g))
            }
            BuiltinMetric::PrecisionScore => {
                NamedMetric::new(name, direction, move |p, g| precision_score(p, g, err_value))
            }
            BuiltinMetric::RecallScore => {
                NamedMetric::new(name, direction, move |p, g| recall_score(p, g, err_value))
            }
            BuiltinMetric::SpecificityScore => {
                NamedMetric::new(name, direction, move |p, g| specificity_score(p, g, err_value))
            }
            BuiltinMetric::IntersectionOverUnion => NamedMetric::new(name, direction, move |p, g| {
                intersection_over_union(p, g, err_value)
            }),
            BuiltinMetric::AccuracyScore => {
                NamedMetric::new(name, direction, |p, g| accuracy_score(p, g))
            }
            BuiltinMetric::HausdorffScore => {
                NamedMetric::new(name, direction, |p, g| hausdorff_score(p, g))
            }
            BuiltinMetric::Mse => NamedMetric::new(name, direction, |p, g| mse(p, g)),
        }
    }
}

impl fmt::Display for BuiltinMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinMetric {
    type Err = SegMetricsError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        BuiltinMetric::ALL
            .iter()
            .copied()
            .find(|metric| metric.name() == wanted)
            .ok_or_else(|| SegMetricsError::unknown_metric(wanted))
    }
}

/// Resolve a list of metric names into named metrics sharing one set of tunables.
pub fn resolve_builtin<S: AsRef<str>>(names: &[S], options: MetricOptions) -> Result<Vec<NamedMetric>> {
    names
        .iter()
        .map(|name| Ok(name.as_ref().parse::<BuiltinMetric>()?.to_named_metric(options)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_builtin_names_round_trip() {
        for metric in BuiltinMetric::ALL {
            assert_eq!(metric.name().parse::<BuiltinMetric>().unwrap(), metric);
            assert_eq!(metric.to_string(), metric.name());
        }
    }

    #[test]
    fn test_unknown_metric() {
        let err = "f1_score".parse::<BuiltinMetric>().unwrap_err();
        assert!(matches!(err, SegMetricsError::UnknownMetric { .. }));
    }

    #[test]
    fn test_builtin_directions() {
        assert_eq!(BuiltinMetric::DiceScore.direction(), MetricDirection::Maximize);
        assert_eq!(BuiltinMetric::HausdorffScore.direction(), MetricDirection::Minimize);
        assert_eq!(BuiltinMetric::Mse.direction(), MetricDirection::Minimize);
    }

    #[test]
    fn test_named_metric_forwards_options() {
        let zeros = Array2::<f64>::zeros((3, 3)).into_dyn();
        let options = MetricOptions {
            err_value: MetricValue::Defined(-1.0),
            empty_score: MetricValue::Defined(0.5),
        };

        let dice = BuiltinMetric::DiceScore.to_named_metric(options);
        assert_eq!(
            dice.evaluate(&zeros.view(), &zeros.view()).unwrap(),
            MetricValue::Defined(0.5)
        );

        let precision = BuiltinMetric::PrecisionScore.to_named_metric(options);
        assert_eq!(
            precision.evaluate(&zeros.view(), &zeros.view()).unwrap(),
            MetricValue::Defined(-1.0)
        );
    }

    #[test]
    fn test_custom_named_metric() {
        let metric = NamedMetric::new("sum_difference", MetricDirection::Minimize, |p, g| {
            Ok(MetricValue::new((p.sum() - g.sum()).abs()))
        });

        let p = array![[1.0, 1.0]].into_dyn();
        let g = array![[1.0, 0.0]].into_dyn();
        assert_eq!(metric.name(), "sum_difference");
        assert_eq!(
            metric.evaluate(&p.view(), &g.view()).unwrap(),
            MetricValue::Defined(1.0)
        );
        assert!(format!("{:?}", metric).contains("sum_difference"));
    }

    #[test]
    fn test_resolve_builtin() {
        let metrics = resolve_builtin(&["dice_score", "mse"], MetricOptions::default()).unwrap();
        let names: Vec<&str> = metrics.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["dice_score", "mse"]);

        assert!(resolve_builtin(&["dice_score", "nope"], MetricOptions::default()).is_err());
    }
}
