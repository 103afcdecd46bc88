//! Segmentation metric functions.
//!
//! Every metric compares a prediction with a ground truth of the same layout
//! and returns a [`MetricValue`](crate::core::types::MetricValue). Structural
//! problems (shape mismatch, unsupported rank) are errors; degenerate inputs
//! such as two empty masks produce a configurable sentinel instead.
//!
//! # Examples
//!
//! ## Binary masks
//!
//! ```rust
//! use segmentation_metrics::metrics::{dice_score, precision_score, recall_score};
//! use segmentation_metrics::{DEFAULT_EMPTY_SCORE, DEFAULT_ERR_VALUE};
//! use ndarray::array;
//!
//! # fn example() -> segmentation_metrics::Result<()> {
//! let prediction = array![[1.0, 0.0], [0.0, 1.0]];
//! let groundtruth = array![[1.0, 0.0], [0.0, 1.0]];
//!
//! assert_eq!(precision_score(&prediction, &groundtruth, DEFAULT_ERR_VALUE)?.value(), Some(1.0));
//! assert_eq!(recall_score(&prediction, &groundtruth, DEFAULT_ERR_VALUE)?.value(), Some(1.0));
//! assert_eq!(dice_score(&prediction, &groundtruth, DEFAULT_EMPTY_SCORE)?.value(), Some(1.0));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Named metrics
//!
//! ```rust
//! use segmentation_metrics::metrics::{BuiltinMetric, NamedMetric};
//! use segmentation_metrics::{MetricDirection, MetricValue};
//!
//! let dice = BuiltinMetric::DiceScore.to_named_metric(Default::default());
//! assert_eq!(dice.name(), "dice_score");
//!
//! let custom = NamedMetric::new("always_one", MetricDirection::Maximize, |_p, _g| {
//!     Ok(MetricValue::Defined(1.0))
//! });
//! assert_eq!(custom.name(), "always_one");
//! ```

pub mod confusion;
pub mod distance;
pub mod overlap;
pub mod ratio;
pub mod registry;
pub mod regression;

pub use confusion::numeric_score;
pub use distance::{directed_hausdorff, hausdorff_score};
pub use overlap::{dice_score, multi_class_dice_score};
pub use ratio::{
    accuracy_score, intersection_over_union, precision_score, recall_score, specificity_score,
};
pub use registry::{resolve_builtin, BuiltinMetric, MetricFn, MetricOptions, NamedMetric};
pub use regression::mse;

/// Helpers shared by the metric implementations.
pub(crate) mod utils {
    use crate::core::error::{Result, SegMetricsError};
    use ndarray::{ArrayBase, Data, Dimension};
    use num_traits::Float;

    /// Fail with a shape mismatch unless both arrays share the same shape.
    pub(crate) fn ensure_same_shape<A, B, S1, S2, D>(
        first: &ArrayBase<S1, D>,
        second: &ArrayBase<S2, D>,
    ) -> Result<()>
    where
        S1: Data<Elem = A>,
        S2: Data<Elem = B>,
        D: Dimension,
    {
        if first.shape() != second.shape() {
            return Err(SegMetricsError::shape_mismatch(first.shape(), second.shape()));
        }
        Ok(())
    }

    /// Lossless widening of an array element to `f64`.
    #[inline]
    pub(crate) fn to_f64<A: Float>(value: A) -> f64 {
        value.to_f64().unwrap_or(f64::NAN)
    }

    /// Sum of all elements, accumulated in `f64`.
    pub(crate) fn sum_f64<A, S, D>(array: &ArrayBase<S, D>) -> f64
    where
        A: Float,
        S: Data<Elem = A>,
        D: Dimension,
    {
        array.iter().map(|&x| to_f64(x)).sum()
    }
}
