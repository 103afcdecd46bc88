//! Confusion-matrix decomposition for binary masks.

use crate::core::{error::Result, types::ConfusionCounts};
use crate::metrics::utils::ensure_same_shape;
use ndarray::{ArrayBase, Data, Dimension, Zip};
use num_traits::Float;

/// Compute FP, FN, TP and TN between a binary prediction and ground truth.
///
/// Elements are compared against exactly `0` and `1`; anything else falls
/// into none of the four buckets, so the counts only sum to the element count
/// for genuinely binary inputs.
///
/// # Errors
///
/// Returns [`SegMetricsError::ShapeMismatch`](crate::SegMetricsError::ShapeMismatch)
/// when the two arrays differ in shape.
pub fn numeric_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
) -> Result<ConfusionCounts>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    ensure_same_shape(prediction, groundtruth)?;

    let (one, zero) = (A::one(), A::zero());
    let counts = Zip::from(prediction).and(groundtruth).fold(
        ConfusionCounts::default(),
        |mut counts, &p, &g| {
            if p == one && g == zero {
                counts.false_positive += 1.0;
            } else if p == zero && g == one {
                counts.false_negative += 1.0;
            } else if p == one && g == one {
                counts.true_positive += 1.0;
            } else if p == zero && g == zero {
                counts.true_negative += 1.0;
            }
            counts
        },
    );

    Ok(counts)
}
