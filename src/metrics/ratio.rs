//! Ratio metrics derived from confusion counts.
//!
//! Each guarded ratio returns the caller's `err_value` when its denominator
//! is zero, so one degenerate sample does not abort a batch evaluation.
//! [`DEFAULT_ERR_VALUE`](crate::core::constants::DEFAULT_ERR_VALUE) is `0.0`.

use crate::core::{error::Result, types::MetricValue};
use crate::metrics::confusion::numeric_score;
use ndarray::{ArrayBase, Data, Dimension};
use num_traits::Float;

#[inline]
fn guarded_ratio(numerator: f64, denominator: f64, err_value: MetricValue) -> MetricValue {
    if denominator <= 0.0 {
        err_value
    } else {
        MetricValue::new(numerator / denominator)
    }
}

/// Positive predictive value, TP / (TP + FP).
pub fn precision_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
    err_value: MetricValue,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let c = numeric_score(prediction, groundtruth)?;
    Ok(guarded_ratio(
        c.true_positive,
        c.true_positive + c.false_positive,
        err_value,
    ))
}

/// True positive rate, TP / (TP + FN).
pub fn recall_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
    err_value: MetricValue,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let c = numeric_score(prediction, groundtruth)?;
    Ok(guarded_ratio(
        c.true_positive,
        c.true_positive + c.false_negative,
        err_value,
    ))
}

/// True negative rate, TN / (TN + FP).
pub fn specificity_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
    err_value: MetricValue,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let c = numeric_score(prediction, groundtruth)?;
    Ok(guarded_ratio(
        c.true_negative,
        c.true_negative + c.false_positive,
        err_value,
    ))
}

/// Intersection over union (Jaccard index), TP / (TP + FP + FN).
pub fn intersection_over_union<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
    err_value: MetricValue,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let c = numeric_score(prediction, groundtruth)?;
    Ok(guarded_ratio(
        c.true_positive,
        c.true_positive + c.false_positive + c.false_negative,
        err_value,
    ))
}

/// Accuracy, (TP + TN) / N.
///
/// There is no `err_value`: N is the full element count. Empty arrays give
/// [`MetricValue::Undefined`].
pub fn accuracy_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let c = numeric_score(prediction, groundtruth)?;
    let n = c.total();
    Ok(MetricValue::new((c.true_positive + c.true_negative) / n))
}
