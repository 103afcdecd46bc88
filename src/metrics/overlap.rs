//! Overlap metrics: soft Dice and its multi-class average.

use crate::core::{
    constants::MULTI_CLASS_EMPTY_SCORE,
    error::{Result, SegMetricsError},
    types::MetricValue,
};
use crate::metrics::utils::{ensure_same_shape, sum_f64, to_f64};
use ndarray::{ArrayBase, Axis, Data, Dimension, RemoveAxis, Zip};
use num_traits::Float;

/// Soft Dice coefficient, 2·Σ(im1·im2) / (Σim1 + Σim2).
///
/// No thresholding is applied, so probability maps are accepted as well as
/// binary masks. When both arrays sum to zero the ratio is 0/0 and
/// `empty_score` is returned instead.
///
/// # Errors
///
/// Returns [`SegMetricsError::ShapeMismatch`] when the shapes differ.
pub fn dice_score<A, S1, S2, D>(
    im1: &ArrayBase<S1, D>,
    im2: &ArrayBase<S2, D>,
    empty_score: MetricValue,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    ensure_same_shape(im1, im2)?;

    let im_sum = sum_f64(im1) + sum_f64(im2);
    if im_sum == 0.0 {
        return Ok(empty_score);
    }

    let intersection = Zip::from(im1)
        .and(im2)
        .fold(0.0, |acc, &a, &b| acc + to_f64(a) * to_f64(b));

    Ok(MetricValue::new(2.0 * intersection / im_sum))
}

/// Mean Dice over the leading class axis.
///
/// A class that is empty in both arrays scores 1.0: agreeing that a class is
/// absent counts as a success here, unlike [`dice_score`] on its own.
///
/// # Errors
///
/// Shape mismatch, or a zero-dimensional input with no class axis.
pub fn multi_class_dice_score<A, S1, S2, D>(
    im1: &ArrayBase<S1, D>,
    im2: &ArrayBase<S2, D>,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension + RemoveAxis,
{
    ensure_same_shape(im1, im2)?;
    if im1.ndim() == 0 {
        return Err(SegMetricsError::invalid_dimension(
            "multi-class dice requires a leading class axis",
        ));
    }

    let n_classes = im1.len_of(Axis(0));
    if n_classes == 0 {
        return Ok(MetricValue::Undefined);
    }

    let mut dice_per_class = 0.0;
    for (class1, class2) in im1.axis_iter(Axis(0)).zip(im2.axis_iter(Axis(0))) {
        dice_per_class += dice_score(&class1, &class2, MULTI_CLASS_EMPTY_SCORE)?.to_f64();
    }

    Ok(MetricValue::new(dice_per_class / n_classes as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_EMPTY_SCORE;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2, Array3, ArrayD, IxDyn};

    #[test]
    fn test_dice_identical_masks() {
        let mask = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(
            dice_score(&mask, &mask, DEFAULT_EMPTY_SCORE).unwrap(),
            MetricValue::Defined(1.0)
        );
    }

    #[test]
    fn test_dice_partial_overlap() {
        let im1 = array![[1.0, 1.0], [0.0, 0.0]];
        let im2 = array![[1.0, 0.0], [1.0, 0.0]];
        let dice = dice_score(&im1, &im2, DEFAULT_EMPTY_SCORE).unwrap();
        assert_abs_diff_eq!(dice.to_f64(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_dice_soft_values() {
        let im1 = array![0.5, 0.5];
        let im2 = array![1.0, 0.0];
        // 2 * 0.5 / (1.0 + 1.0)
        let dice = dice_score(&im1, &im2, DEFAULT_EMPTY_SCORE).unwrap();
        assert_abs_diff_eq!(dice.to_f64(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_dice_empty_returns_empty_score() {
        let zeros = Array2::<f64>::zeros((4, 4));
        assert_eq!(
            dice_score(&zeros, &zeros, DEFAULT_EMPTY_SCORE).unwrap(),
            MetricValue::Undefined
        );
        assert_eq!(
            dice_score(&zeros, &zeros, MetricValue::Defined(0.25)).unwrap(),
            MetricValue::Defined(0.25)
        );
    }

    #[test]
    fn test_dice_shape_mismatch() {
        let p = Array2::<f64>::zeros((2, 2));
        let g = Array2::<f64>::zeros((3, 3));
        assert!(matches!(
            dice_score(&p, &g, DEFAULT_EMPTY_SCORE),
            Err(SegMetricsError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_multi_class_dice_identical() {
        let im = Array3::from_shape_fn((3, 4, 4), |(c, i, j)| ((c + i + j) % 2) as f64);
        assert_eq!(
            multi_class_dice_score(&im, &im).unwrap(),
            MetricValue::Defined(1.0)
        );
    }

    #[test]
    fn test_multi_class_dice_empty_class_is_perfect() {
        // class 0: perfect overlap, class 1: empty in both, class 2: disjoint
        let im1 = array![[1.0, 0.0], [0.0, 0.0], [1.0, 0.0]];
        let im2 = array![[1.0, 0.0], [0.0, 0.0], [0.0, 1.0]];
        let dice = multi_class_dice_score(&im1, &im2).unwrap();
        assert_abs_diff_eq!(dice.to_f64(), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_multi_class_dice_errors() {
        let scalar = ArrayD::<f64>::zeros(IxDyn(&[]));
        assert!(matches!(
            multi_class_dice_score(&scalar, &scalar),
            Err(SegMetricsError::InvalidDimension { .. })
        ));

        let p = Array3::<f64>::zeros((2, 2, 2));
        let g = Array3::<f64>::zeros((3, 2, 2));
        assert!(multi_class_dice_score(&p, &g).is_err());

        let no_classes = Array2::<f64>::zeros((0, 3));
        assert_eq!(
            multi_class_dice_score(&no_classes, &no_classes).unwrap(),
            MetricValue::Undefined
        );
    }
}
