//! Directed Hausdorff distance and its slice-wise extension to volumes.
//!
//! A 2D array is read as a point set: each row is one point whose
//! coordinates are the row's values. Volumes are reduced slice by slice.

use crate::core::{
    error::{Result, SegMetricsError},
    types::MetricValue,
};
use crate::metrics::utils::to_f64;
use ndarray::{Array, ArrayBase, ArrayView2, ArrayViewD, Axis, Data, Dimension, Ix2, Ix3};
use num_traits::Float;

/// One-directional Hausdorff distance from `u` to `v`.
///
/// The supremum over rows of `u` of the Euclidean distance to the nearest
/// row of `v`. The inner scan stops as soon as a point is known not to raise
/// the running maximum, so the result is exact without visiting every pair.
///
/// Returns [`MetricValue::Undefined`] when either point set is empty.
///
/// # Errors
///
/// [`SegMetricsError::ShapeMismatch`] when the point dimensions (column
/// counts) differ.
pub fn directed_hausdorff(u: ArrayView2<'_, f64>, v: ArrayView2<'_, f64>) -> Result<MetricValue> {
    if u.ncols() != v.ncols() {
        return Err(SegMetricsError::ShapeMismatch {
            expected: format!("{} columns", u.ncols()),
            actual: format!("{} columns", v.ncols()),
        });
    }
    if u.nrows() == 0 || v.nrows() == 0 {
        return Ok(MetricValue::Undefined);
    }

    let mut cmax = 0.0_f64;
    for a in u.outer_iter() {
        let mut cmin = f64::INFINITY;
        let mut exhausted = true;
        for b in v.outer_iter() {
            let d: f64 = a
                .iter()
                .zip(b.iter())
                .map(|(&x, &y)| (x - y) * (x - y))
                .sum();
            if d < cmax {
                exhausted = false;
                break;
            }
            if d < cmin {
                cmin = d;
            }
        }
        if exhausted && cmin.is_finite() && cmin > cmax {
            cmax = cmin;
        }
    }

    Ok(MetricValue::new(cmax.sqrt()))
}

/// Directed Hausdorff distance between a prediction and a ground truth.
///
/// - 2 axes: the distance between the raw arrays, rows as points.
/// - 3 axes `(H, S, W)`: the mean over `S` of the distance between the
///   `(H, W)` slices.
/// - 4 axes `(C, H, D, W)`: the buffer is reinterpreted in row-major order
///   as `(H, C·D, W)` and treated as a 3-axis input. This is a reshape, not a
///   transpose. It is only meaningful if class and depth both index
///   independent 2D slices in the caller's layout.
///
/// Only the point dimension is checked. Row counts may differ between the two
/// inputs.
///
/// # Errors
///
/// [`SegMetricsError::InvalidDimension`] for any other rank, and
/// [`SegMetricsError::ShapeMismatch`] when the inputs cannot be paired up.
pub fn hausdorff_score<A, S1, S2, D>(
    prediction: &ArrayBase<S1, D>,
    groundtruth: &ArrayBase<S2, D>,
) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    let prediction = prediction.mapv(to_f64).into_dyn();
    let groundtruth = groundtruth.mapv(to_f64).into_dyn();

    match prediction.ndim() {
        4 => {
            let shape = prediction.shape();
            let folded = (shape[1], shape[0] * shape[2], shape[3]);
            let prediction = fold_class_and_depth(prediction.view(), folded)?;
            let groundtruth = fold_class_and_depth(groundtruth.view(), folded)?;
            slice_mean_hausdorff(prediction.view().into_dyn(), groundtruth.view().into_dyn())
        }
        3 => slice_mean_hausdorff(prediction.view(), groundtruth.view()),
        2 => {
            let u = as_ix2(prediction.view())?;
            let v = as_ix2(groundtruth.view())?;
            directed_hausdorff(u, v)
        }
        n => Err(SegMetricsError::invalid_dimension(format!(
            "hausdorff_score supports 2, 3 or 4 axes, got {}",
            n
        ))),
    }
}

fn fold_class_and_depth(
    array: ArrayViewD<'_, f64>,
    shape: (usize, usize, usize),
) -> Result<Array<f64, Ix3>> {
    let len = array.len();
    Array::from_shape_vec(shape, array.iter().copied().collect()).map_err(|_| {
        SegMetricsError::ShapeMismatch {
            expected: format!("{:?}", [shape.0, shape.1, shape.2]),
            actual: format!("{} elements", len),
        }
    })
}

fn slice_mean_hausdorff(
    prediction: ArrayViewD<'_, f64>,
    groundtruth: ArrayViewD<'_, f64>,
) -> Result<MetricValue> {
    let prediction = as_ix3(prediction)?;
    let groundtruth = as_ix3(groundtruth)?;

    let n_slices = prediction.len_of(Axis(1));
    if groundtruth.len_of(Axis(1)) < n_slices {
        return Err(SegMetricsError::shape_mismatch(
            prediction.shape(),
            groundtruth.shape(),
        ));
    }
    if n_slices == 0 {
        return Ok(MetricValue::Undefined);
    }

    let mut total = 0.0;
    for idx in 0..n_slices {
        let pred = prediction.index_axis(Axis(1), idx);
        let gt = groundtruth.index_axis(Axis(1), idx);
        total += directed_hausdorff(pred, gt)?.to_f64();
    }
    log::trace!("hausdorff over {} slices: total {}", n_slices, total);

    Ok(MetricValue::new(total / n_slices as f64))
}

fn as_ix2(array: ArrayViewD<'_, f64>) -> Result<ArrayView2<'_, f64>> {
    let ndim = array.ndim();
    array.into_dimensionality::<Ix2>().map_err(|_| {
        SegMetricsError::invalid_dimension(format!("expected 2 axes, got {}", ndim))
    })
}

fn as_ix3(array: ArrayViewD<'_, f64>) -> Result<ndarray::ArrayView3<'_, f64>> {
    let ndim = array.ndim();
    array.into_dimensionality::<Ix3>().map_err(|_| {
        SegMetricsError::invalid_dimension(format!("expected 3 axes, got {}", ndim))
    })
}
