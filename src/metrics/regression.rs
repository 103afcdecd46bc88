//! Error metrics between two arrays.

use crate::core::{
    error::{Result, SegMetricsError},
    types::MetricValue,
};
use crate::metrics::utils::{ensure_same_shape, to_f64};
use ndarray::{ArrayBase, Data, Dimension, Zip};
use num_traits::Float;

/// Mean squared error, Σ(im1 − im2)² / (shape[0] · shape[1]).
///
/// Compatibility note: the normalizer is the product of the first two axis
/// sizes only, whatever the rank of the inputs. For 3D or 4D volumes this is
/// not the element count. The scale is kept as-is because existing result
/// tables were produced with it.
///
/// An axis of size zero makes the normalizer zero and the result
/// [`MetricValue::Undefined`].
///
/// # Errors
///
/// [`SegMetricsError::ShapeMismatch`] when shapes differ and
/// [`SegMetricsError::InvalidDimension`] for inputs with fewer than two axes.
pub fn mse<A, S1, S2, D>(im1: &ArrayBase<S1, D>, im2: &ArrayBase<S2, D>) -> Result<MetricValue>
where
    A: Float,
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    ensure_same_shape(im1, im2)?;

    let shape = im1.shape();
    if shape.len() < 2 {
        return Err(SegMetricsError::invalid_dimension(format!(
            "mse requires at least 2 axes, got {}",
            shape.len()
        )));
    }

    let err = Zip::from(im1).and(im2).fold(0.0, |acc, &a, &b| {
        let diff = to_f64(a) - to_f64(b);
        acc + diff * diff
    });

    let normalizer = (shape[0] * shape[1]) as f64;
    Ok(MetricValue::new(err / normalizer))
}
