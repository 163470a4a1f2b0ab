//! Sequential reference implementation of the dot product.
//!
//! Serves as the baseline for correctness: no threads, no lane splitting,
//! plain left-to-right summation.

use crate::layout::Elem;

/// Compute the dot product of two slices in index order.
///
/// # Panics
/// Panics if the slices have different lengths.
///
/// # Example
/// ```
/// use aligned_dot::math::dot_product::dot_product_original;
///
/// let x = [1.0, 2.0, 3.0, 4.0];
/// let y = [5.0, 6.0, 7.0, 8.0];
/// assert_eq!(dot_product_original(&x, &y), 70.0);
/// ```
pub fn dot_product_original(x: &[Elem], y: &[Elem]) -> Elem {
    assert_eq!(x.len(), y.len(), "Vectors must have the same length");

    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}
