//! Parallel, auto-vectorized scalar kernel.
//!
//! One algorithm for every container shape: the operands are taken as plain
//! slices through [`Span`], split into cache-line-multiple chunks, and each
//! chunk is reduced on a rayon worker with one accumulator per lane of a
//! cache line. LLVM turns the lane loop into packed multiply-adds for whatever
//! vector width the build target has.
//!
//! Chunk partial sums are combined in index order after the join, so a call
//! is bit-reproducible. Results still differ in the last bits from the
//! sequential reference and from the wide kernels, because the association
//! of the partial sums differs.

use super::{check_shape, CHUNK_LEN};
use crate::error::Result;
use crate::layout::{Elem, Span, LANES_PER_LINE};
use rayon::prelude::*;

/// Compute the dot product of `x` and `y`.
///
/// Accepts any [`Span`]: `Vec<f64>`, `[f64]`, [`AlignedArray`], or
/// [`AlignedSpan`]. No alignment is required.
///
/// # Errors
/// [`Error::ShapeMismatch`] if the lengths differ.
///
/// [`AlignedArray`]: crate::layout::AlignedArray
/// [`AlignedSpan`]: crate::layout::AlignedSpan
/// [`Error::ShapeMismatch`]: crate::error::Error::ShapeMismatch
pub fn dot_product_scalar<S: Span + ?Sized>(x: &S, y: &S) -> Result<Elem> {
    let (x, y) = (x.as_span(), y.as_span());
    check_shape(x, y)?;
    debug_assert!(!x.is_empty(), "dot product of empty sequences");

    let partials: Vec<Elem> = x
        .par_chunks(CHUNK_LEN)
        .zip(y.par_chunks(CHUNK_LEN))
        .map(|(a, b)| dot_chunk(a, b))
        .collect();

    Ok(partials.into_iter().sum())
}

/// Lane-split reduction of one chunk.
#[inline]
fn dot_chunk(a: &[Elem], b: &[Elem]) -> Elem {
    let mut acc = [0.0; LANES_PER_LINE];

    let mut a_lines = a.chunks_exact(LANES_PER_LINE);
    let mut b_lines = b.chunks_exact(LANES_PER_LINE);
    for (la, lb) in (&mut a_lines).zip(&mut b_lines) {
        for lane in 0..LANES_PER_LINE {
            acc[lane] += la[lane] * lb[lane];
        }
    }

    let tail: Elem = a_lines
        .remainder()
        .iter()
        .zip(b_lines.remainder())
        .map(|(p, q)| p * q)
        .sum();

    acc.iter().sum::<Elem>() + tail
}
