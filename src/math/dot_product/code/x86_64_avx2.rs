//! x86_64 AVX2 + FMA kernel.
//!
//! A 256-bit register holds 4 f64, half a cache line. The loop is unrolled
//! twice with two independent accumulators so every step consumes exactly one
//! cache line of each operand.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{check_shape, CHUNK_LEN};
use crate::error::Result;
use crate::layout::{AlignedSpan, Elem};
use rayon::prelude::*;

/// f64 values per register.
pub const LANES: usize = 4;

/// Registers consumed per loop step.
pub const UNROLL: usize = 2;

/// Compute the dot product using AVX2 with fused multiply-add.
///
/// Chunks are reduced in parallel and their partial sums combined in index
/// order.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if the
/// lengths differ.
pub fn dot_product_avx2(x: &AlignedSpan<'_>, y: &AlignedSpan<'_>) -> Result<Elem> {
    let (x, y) = (x.as_slice(), y.as_slice());
    check_shape(x, y)?;
    debug_assert!(!x.is_empty(), "dot product of empty sequences");

    // Chunk boundaries are multiples of a cache line, so every chunk keeps the
    // alignment and padding of the whole span.
    let partials: Vec<Elem> = x
        .par_chunks(CHUNK_LEN)
        .zip(y.par_chunks(CHUNK_LEN))
        .map(|(a, b)| unsafe { dot_lines(a, b) })
        .collect();

    Ok(partials.into_iter().sum())
}

/// # Safety
/// `a` and `b` must start on a 32-byte boundary, have the same length, and
/// that length must be a multiple of `LANES * UNROLL`.
#[inline]
unsafe fn dot_lines(a: &[Elem], b: &[Elem]) -> Elem {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len() % (LANES * UNROLL), 0);

    let ap = a.as_ptr();
    let bp = b.as_ptr();

    let mut acc_lo = _mm256_setzero_pd();
    let mut acc_hi = _mm256_setzero_pd();

    let mut i = 0;
    while i < a.len() {
        acc_lo = _mm256_fmadd_pd(_mm256_load_pd(ap.add(i)), _mm256_load_pd(bp.add(i)), acc_lo);
        acc_hi = _mm256_fmadd_pd(
            _mm256_load_pd(ap.add(i + LANES)),
            _mm256_load_pd(bp.add(i + LANES)),
            acc_hi,
        );
        i += LANES * UNROLL;
    }

    reduce_add(_mm256_add_pd(acc_lo, acc_hi))
}

/// Horizontal sum of the 4 lanes.
#[inline]
unsafe fn reduce_add(v: __m256d) -> Elem {
    // v = [a, b, c, d]
    let pairs = _mm256_hadd_pd(v, v); // [a+b, a+b, c+d, c+d]
    let lo = _mm256_castpd256_pd128(pairs); // [a+b, a+b]
    let hi = _mm256_extractf128_pd(pairs, 1); // [c+d, c+d]
    _mm_cvtsd_f64(_mm_add_sd(lo, hi))
}
