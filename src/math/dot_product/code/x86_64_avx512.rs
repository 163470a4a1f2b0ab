//! x86_64 AVX-512F kernel.
//!
//! A 512-bit register holds 8 f64, a full cache line, so one accumulator and
//! one register per step already consume one line of each operand.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::{check_shape, CHUNK_LEN};
use crate::error::Result;
use crate::layout::{AlignedSpan, Elem};
use rayon::prelude::*;

/// f64 values per register.
pub const LANES: usize = 8;

/// Compute the dot product using AVX-512 with fused multiply-add.
///
/// # Errors
/// [`Error::ShapeMismatch`](crate::error::Error::ShapeMismatch) if the
/// lengths differ.
pub fn dot_product_avx512(x: &AlignedSpan<'_>, y: &AlignedSpan<'_>) -> Result<Elem> {
    let (x, y) = (x.as_slice(), y.as_slice());
    check_shape(x, y)?;
    debug_assert!(!x.is_empty(), "dot product of empty sequences");

    let partials: Vec<Elem> = x
        .par_chunks(CHUNK_LEN)
        .zip(y.par_chunks(CHUNK_LEN))
        .map(|(a, b)| unsafe { dot_lines(a, b) })
        .collect();

    Ok(partials.into_iter().sum())
}

/// # Safety
/// `a` and `b` must start on a 64-byte boundary, have the same length, and
/// that length must be a multiple of `LANES`.
#[inline]
unsafe fn dot_lines(a: &[Elem], b: &[Elem]) -> Elem {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len() % LANES, 0);

    let ap = a.as_ptr();
    let bp = b.as_ptr();

    let mut acc = _mm512_setzero_pd();

    let mut i = 0;
    while i < a.len() {
        acc = _mm512_fmadd_pd(_mm512_load_pd(ap.add(i)), _mm512_load_pd(bp.add(i)), acc);
        i += LANES;
    }

    reduce_add(acc)
}

/// Horizontal sum of the 8 lanes: 512 -> 256 -> 128 -> scalar.
#[inline]
unsafe fn reduce_add(v: __m512d) -> Elem {
    let quad = _mm256_add_pd(_mm512_castpd512_pd256(v), _mm512_extractf64x4_pd(v, 1));
    let pair = _mm_add_pd(_mm256_castpd256_pd128(quad), _mm256_extractf128_pd(quad, 1));
    _mm_cvtsd_f64(_mm_add_sd(pair, _mm_unpackhi_pd(pair, pair)))
}
