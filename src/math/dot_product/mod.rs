//! # Dot Product Algorithm
//!
//! The dot product (also known as scalar product) computes the sum of products
//! of corresponding elements in two vectors:
//!
//! `dot(x, y) = Σ(x[i] * y[i])`
//!
//! ## Kernels
//!
//! - **Scalar**: parallel lane-split loop, vectorized by the compiler, works on
//!   any container
//! - **AVX2**: 256-bit FMA intrinsics, two registers per cache line
//! - **AVX-512**: 512-bit FMA intrinsics, one register per cache line
//!
//! The wide kernels use aligned loads and only accept an
//! [`AlignedSpan`](crate::layout::AlignedSpan).
//!
//! ## Floating point
//!
//! Kernels associate partial sums differently (per chunk, per lane, per
//! register), so results agree within a small relative tolerance, not
//! bit for bit. Each kernel on its own is deterministic.

pub mod bench;
pub mod code;
#[cfg(test)]
mod test;

pub use code::*;

use crate::layout::{lines_for, random_vec, AlignedArray, Elem};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Relative tolerance between kernels.
pub const TOLERANCE: Elem = 1e-9;

/// Relative difference of `got` against `expected`, absolute near zero.
pub fn relative_error(got: Elem, expected: Elem) -> Elem {
    let diff = (got - expected).abs();
    if expected.abs() > 1e-12 {
        diff / expected.abs()
    } else {
        diff
    }
}

/// Verify correctness of all compiled kernels against the sequential reference.
pub fn verify() -> Result<(), String> {
    // Non-aligned size to exercise padding
    const SIZE: usize = 1023;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let x = random_vec(SIZE, &mut rng);
    let y = random_vec(SIZE, &mut rng);
    let x_arr = AlignedArray::<{ lines_for(SIZE) }>::from_slice(&x).map_err(|e| e.to_string())?;
    let y_arr = AlignedArray::<{ lines_for(SIZE) }>::from_slice(&y).map_err(|e| e.to_string())?;

    let expected = dot_product_original(&x, &y);

    let mut results = vec![
        ("scalar (vector)", dot_product_scalar(&x, &y)),
        ("scalar (array)", dot_product_scalar(&x_arr, &y_arr)),
        ("scalar (span)", dot_product_scalar(x_arr.as_slice(), y_arr.as_slice())),
        ("widest", dot_product_widest(&x_arr.view(), &y_arr.view())),
    ];
    for variant in KernelSet::compiled().wide_variants() {
        results.push((variant.name, (variant.function)(&x_arr.view(), &y_arr.view())));
    }

    for (name, result) in results {
        let got = result.map_err(|e| format!("Variant '{}' failed: {}", name, e))?;
        let rel = relative_error(got, expected);
        if rel > TOLERANCE {
            return Err(format!(
                "Variant '{}' failed verification. Expected {}, got {}, relative error {:e}",
                name, expected, got, rel
            ));
        }
    }

    Ok(())
}
