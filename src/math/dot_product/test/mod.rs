//! Tests for dot product implementations.
//!
//! The wide kernels only exist when the build target enables their
//! features, so a plain `cargo test` covers the scalar kernel alone. Run
//!
//! ```text
//! RUSTFLAGS="-C target-cpu=native" cargo test
//! ```
//!
//! on an AVX2 or AVX-512 machine to exercise them as well.

use crate::error::Error;
use crate::layout::{padded_length, random_vec, AlignedArray, AlignedSpan, Elem, LANES_PER_LINE};
use crate::math::dot_product::code::*;
use crate::math::dot_product::{relative_error, verify, TOLERANCE};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_close(got: Elem, expected: Elem, msg: &str) {
    let rel = relative_error(got, expected);
    assert!(
        rel < TOLERANCE,
        "{}: expected {}, got {}, relative error = {:e}",
        msg,
        expected,
        got,
        rel
    );
}

/// Every kernel this build has, applied to aligned views of `x` and `y`.
fn all_kernels(x: AlignedSpan<'_>, y: AlignedSpan<'_>) -> Vec<(&'static str, Elem)> {
    let mut results = vec![
        ("scalar", dot_product_scalar(&x, &y).unwrap()),
        ("widest", dot_product_widest(&x, &y).unwrap()),
    ];
    for variant in KernelSet::compiled().wide_variants() {
        results.push((variant.name, (variant.function)(&x, &y).unwrap()));
    }
    results
}

#[test]
fn test_verify() {
    verify().unwrap();
}

#[test]
fn test_original_basic() {
    let x = [1.0, 2.0, 3.0, 4.0];
    let y = [5.0, 6.0, 7.0, 8.0];
    // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
    assert_eq!(dot_product_original(&x, &y), 70.0);
}

#[test]
fn test_fixture_all_shapes_and_kernels() {
    let x = vec![1.0, 2.0, 3.0, 4.0];
    let y = vec![5.0, 6.0, 7.0, 8.0];
    let x_arr = AlignedArray::<1>::from_slice(&x).unwrap();
    let y_arr = AlignedArray::<1>::from_slice(&y).unwrap();

    assert_eq!(dot_product_scalar(&x, &y).unwrap(), 70.0);
    assert_eq!(dot_product_scalar(&x[..], &y[..]).unwrap(), 70.0);
    assert_eq!(dot_product_scalar(&x_arr, &y_arr).unwrap(), 70.0);

    for (name, result) in all_kernels(x_arr.view(), y_arr.view()) {
        assert_close(result, 70.0, name);
    }
}

#[test]
fn test_single_element() {
    assert_eq!(dot_product_scalar(&[3.0], &[4.0]).unwrap(), 12.0);
}

#[test]
fn test_shape_mismatch() {
    for (nx, ny) in [(1, 2), (2, 1), (7, 8), (100, 99), (5000, 4096)] {
        let x = vec![1.0; nx];
        let y = vec![1.0; ny];
        let err = dot_product_scalar(&x, &y).unwrap_err();
        assert!(
            matches!(err, Error::ShapeMismatch { x_len, y_len } if x_len == nx && y_len == ny),
            "({}, {}) gave {:?}",
            nx,
            ny,
            err
        );
    }
}

#[test]
fn test_wide_shape_mismatch() {
    let a = AlignedArray::<2>::new();
    let b = AlignedArray::<1>::new();
    for variant in KernelSet::compiled().wide_variants() {
        let err = (variant.function)(&a.view(), &b.view()).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { x_len: 16, y_len: 8 }));
    }
    assert!(dot_product_widest(&a.view(), &b.view()).is_err());
}

#[test]
fn test_zero_vector_is_exactly_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    for length in [1, 8, 13, 4096, 10_000] {
        let zeros = vec![0.0; length];
        let y = random_vec(length, &mut rng);
        assert_eq!(dot_product_scalar(&zeros, &y).unwrap(), 0.0);
    }

    let zeros = AlignedArray::<1300>::new();
    let y = AlignedArray::<1300>::from_slice(&random_vec(10_000, &mut rng)).unwrap();
    for (name, result) in all_kernels(zeros.view(), y.view()) {
        assert_eq!(result, 0.0, "{}", name);
    }
}

#[test]
fn test_repeated_calls_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(99);
    let x = random_vec(50_000, &mut rng);
    let y = random_vec(50_000, &mut rng);
    let x_arr = AlignedArray::<6250>::from_slice(&x).unwrap();
    let y_arr = AlignedArray::<6250>::from_slice(&y).unwrap();

    let first = dot_product_scalar(&x, &y).unwrap();
    let first_wide = all_kernels(x_arr.view(), y_arr.view());
    for _ in 0..5 {
        assert_eq!(dot_product_scalar(&x, &y).unwrap().to_bits(), first.to_bits());
        for ((name, again), (_, before)) in all_kernels(x_arr.view(), y_arr.view()).iter().zip(&first_wide) {
            assert_eq!(again.to_bits(), before.to_bits(), "{}", name);
        }
    }
}

#[test]
fn test_padding_does_not_bias_result() {
    let mut rng = StdRng::seed_from_u64(5);
    let x = random_vec(1001, &mut rng);
    let y = random_vec(1001, &mut rng);
    let x_arr = AlignedArray::<126>::from_slice(&x).unwrap();
    let y_arr = AlignedArray::<126>::from_slice(&y).unwrap();
    assert_eq!(x_arr.capacity(), padded_length(1001));

    let expected = dot_product_original(&x, &y);
    assert_close(dot_product_scalar(&x_arr, &y_arr).unwrap(), expected, "array");
    for (name, result) in all_kernels(x_arr.view(), y_arr.view()) {
        assert_close(result, expected, name);
    }
}

#[test]
fn test_isa_geometry() {
    for isa in [Isa::Scalar, Isa::Avx2, Isa::Avx512] {
        // One cache line per loop step, whatever the register width
        assert_eq!(isa.lanes() * isa.unroll(), LANES_PER_LINE);
    }
    assert_eq!(Isa::Avx2.unroll(), 2);
    assert_eq!(Isa::Avx512.unroll(), 1);
    assert!(!Isa::Scalar.is_wide());
    assert!(Isa::Scalar.wide_kernel().is_none());
}

#[test]
fn test_widest_selection() {
    assert_eq!(KernelSet::from_isas([]).widest(), None);
    assert_eq!(KernelSet::from_isas([Isa::Avx2]).widest(), Some(Isa::Avx2));
    assert_eq!(KernelSet::from_isas([Isa::Avx512]).widest(), Some(Isa::Avx512));
    assert_eq!(
        KernelSet::from_isas([Isa::Avx512, Isa::Avx2]).widest(),
        Some(Isa::Avx512)
    );
}

#[test]
fn test_kernel_set_always_has_scalar() {
    let set = KernelSet::from_isas([Isa::Avx2, Isa::Avx2]);
    assert_eq!(set.isas(), &[Isa::Scalar, Isa::Avx2]);
    assert!(set.supports(Isa::Scalar));
    assert!(!set.supports(Isa::Avx512));
    assert_eq!(set.wide().collect::<Vec<_>>(), vec![Isa::Avx2]);

    let compiled = KernelSet::compiled();
    assert!(compiled.supports(Isa::Scalar));
    // Everything listed as compiled has a kernel
    for isa in compiled.wide() {
        assert!(isa.wide_kernel().is_some(), "{:?}", isa);
    }
    assert_eq!(compiled.wide_variants().len(), compiled.wide().count());
}

#[test]
fn test_compiled_set_matches_target_features() {
    let compiled = KernelSet::compiled();
    assert_eq!(
        compiled.supports(Isa::Avx2),
        cfg!(all(target_arch = "x86_64", target_feature = "avx2", target_feature = "fma"))
    );
    assert_eq!(
        compiled.supports(Isa::Avx512),
        cfg!(all(target_arch = "x86_64", target_feature = "avx512f"))
    );
    if compiled.widest().is_none() {
        eprintln!(
            "note: no wide kernel compiled in, only the scalar kernel was tested; \
             rerun with RUSTFLAGS=\"-C target-cpu=native\""
        );
    }
}

#[cfg(debug_assertions)]
#[test]
fn test_every_kernel_rejects_empty_input_in_debug() {
    use std::panic::catch_unwind;

    let array = AlignedArray::<1>::new();
    let empty = AlignedSpan::try_new(&array.as_slice()[..0]).unwrap();
    assert!(empty.is_empty());

    assert!(catch_unwind(|| dot_product_scalar(&empty, &empty)).is_err(), "scalar");
    assert!(catch_unwind(|| dot_product_widest(&empty, &empty)).is_err(), "widest");
    for variant in KernelSet::compiled().wide_variants() {
        let kernel = variant.function;
        assert!(
            catch_unwind(|| kernel(&empty, &empty)).is_err(),
            "{} accepted an empty span",
            variant.name
        );
    }
}

#[test]
fn test_wide_kernels_need_checked_views() {
    let array = AlignedArray::<4>::new();
    assert!(matches!(
        AlignedSpan::try_new(&array.as_slice()[1..9]),
        Err(Error::Misaligned { .. })
    ));
    assert!(matches!(
        AlignedSpan::try_new(&array.as_slice()[..12]),
        Err(Error::Unpadded { .. })
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_kernels_agree(lines in 1usize..=64, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = lines * LANES_PER_LINE;
        let x = AlignedArray::<64>::from_slice(&random_vec(len, &mut rng)).unwrap();
        let y = AlignedArray::<64>::from_slice(&random_vec(len, &mut rng)).unwrap();
        let xs = AlignedSpan::try_new(&x.as_slice()[..len]).unwrap();
        let ys = AlignedSpan::try_new(&y.as_slice()[..len]).unwrap();

        let expected = dot_product_original(xs.as_slice(), ys.as_slice());
        for (name, result) in all_kernels(xs, ys) {
            prop_assert!(
                relative_error(result, expected) < TOLERANCE,
                "{}: {} vs {}", name, result, expected
            );
        }
    }

    #[test]
    fn prop_scalar_matches_reference(len in 1usize..20_000, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x = random_vec(len, &mut rng);
        let y = random_vec(len, &mut rng);
        let got = dot_product_scalar(&x, &y).unwrap();
        prop_assert!(relative_error(got, dot_product_original(&x, &y)) < TOLERANCE);
    }
}
