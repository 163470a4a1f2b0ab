//! Dot product implementations.
//!
//! This module contains all kernel variants and the descriptor that decides
//! which of them the build target can run.
//!
//! Wide kernels are selected at compile time: build with
//! `-C target-cpu=native` or `-C target-feature=+avx2,+fma` (resp.
//! `+avx512f`) to get them. A target with neither only has the scalar kernel.

mod original;
mod scalar;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2", target_feature = "fma"))]
mod x86_64_avx2;

#[cfg(all(target_arch = "x86_64", target_feature = "avx512f"))]
mod x86_64_avx512;

pub use original::dot_product_original;
pub use scalar::dot_product_scalar;

#[cfg(all(target_arch = "x86_64", target_feature = "avx2", target_feature = "fma"))]
pub use x86_64_avx2::dot_product_avx2;

#[cfg(all(target_arch = "x86_64", target_feature = "avx512f"))]
pub use x86_64_avx512::dot_product_avx512;

use crate::error::{Error, Result};
use crate::layout::{AlignedSpan, Elem, LANES_PER_LINE};
use crate::utils::VariantInfo;

/// Elements handed to one worker per fork: 512 cache lines, 32 KiB per operand.
pub const CHUNK_LEN: usize = 512 * LANES_PER_LINE;

/// Signature shared by the wide kernels.
pub type WideDotFn = for<'a> fn(&AlignedSpan<'a>, &AlignedSpan<'a>) -> Result<Elem>;

/// Instruction set a kernel is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Isa {
    /// Portable code, vectorized by the compiler.
    Scalar,
    /// 256-bit registers with FMA.
    Avx2,
    /// 512-bit registers.
    Avx512,
}

impl Isa {
    /// f64 values per register.
    pub const fn lanes(self) -> usize {
        match self {
            Isa::Scalar => 1,
            Isa::Avx2 => 4,
            Isa::Avx512 => 8,
        }
    }

    /// Registers (or scalar accumulators) consumed per loop step, chosen so a
    /// step always covers one cache line.
    pub const fn unroll(self) -> usize {
        LANES_PER_LINE / self.lanes()
    }

    /// True for the hand-written register kernels.
    pub const fn is_wide(self) -> bool {
        !matches!(self, Isa::Scalar)
    }

    /// Short identifier.
    pub const fn name(self) -> &'static str {
        match self {
            Isa::Scalar => "scalar",
            Isa::Avx2 => "avx2",
            Isa::Avx512 => "avx512",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Isa::Scalar => "SIMD (auto)",
            Isa::Avx2 => "AVX2",
            Isa::Avx512 => "AVX-512",
        }
    }

    /// One-line summary of how the kernel works.
    pub const fn description(self) -> &'static str {
        match self {
            Isa::Scalar => "Parallel lane-split loop, vectorized by the compiler",
            Isa::Avx2 => "AVX2 + FMA intrinsics, 2x4 lanes per cache line",
            Isa::Avx512 => "AVX-512F intrinsics, 8 lanes per cache line",
        }
    }

    /// The wide kernel for this ISA, if it was compiled in.
    pub fn wide_kernel(self) -> Option<WideDotFn> {
        match self {
            Isa::Scalar => None,
            #[cfg(all(target_arch = "x86_64", target_feature = "avx2", target_feature = "fma"))]
            Isa::Avx2 => Some(dot_product_avx2 as WideDotFn),
            #[cfg(all(target_arch = "x86_64", target_feature = "avx512f"))]
            Isa::Avx512 => Some(dot_product_avx512 as WideDotFn),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}

/// The kernel variants a build can run.
///
/// Selection logic lives here instead of at call sites: the suite iterates
/// [`KernelSet::wide_variants`] and skips whatever is missing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelSet {
    isas: Vec<Isa>,
}

impl KernelSet {
    /// ISAs whose kernels are compiled into this binary.
    pub fn compiled() -> Self {
        #[allow(unused_mut)]
        let mut isas = vec![Isa::Scalar];

        #[cfg(all(target_arch = "x86_64", target_feature = "avx2", target_feature = "fma"))]
        isas.push(Isa::Avx2);

        #[cfg(all(target_arch = "x86_64", target_feature = "avx512f"))]
        isas.push(Isa::Avx512);

        Self { isas }
    }

    /// Build a set from an explicit list. The scalar kernel is always present.
    pub fn from_isas(isas: impl IntoIterator<Item = Isa>) -> Self {
        let mut isas: Vec<Isa> = isas.into_iter().chain([Isa::Scalar]).collect();
        isas.sort();
        isas.dedup();
        Self { isas }
    }

    /// All ISAs, narrowest first.
    pub fn isas(&self) -> &[Isa] {
        &self.isas
    }

    /// True if `isa` is in the set.
    pub fn supports(&self, isa: Isa) -> bool {
        self.isas.contains(&isa)
    }

    /// Wide ISAs, narrowest first.
    pub fn wide(&self) -> impl Iterator<Item = Isa> + '_ {
        self.isas.iter().copied().filter(|isa| isa.is_wide())
    }

    /// Widest wide ISA in the set, `None` if only the scalar kernel exists.
    pub fn widest(&self) -> Option<Isa> {
        self.wide().max_by_key(|isa| isa.lanes())
    }

    /// Wide kernels ready to run, narrowest first.
    pub fn wide_variants(&self) -> Vec<VariantInfo<WideDotFn>> {
        self.wide()
            .filter_map(|isa| {
                isa.wide_kernel().map(|function| VariantInfo {
                    name: isa.name(),
                    description: isa.description(),
                    function,
                })
            })
            .collect()
    }
}

/// Dot product with the widest kernel of this build, falling back to the
/// scalar kernel when no wide kernel is compiled in.
pub fn dot_product_widest(x: &AlignedSpan<'_>, y: &AlignedSpan<'_>) -> Result<Elem> {
    match KernelSet::compiled().widest().and_then(Isa::wide_kernel) {
        Some(kernel) => kernel(x, y),
        None => dot_product_scalar(x, y),
    }
}

/// Fail with [`Error::ShapeMismatch`] unless both operands have the same length.
#[inline]
pub(crate) fn check_shape(x: &[Elem], y: &[Elem]) -> Result<()> {
    if x.len() != y.len() {
        return Err(Error::ShapeMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    Ok(())
}
