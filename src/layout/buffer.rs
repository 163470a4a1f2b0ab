//! Buffer types and initialization.
//!
//! Two owning representations are used by the benchmarks:
//!
//! - `Vec<Elem>`: dynamically sized, whatever alignment the allocator gives
//! - [`AlignedArray`]: compile-time capacity, stored as whole cache lines, so
//!   it is aligned and padded by construction
//!
//! The padding region of an [`AlignedArray`] starts zeroed and is never
//! written by [`copy_into`], which keeps it neutral for the dot product.

use super::span::AlignedSpan;
use super::{Elem, CACHE_LINE, LANES_PER_LINE};
use crate::error::{Error, Result};
use rand::Rng;

/// One cache line worth of elements, aligned to the cache line.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(64))]
pub struct CacheLine(pub [Elem; LANES_PER_LINE]);

const _: () = assert!(std::mem::size_of::<CacheLine>() == CACHE_LINE);
const _: () = assert!(std::mem::align_of::<CacheLine>() == CACHE_LINE);

impl CacheLine {
    /// A line of zeros.
    pub const ZERO: Self = Self([0.0; LANES_PER_LINE]);
}

/// Fixed-capacity, cache-aligned buffer of `LINES` cache lines.
///
/// Storage lives on the heap so large capacities do not touch the stack, but
/// the capacity itself is a compile-time constant.
pub struct AlignedArray<const LINES: usize> {
    lines: Box<[CacheLine]>,
}

impl<const LINES: usize> AlignedArray<LINES> {
    /// Number of elements the buffer holds, padding included.
    pub const CAPACITY: usize = LINES * LANES_PER_LINE;

    const NON_EMPTY: () = assert!(LINES > 0, "AlignedArray needs at least one cache line");

    /// Create a zero-filled buffer.
    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            lines: vec![CacheLine::ZERO; LINES].into_boxed_slice(),
        }
    }

    /// Create a buffer holding `values` followed by zero padding.
    pub fn from_slice(values: &[Elem]) -> Result<Self> {
        if values.len() > Self::CAPACITY {
            return Err(Error::Capacity {
                required: values.len(),
                capacity: Self::CAPACITY,
            });
        }
        let mut array = Self::new();
        copy_into(values, array.as_mut_slice());
        Ok(array)
    }

    /// Capacity in elements.
    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    /// All elements, padding included.
    pub fn as_slice(&self) -> &[Elem] {
        // SAFETY: `CacheLine` is `repr(C)` over `[f64; LANES_PER_LINE]` and its
        // size equals the line size, so `LINES` lines are exactly `CAPACITY`
        // contiguous, initialized f64 values.
        unsafe { std::slice::from_raw_parts(self.lines.as_ptr().cast::<Elem>(), Self::CAPACITY) }
    }

    /// Mutable access to all elements, padding included.
    pub fn as_mut_slice(&mut self) -> &mut [Elem] {
        // SAFETY: same layout argument as `as_slice`; the borrow is unique.
        unsafe {
            std::slice::from_raw_parts_mut(self.lines.as_mut_ptr().cast::<Elem>(), Self::CAPACITY)
        }
    }

    /// Aligned view over the whole buffer.
    pub fn view(&self) -> AlignedSpan<'_> {
        // SAFETY: storage is a slice of `CacheLine`, so it starts on a line
        // boundary and spans a whole number of lines.
        unsafe { AlignedSpan::new_unchecked(self.as_slice()) }
    }
}

impl<const LINES: usize> Default for AlignedArray<LINES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const LINES: usize> std::fmt::Debug for AlignedArray<LINES> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedArray")
            .field("lines", &LINES)
            .field("capacity", &Self::CAPACITY)
            .finish()
    }
}

/// Fill every slot of `buffer` with an independent draw from U[0, 1).
///
/// An empty buffer is a caller bug.
pub fn fill_random<R: Rng + ?Sized>(buffer: &mut [Elem], rng: &mut R) {
    debug_assert!(!buffer.is_empty(), "fill_random needs a non-empty buffer");
    for slot in buffer.iter_mut() {
        *slot = rng.random();
    }
}

/// Allocate a vector of `length` random values in [0, 1).
pub fn random_vec<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Vec<Elem> {
    let mut values = vec![0.0; length];
    fill_random(&mut values, rng);
    values
}

/// Copy `source` into the front of `destination`.
///
/// Slots of `destination` past `source.len()` are left untouched.
///
/// # Panics
/// Panics if `destination` is shorter than `source`.
pub fn copy_into(source: &[Elem], destination: &mut [Elem]) {
    assert!(
        destination.len() >= source.len(),
        "destination holds {} elements, source has {}",
        destination.len(),
        source.len()
    );
    destination[..source.len()].copy_from_slice(source);
}
