//! # Cache-line layout
//!
//! Alignment policy shared by every buffer the kernels read:
//!
//! - the element type is fixed to [`Elem`] (`f64`)
//! - buffers read by the wide kernels start on a [`CACHE_LINE`] boundary
//! - their byte size is a whole number of cache lines
//!
//! The padding helpers are `const fn` so fixed-capacity buffers can be sized
//! at compile time.

pub mod buffer;
pub mod diagnostic;
pub mod span;

pub use buffer::{copy_into, fill_random, random_vec, AlignedArray, CacheLine};
pub use diagnostic::{report, AlignmentReport};
pub use span::{AlignedSpan, Span};

/// Element type of every sequence.
pub type Elem = f64;

/// Size of a cache line in bytes on the reference target.
pub const CACHE_LINE: usize = 64;

/// Byte size of one element.
pub const ELEM_SIZE: usize = std::mem::size_of::<Elem>();

/// Number of elements filling one cache line.
pub const LANES_PER_LINE: usize = CACHE_LINE / ELEM_SIZE;

/// Number of padding elements of size `elem_size` needed after `length`
/// elements so the total byte size is a multiple of the cache line.
///
/// `elem_size` must divide [`CACHE_LINE`].
pub const fn padding_for(length: usize, elem_size: usize) -> usize {
    ((CACHE_LINE - (elem_size * length) % CACHE_LINE) % CACHE_LINE) / elem_size
}

/// Padding elements needed after `length` values of [`Elem`].
///
/// # Example
/// ```
/// use aligned_dot::layout::padding;
///
/// assert_eq!(padding(8), 0);
/// assert_eq!(padding(13), 3);
/// ```
pub const fn padding(length: usize) -> usize {
    padding_for(length, ELEM_SIZE)
}

/// Smallest element count `>= length` whose byte size is a whole number of
/// cache lines.
pub const fn padded_length(length: usize) -> usize {
    length + padding(length)
}

/// Number of cache lines covering `length` elements once padded.
pub const fn lines_for(length: usize) -> usize {
    padded_length(length) / LANES_PER_LINE
}
