//! Read-only span capability shared by all container shapes.
//!
//! Every kernel reduces over a `&[Elem]`; [`Span`] is how each buffer kind
//! hands that slice over. [`AlignedSpan`] is the checked view the wide kernels
//! require: holding one proves the slice starts on a cache line and covers a
//! whole number of lines.

use super::buffer::AlignedArray;
use super::{Elem, CACHE_LINE, ELEM_SIZE, LANES_PER_LINE};
use crate::error::{Error, Result};

/// A contiguous, read-only run of elements.
pub trait Span {
    /// The elements as a slice.
    fn as_span(&self) -> &[Elem];

    /// Number of elements.
    fn span_len(&self) -> usize {
        self.as_span().len()
    }
}

impl Span for [Elem] {
    fn as_span(&self) -> &[Elem] {
        self
    }
}

impl<const N: usize> Span for [Elem; N] {
    fn as_span(&self) -> &[Elem] {
        self
    }
}

impl Span for Vec<Elem> {
    fn as_span(&self) -> &[Elem] {
        self
    }
}

impl<const LINES: usize> Span for AlignedArray<LINES> {
    fn as_span(&self) -> &[Elem] {
        self.as_slice()
    }
}

impl Span for AlignedSpan<'_> {
    fn as_span(&self) -> &[Elem] {
        self.data
    }
}

/// Non-owning view whose start is cache-line aligned and whose byte size is a
/// multiple of the cache line.
#[derive(Clone, Copy, Debug)]
pub struct AlignedSpan<'a> {
    data: &'a [Elem],
}

impl<'a> AlignedSpan<'a> {
    /// Check `data` and wrap it.
    pub fn try_new(data: &'a [Elem]) -> Result<Self> {
        let offset = data.as_ptr() as usize % CACHE_LINE;
        if offset != 0 {
            return Err(Error::Misaligned { offset });
        }
        let remainder = (data.len() * ELEM_SIZE) % CACHE_LINE;
        if remainder != 0 {
            return Err(Error::Unpadded { remainder });
        }
        Ok(Self { data })
    }

    /// Wrap `data` without checking.
    ///
    /// # Safety
    /// `data` must start on a [`CACHE_LINE`] boundary and its length must be a
    /// multiple of [`LANES_PER_LINE`]. The wide kernels use aligned loads and
    /// read whole lines, so violating this is undefined behavior.
    pub unsafe fn new_unchecked(data: &'a [Elem]) -> Self {
        debug_assert_eq!(data.as_ptr() as usize % CACHE_LINE, 0);
        debug_assert_eq!(data.len() % LANES_PER_LINE, 0);
        Self { data }
    }

    /// The viewed elements.
    pub fn as_slice(&self) -> &'a [Elem] {
        self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the view covers no element.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of cache lines covered.
    pub fn lines(&self) -> usize {
        self.data.len() / LANES_PER_LINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_accepts_aligned_array() {
        let array = AlignedArray::<2>::new();
        let span = AlignedSpan::try_new(array.as_slice()).unwrap();
        assert_eq!(span.len(), 16);
        assert_eq!(span.lines(), 2);
    }

    #[test]
    fn test_try_new_accepts_line_prefix() {
        let array = AlignedArray::<4>::new();
        let span = AlignedSpan::try_new(&array.as_slice()[..16]).unwrap();
        assert_eq!(span.lines(), 2);
    }

    #[test]
    fn test_try_new_rejects_misaligned() {
        let array = AlignedArray::<2>::new();
        let err = AlignedSpan::try_new(&array.as_slice()[1..9]).unwrap_err();
        assert!(matches!(err, Error::Misaligned { offset: 8 }));
    }

    #[test]
    fn test_try_new_rejects_unpadded() {
        let array = AlignedArray::<2>::new();
        let err = AlignedSpan::try_new(&array.as_slice()[..5]).unwrap_err();
        assert!(matches!(err, Error::Unpadded { remainder: 40 }));
    }

    #[test]
    fn test_span_impls_agree() {
        let values = vec![1.0, 2.0, 3.0];
        let array = AlignedArray::<1>::from_slice(&values).unwrap();
        assert_eq!(values.span_len(), 3);
        assert_eq!(values.as_slice().span_len(), 3);
        assert_eq!([1.0f64, 2.0].span_len(), 2);
        assert_eq!(array.span_len(), 8);
        assert_eq!(array.view().span_len(), 8);
        assert_eq!(&array.as_span()[..3], values.as_span());
    }
}
