//! Alignment diagnostic.

use super::span::Span;
use super::{CACHE_LINE, ELEM_SIZE};
use std::fmt;

/// Leftover bytes of a buffer with respect to the cache line.
///
/// Both fields are zero for an optimally laid out buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignmentReport {
    /// Address of the first element modulo the cache line size.
    pub address_offset: usize,
    /// Byte size of the buffer modulo the cache line size.
    pub length_remainder: usize,
}

impl AlignmentReport {
    /// True when the buffer is aligned and padded.
    pub fn is_optimal(&self) -> bool {
        self.address_offset == 0 && self.length_remainder == 0
    }
}

impl fmt::Display for AlignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " first_element%cache_line: {}", self.address_offset)?;
        write!(f, " length%cache_line:        {}", self.length_remainder)
    }
}

/// Inspect where `buffer` starts and how far its size runs past a line.
pub fn report<S: Span + ?Sized>(buffer: &S) -> AlignmentReport {
    let data = buffer.as_span();
    AlignmentReport {
        address_offset: data.as_ptr() as usize % CACHE_LINE,
        length_remainder: (data.len() * ELEM_SIZE) % CACHE_LINE,
    }
}
