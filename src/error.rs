//! Error types for the dot product harness.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building buffers or running kernels.
#[derive(Error, Debug)]
pub enum Error {
    /// Operands of a kernel have different lengths.
    #[error("shape mismatch: x has {x_len} elements, y has {y_len} elements")]
    ShapeMismatch {
        /// Length of x.
        x_len: usize,
        /// Length of y.
        y_len: usize,
    },

    /// First element is not on a cache line boundary.
    #[error("buffer is misaligned: first element sits {offset} bytes past a cache line")]
    Misaligned {
        /// Address of the first element modulo the cache line size.
        offset: usize,
    },

    /// Byte size is not a multiple of the cache line size.
    #[error("buffer is not padded: {remainder} bytes past the last full cache line")]
    Unpadded {
        /// Byte size modulo the cache line size.
        remainder: usize,
    },

    /// Fixed-capacity buffer cannot hold the requested length.
    #[error("capacity exceeded: {required} elements requested, capacity is {capacity}")]
    Capacity {
        /// Requested element count.
        required: usize,
        /// Available element count.
        capacity: usize,
    },

    /// Bad command line value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Worker pool could not be configured.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O error (CSV export).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
