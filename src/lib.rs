//! # Aligned-Dot
//!
//! Dot product kernels benchmarked under controlled cache-line alignment:
//! an auto-vectorized parallel loop and hand-written AVX2 and AVX-512
//! kernels, each run over owning, fixed-capacity aligned, and view buffers.

pub mod config;
pub mod error;
pub mod layout;
pub mod math;
pub mod tui;
pub mod utils;

pub use error::{Error, Result};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::config::{parse_args, BenchConfig, Command, VECTOR_LENGTH};
    pub use crate::error::{Error, Result};
    pub use crate::layout::{lines_for, AlignedArray, AlignedSpan, Elem, Span};
    pub use crate::math::dot_product;
    pub use crate::math::dot_product::bench::Suite;
    pub use crate::math::dot_product::{Isa, KernelSet};
}
