//! Utility modules for benchmarking and execution.

pub mod const_math;
pub mod cpu_affinity;
pub mod export;
pub mod stopwatch;

// Re-export commonly used items
pub use cpu_affinity::{pinned_core, WorkerPinning};
pub use export::export_csv;
pub use stopwatch::{format_seconds, Stopwatch};

/// Information about an algorithm implementation variant.
/// Generic over F which is the function signature.
pub struct VariantInfo<F> {
    /// Unique identifier for this variant (e.g., "scalar", "avx2")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// The specific implementation function
    pub function: F,
}
