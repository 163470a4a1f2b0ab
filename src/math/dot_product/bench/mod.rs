//! Benchmark driver for dot product kernels.

pub mod suite;

pub use suite::{BenchRow, Case, Suite};

use crate::error::Result;
use crate::layout::Elem;
use crate::utils::Stopwatch;
use std::hint::black_box;
use std::time::Duration;

/// Outcome of timing one kernel on one pair of containers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchReport {
    /// Wall-clock time of the whole loop.
    pub elapsed: Duration,
    /// Number of kernel calls inside the loop.
    pub iterations: usize,
    /// Result of one call, for display.
    pub result: Elem,
}

impl BenchReport {
    /// Average time of one call, `None` when the loop ran zero times.
    pub fn per_call(&self) -> Option<Duration> {
        (self.iterations > 0).then(|| {
            let nanos = self.elapsed.as_nanos() / self.iterations as u128;
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        })
    }
}

/// Call `kernel(x, y)` `iterations` times and time the loop.
///
/// The displayed result is computed once before timing starts, so a shape
/// mismatch aborts the run without entering the loop. Results inside the
/// loop go through `black_box` and are otherwise dropped.
pub fn run<S, F>(x: &S, y: &S, kernel: F, iterations: usize) -> Result<BenchReport>
where
    S: ?Sized,
    F: Fn(&S, &S) -> Result<Elem>,
{
    let result = kernel(x, y)?;

    let mut watch = Stopwatch::started();
    for _ in 0..iterations {
        let _ = black_box(kernel(black_box(x), black_box(y)));
    }
    watch.stop();

    Ok(BenchReport {
        elapsed: watch.elapsed(),
        iterations,
        result,
    })
}
