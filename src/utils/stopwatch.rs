//! Monotonic wall-clock stopwatch.

use std::time::{Duration, Instant};

/// Start/stop timer accumulating wall-clock time between `start` and `stop`.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch that is already running.
    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.start();
        watch
    }

    /// Start (or restart) timing. Time accumulated by earlier runs is kept.
    #[inline(always)]
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop timing and add the running interval to the total.
    #[inline(always)]
    pub fn stop(&mut self) {
        if let Some(start) = self.started.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Total time measured so far, including a still running interval.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(start) => self.elapsed + start.elapsed(),
            None => self.elapsed,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Clear the total and stop.
    pub fn reset(&mut self) {
        self.started = None;
        self.elapsed = Duration::ZERO;
    }
}

/// Format a duration in seconds with fixed precision.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3} s", duration.as_secs_f64())
}
