use std::time::{Duration, Instant};

/// Wall-clock stopwatch for whole runs and single native calls.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    pub fn start_new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Runs `f` and returns its value with the time it took.
    pub fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
        let watch = Self::start_new();
        let value = f();
        (value, watch.elapsed())
    }
}
