/// Performance measurement utilities
/// Each pipeline stage is timed per frame and exposed for logging and analysis
pub mod profiling;

pub use profiling::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};

use std::fmt;
use std::time::{Duration, Instant};

/// Wall-clock stage timer. Adds the elapsed time to `slot` when dropped.
pub struct PerfTimer<'a> {
    slot: &'a mut Duration,
    start: Instant,
}

impl<'a> PerfTimer<'a> {
    #[inline]
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            slot,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

/// Run `f`, adding its wall-clock time to `slot`.
#[inline]
pub fn timed<R>(slot: &mut Duration, f: impl FnOnce() -> R) -> R {
    let _timer = PerfTimer::new(slot);
    f()
}

/// Per-stage durations and work counts of the most recent frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub width: usize,
    pub height: usize,

    pub setup: Duration,
    pub vertex: Duration,
    pub clipping: Duration,
    pub viewport_transform: Duration,
    pub binning: Duration,
    pub rasterization: Duration,
    pub gather: Duration,
    pub shadow: Duration,
    pub lighting: Duration,
    pub encode: Duration,
    pub total: Duration,

    pub triangles_in: usize,
    pub triangles_out: usize,
    pub bin_entries: usize,
}

impl FrameStats {
    pub fn stages(&self) -> [(&'static str, Duration); 10] {
        [
            ("setup", self.setup),
            ("vertex", self.vertex),
            ("clipping", self.clipping),
            ("viewport", self.viewport_transform),
            ("binning", self.binning),
            ("rasterization", self.rasterization),
            ("gather", self.gather),
            ("shadow", self.shadow),
            ("lighting", self.lighting),
            ("encode", self.encode),
        ]
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_us = self.total.as_secs_f64() * 1e6;
        writeln!(
            f,
            "frame {}x{}: {} tris in, {} after clipping, {} bin entries",
            self.width, self.height, self.triangles_in, self.triangles_out, self.bin_entries
        )?;
        for (name, duration) in self.stages() {
            let us = duration.as_secs_f64() * 1e6;
            let share = if total_us > 0.0 { us / total_us * 100.0 } else { 0.0 };
            writeln!(f, "  {name:<14} {us:10.2}μs ({share:5.1}%)")?;
        }
        write!(f, "  {:<14} {:10.2}μs", "total", total_us)
    }
}
