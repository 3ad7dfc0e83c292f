/// Instrumentation for pipeline tuning
/// Counts triangles and pixels as they flow through the stages, plus optional hardware counters
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters, incremented from inside parallel stages
pub struct FunctionCounters {
    // Geometry
    pub triangles_submitted: AtomicU64,
    pub triangles_clipped: AtomicU64,
    pub triangles_discarded: AtomicU64,
    pub triangles_emitted: AtomicU64,

    // Binning and tiles
    pub bin_entries: AtomicU64,
    pub tile_triangles_culled: AtomicU64,

    // Pixels
    pub pixels_tested: AtomicU64,
    pub depth_passed: AtomicU64,
    pub depth_failed: AtomicU64,
    pub pixels_shadowed: AtomicU64,

    pub frames_drawn: AtomicU64,
}

impl FunctionCounters {
    pub const fn new() -> Self {
        Self {
            triangles_submitted: AtomicU64::new(0),
            triangles_clipped: AtomicU64::new(0),
            triangles_discarded: AtomicU64::new(0),
            triangles_emitted: AtomicU64::new(0),
            bin_entries: AtomicU64::new(0),
            tile_triangles_culled: AtomicU64::new(0),
            pixels_tested: AtomicU64::new(0),
            depth_passed: AtomicU64::new(0),
            depth_failed: AtomicU64::new(0),
            pixels_shadowed: AtomicU64::new(0),
            frames_drawn: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        for counter in self.all() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn all(&self) -> [&AtomicU64; 11] {
        [
            &self.triangles_submitted,
            &self.triangles_clipped,
            &self.triangles_discarded,
            &self.triangles_emitted,
            &self.bin_entries,
            &self.tile_triangles_culled,
            &self.pixels_tested,
            &self.depth_passed,
            &self.depth_failed,
            &self.pixels_shadowed,
            &self.frames_drawn,
        ]
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            triangles_submitted: self.triangles_submitted.load(Ordering::Relaxed),
            triangles_clipped: self.triangles_clipped.load(Ordering::Relaxed),
            triangles_discarded: self.triangles_discarded.load(Ordering::Relaxed),
            triangles_emitted: self.triangles_emitted.load(Ordering::Relaxed),
            bin_entries: self.bin_entries.load(Ordering::Relaxed),
            tile_triangles_culled: self.tile_triangles_culled.load(Ordering::Relaxed),
            pixels_tested: self.pixels_tested.load(Ordering::Relaxed),
            depth_passed: self.depth_passed.load(Ordering::Relaxed),
            depth_failed: self.depth_failed.load(Ordering::Relaxed),
            pixels_shadowed: self.pixels_shadowed.load(Ordering::Relaxed),
            frames_drawn: self.frames_drawn.load(Ordering::Relaxed),
        }
    }
}

impl Default for FunctionCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of counter values at a point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub triangles_submitted: u64,
    pub triangles_clipped: u64,
    pub triangles_discarded: u64,
    pub triangles_emitted: u64,
    pub bin_entries: u64,
    pub tile_triangles_culled: u64,
    pub pixels_tested: u64,
    pub depth_passed: u64,
    pub depth_failed: u64,
    pub pixels_shadowed: u64,
    pub frames_drawn: u64,
}

impl CounterSnapshot {
    /// Print formatted report
    pub fn print_report(&self) {
        println!("\n=== Pipeline Counters Report ===");
        println!("frames drawn:                 {:12}", self.frames_drawn);

        println!("\nGeometry:");
        println!("  triangles submitted:        {:12}", self.triangles_submitted);
        println!("  triangles clipped:          {:12}", self.triangles_clipped);
        println!("  triangles discarded:        {:12}", self.triangles_discarded);
        println!("  triangles emitted:          {:12}", self.triangles_emitted);

        println!("\nTiles:");
        println!("  bin entries:                {:12}", self.bin_entries);
        println!("  culled in tiles:            {:12}", self.tile_triangles_culled);

        println!("\nPixels:");
        println!("  pixels tested:              {:12}", self.pixels_tested);
        println!("  depth test passed:          {:12}", self.depth_passed);
        println!("  depth test failed:          {:12}", self.depth_failed);
        if self.pixels_tested > 0 {
            let pass_rate = (self.depth_passed as f64 / self.pixels_tested as f64) * 100.0;
            println!("  depth test pass rate:       {:11.2}%", pass_rate);
        }
        println!("  pixels shadowed:            {:12}", self.pixels_shadowed);

        println!();
    }
}

/// Global function counters instance
pub static FUNCTION_COUNTERS: FunctionCounters = FunctionCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add($value as u64, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

/// Hardware performance counters around a block of frames
#[cfg(all(feature = "profiling", target_os = "linux"))]
pub mod hardware {
    use perf_event::events::Hardware;
    use perf_event::{Builder, Counter};

    pub struct PerfCounters {
        pub cpu_cycles: Option<Counter>,
        pub instructions: Option<Counter>,
        pub cache_references: Option<Counter>,
        pub cache_misses: Option<Counter>,
    }

    impl PerfCounters {
        /// Counters the kernel refuses (no permission, virtualised PMU) stay `None`.
        pub fn new() -> Self {
            let build = |kind: Hardware| Builder::new().kind(kind).build().ok();
            Self {
                cpu_cycles: build(Hardware::CPU_CYCLES),
                instructions: build(Hardware::INSTRUCTIONS),
                cache_references: build(Hardware::CACHE_REFERENCES),
                cache_misses: build(Hardware::CACHE_MISSES),
            }
        }

        fn each(&mut self) -> impl Iterator<Item = &mut Counter> {
            [
                self.cpu_cycles.as_mut(),
                self.instructions.as_mut(),
                self.cache_references.as_mut(),
                self.cache_misses.as_mut(),
            ]
            .into_iter()
            .flatten()
        }

        pub fn enable_all(&mut self) {
            for c in self.each() {
                let _ = c.enable();
            }
        }

        pub fn disable_all(&mut self) {
            for c in self.each() {
                let _ = c.disable();
            }
        }

        pub fn read_all(&mut self) -> PerfSnapshot {
            let read = |c: &mut Option<Counter>| c.as_mut().and_then(|c| c.read().ok()).unwrap_or(0);
            PerfSnapshot {
                cpu_cycles: read(&mut self.cpu_cycles),
                instructions: read(&mut self.instructions),
                cache_references: read(&mut self.cache_references),
                cache_misses: read(&mut self.cache_misses),
            }
        }
    }

    impl Default for PerfCounters {
        fn default() -> Self {
            Self::new()
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct PerfSnapshot {
        pub cpu_cycles: u64,
        pub instructions: u64,
        pub cache_references: u64,
        pub cache_misses: u64,
    }

    impl PerfSnapshot {
        pub fn print_report(&self) {
            println!("\n=== Hardware Performance Counters ===");
            println!("CPU Cycles:            {:16}", self.cpu_cycles);
            println!("Instructions:          {:16}", self.instructions);
            if self.cpu_cycles > 0 {
                let ipc = self.instructions as f64 / self.cpu_cycles as f64;
                println!("IPC (Instructions/Cycle): {:13.3}", ipc);
            }

            println!("Cache References:      {:16}", self.cache_references);
            println!("Cache Misses:          {:16}", self.cache_misses);
            if self.cache_references > 0 {
                let miss_rate = (self.cache_misses as f64 / self.cache_references as f64) * 100.0;
                println!("Cache Miss Rate:       {:13.2}%", miss_rate);
            }
            println!();
        }
    }
}
