//! Per-phase wall-clock accounting, active with the `profiling` feature.
//!
//! Each pipeline phase opens a [`Timer`]; on drop the elapsed time is folded
//! into a process-wide table that [`report`] logs through `tracing`.
//! Without the feature the timer is a zero-sized no-op.

/// Pipeline phases that are timed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Invariant table computation for one target.
    Invariants,
    /// Atom table plus compatibility graph construction.
    Compatibility,
    /// Clique enumeration, assembly included.
    Search,
    /// Turning one clique into mappings.
    Assembly,
}

impl Phase {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invariants => "invariants",
            Self::Compatibility => "compatibility",
            Self::Search => "search",
            Self::Assembly => "assembly",
        }
    }
}

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;
    use std::time::{Duration, Instant};

    use dashmap::DashMap;

    use super::Phase;

    /// Accumulated timings of one phase.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PhaseStats {
        pub calls: u64,
        pub total: Duration,
        pub longest: Duration,
    }

    static TABLE: OnceLock<DashMap<Phase, PhaseStats>> = OnceLock::new();

    fn table() -> &'static DashMap<Phase, PhaseStats> {
        TABLE.get_or_init(DashMap::new)
    }

    /// Adds its lifetime to `phase` when dropped.
    pub struct Timer {
        phase: Phase,
        start: Instant,
    }

    impl Timer {
        #[inline]
        pub fn new(phase: Phase) -> Self {
            Self {
                phase,
                start: Instant::now(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            let elapsed = self.start.elapsed();
            let mut stats = table().entry(self.phase).or_default();
            stats.calls += 1;
            stats.total += elapsed;
            stats.longest = stats.longest.max(elapsed);
        }
    }

    /// Current totals, in phase order.
    pub fn snapshot() -> Vec<(Phase, PhaseStats)> {
        let mut rows: Vec<(Phase, PhaseStats)> =
            table().iter().map(|kv| (*kv.key(), *kv.value())).collect();
        rows.sort_by_key(|(phase, _)| *phase);
        rows
    }

    /// Log one line per phase that ran.
    pub fn report() {
        for (phase, stats) in snapshot() {
            let mean_us = if stats.calls == 0 {
                0.0
            } else {
                stats.total.as_secs_f64() * 1e6 / stats.calls as f64
            };
            tracing::info!(
                phase = phase.name(),
                calls = stats.calls,
                total_ms = stats.total.as_secs_f64() * 1e3,
                mean_us,
                longest_us = stats.longest.as_secs_f64() * 1e6,
                "phase timing"
            );
        }
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    use super::Phase;

    #[derive(Clone, Copy)]
    pub struct Timer;

    impl Timer {
        #[inline]
        pub const fn new(_: Phase) -> Self {
            Self
        }
    }

    pub const fn report() {}
}

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(not(feature = "profiling"))]
pub use disabled::*;
