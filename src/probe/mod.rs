// src/probe/mod.rs
// =============================================================================
// This module runs the concurrent probe: URLs go in, matching URLs come out.
//
// Submodules:
// - worker: One worker's loop plus the single HTTP GET it performs per URL
// - pool:   Starts the workers, feeds the intake queue, and closes the
//           output channel once every worker has returned
//
// Data flow:
//
//   targets ──► intake queue ──► worker × N ──► output channel ──► collector
//                                    │
//                                    └── transport errors ──► log (stderr)
//
// Rust concepts:
// - Channels: The only way workers talk to each other and to main
// - tokio::spawn: Each worker is an independent async task
// - JoinHandle: Lets the coordinator wait for a task and read its return value
// =============================================================================

mod pool;
mod worker;

use serde::Serialize;
use std::fmt;

pub use pool::ProbePool;

/// A URL whose response status was in the StatusSet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    pub url: String,
    pub status: u16,
}

/// Counters for one worker, or summed over the whole pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs a request was issued for
    pub attempted: usize,
    /// URLs sent to the output channel
    pub matched: usize,
    /// URLs that failed at the transport layer
    pub failed: usize,
    /// Workers that panicked instead of returning
    pub crashed_workers: usize,
}

impl RunSummary {
    fn absorb(&mut self, other: RunSummary) {
        self.attempted += other.attempted;
        self.matched += other.matched;
        self.failed += other.failed;
        self.crashed_workers += other.crashed_workers;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} probed, {} matched, {} failed",
            self.attempted, self.matched, self.failed
        )?;
        if self.crashed_workers > 0 {
            write!(f, ", {} worker(s) crashed", self.crashed_workers)?;
        }
        Ok(())
    }
}
