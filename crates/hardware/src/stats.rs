//! Simulation statistics collection and reporting.
//!
//! Ambient per-run counters, separate from the architectural state the
//! display prints every cycle (`clock`, `retired`, `halted` live on the CPU
//! record and are what `initialize` resets). Tracks:
//! 1. **Prediction:** BTB/CTP lookups and hits, RAP hits/misses.
//! 2. **Speculation cost:** mispredictions and pipeline flushes.
//! 3. **Stalls:** fetch, rename (free-list) and dispatch stall cycles.

use std::fmt::Write as _;

/// Counters accumulated across a run.
#[derive(Clone, Debug, Default)]
pub struct SimStats {
    /// BTB lookups performed at fetch.
    pub btb_lookups: u64,
    /// BTB lookups that found a matching entry.
    pub btb_hits: u64,
    /// CTP lookups performed at fetch.
    pub ctp_lookups: u64,
    /// CTP lookups that found a matching entry.
    pub ctp_hits: u64,
    /// Returns predicted from a non-empty RAP.
    pub rap_hits: u64,
    /// Returns fetched with an empty RAP.
    pub rap_misses: u64,
    /// Branch-category instructions that resolved against their prediction.
    pub mispredictions: u64,
    /// Pipeline flushes (recoveries plus JUMP redirects).
    pub pipeline_flushes: u64,
    /// Cycles the fetch stage was blocked.
    pub fetch_stalls: u64,
    /// Cycles rename stalled on an empty free list.
    pub rename_stalls: u64,
    /// Cycles dispatch stalled on a full ROB/LSQ/BIS/RS.
    pub dispatch_stalls: u64,
}

impl SimStats {
    /// Renders the end-of-run summary.
    pub fn summary(&self, cycles: u64, retired: u64) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "---- simulation summary ----");
        let _ = writeln!(out, "cycles:            {cycles}");
        let _ = writeln!(out, "retired:           {retired}");
        let _ = writeln!(
            out,
            "btb:               {}/{} hits",
            self.btb_hits, self.btb_lookups
        );
        let _ = writeln!(
            out,
            "ctp:               {}/{} hits",
            self.ctp_hits, self.ctp_lookups
        );
        let _ = writeln!(
            out,
            "rap:               {} hits, {} misses",
            self.rap_hits, self.rap_misses
        );
        let _ = writeln!(out, "mispredictions:    {}", self.mispredictions);
        let _ = writeln!(out, "pipeline flushes:  {}", self.pipeline_flushes);
        let _ = writeln!(
            out,
            "stall cycles:      fetch {} / rename {} / dispatch {}",
            self.fetch_stalls, self.rename_stalls, self.dispatch_stalls
        );
        out
    }
}
