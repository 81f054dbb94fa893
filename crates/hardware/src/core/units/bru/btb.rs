//! Branch Target Buffer (BTB).
//!
//! A small fully-associative table keyed by branch PC with LRU replacement.
//! Each entry carries the last resolved target and a 2-bit saturating taken
//! history; fetch predicts taken only when the history has reached the
//! threshold. Trained at branch resolution with the actual outcome.

use crate::common::constants::{BTB_HISTORY_MAX, BTB_SIZE, BTB_TAKEN_THRESHOLD};

/// An entry in the branch target buffer.
#[derive(Clone, Copy, Debug)]
struct BtbEntry {
    tag_pc: i32,
    target: i32,
    history: u8,
    lru_time: u64,
    valid: bool,
}

impl Default for BtbEntry {
    fn default() -> Self {
        Self {
            tag_pc: -1,
            target: 0,
            history: 0,
            lru_time: 0,
            valid: false,
        }
    }
}

/// What a BTB lookup reported for a branch PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BtbPrediction {
    /// Recorded target address.
    pub target: i32,
    /// 2-bit saturating history at lookup time.
    pub history: u8,
}

impl BtbPrediction {
    /// True when the history has reached the predict-taken threshold.
    pub fn taken(&self) -> bool {
        self.history >= BTB_TAKEN_THRESHOLD
    }
}

/// Branch target buffer with LRU replacement.
#[derive(Debug, Default)]
pub struct Btb {
    table: [BtbEntry; BTB_SIZE],
}

impl Btb {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `pc`, refreshing the entry's LRU stamp on a hit.
    pub fn lookup(&mut self, pc: i32, now: u64) -> Option<BtbPrediction> {
        for entry in &mut self.table {
            if entry.valid && entry.tag_pc == pc {
                entry.lru_time = now;
                return Some(BtbPrediction {
                    target: entry.target,
                    history: entry.history,
                });
            }
        }
        None
    }

    /// Trains the table at branch resolution with the actual target and
    /// outcome. Matching entries saturate their history up (taken) or down
    /// (not taken); a replacement victim restarts its history from zero.
    pub fn update(&mut self, pc: i32, target: i32, taken: bool, now: u64) {
        let slot = self.victim(pc);
        let entry = &mut self.table[slot];
        if !entry.valid || entry.tag_pc != pc {
            entry.history = 0;
        }
        entry.valid = true;
        entry.tag_pc = pc;
        entry.target = target;
        entry.lru_time = now;
        if taken {
            entry.history = (entry.history + 1).min(BTB_HISTORY_MAX);
        } else {
            entry.history = entry.history.saturating_sub(1);
        }
    }

    /// Picks the slot to write: an existing match, then an empty slot, then
    /// the least recently used entry.
    fn victim(&self, pc: i32) -> usize {
        let mut empty = None;
        let mut lru = 0;
        let mut lru_time = u64::MAX;
        for (i, entry) in self.table.iter().enumerate() {
            if !entry.valid {
                if empty.is_none() {
                    empty = Some(i);
                }
            } else {
                if entry.tag_pc == pc {
                    return i;
                }
                if entry.lru_time < lru_time {
                    lru_time = entry.lru_time;
                    lru = i;
                }
            }
        }
        empty.unwrap_or(lru)
    }

    /// Iterates valid entries as `(pc, target, history)` for display.
    pub fn entries(&self) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.table
            .iter()
            .filter(|e| e.valid)
            .map(|e| (e.tag_pc, e.target, e.history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_empty_returns_none() {
        let mut btb = Btb::new();
        assert_eq!(btb.lookup(4008, 1), None);
    }

    #[test]
    fn training_to_taken_crosses_threshold() {
        let mut btb = Btb::new();
        btb.update(4008, 4004, true, 1);
        let p = btb.lookup(4008, 2).unwrap();
        assert_eq!(p.history, 1);
        assert!(!p.taken(), "one taken resolution is not enough");

        btb.update(4008, 4004, true, 3);
        let p = btb.lookup(4008, 4).unwrap();
        assert_eq!(p.history, 2);
        assert!(p.taken());
        assert_eq!(p.target, 4004);
    }

    #[test]
    fn history_saturates_both_ways() {
        let mut btb = Btb::new();
        for t in 0..6 {
            btb.update(4008, 4004, true, t);
        }
        assert_eq!(btb.lookup(4008, 10).unwrap().history, BTB_HISTORY_MAX);

        for t in 10..20 {
            btb.update(4008, 4004, false, t);
        }
        assert_eq!(btb.lookup(4008, 30).unwrap().history, 0);
    }

    #[test]
    fn lru_eviction_picks_coldest_entry() {
        let mut btb = Btb::new();
        for i in 0..BTB_SIZE {
            btb.update(4000 + 4 * i as i32, 5000, true, i as u64);
        }
        // Touch the oldest entry so the second-oldest becomes the victim.
        let _ = btb.lookup(4000, 100);
        btb.update(9000, 9004, true, 101);

        assert!(btb.lookup(4000, 102).is_some(), "refreshed entry survives");
        assert_eq!(btb.lookup(4004, 103), None, "coldest entry evicted");
        assert!(btb.lookup(9000, 104).is_some());
    }

    #[test]
    fn replacement_resets_history() {
        let mut btb = Btb::new();
        for i in 0..BTB_SIZE {
            for t in 0..4 {
                btb.update(4000 + 4 * i as i32, 5000, true, (i as u64) * 10 + t);
            }
        }
        btb.update(9000, 9004, true, 1000);
        assert_eq!(
            btb.lookup(9000, 1001).unwrap().history,
            1,
            "victim's saturated history must not leak into the new branch"
        );
    }
}
