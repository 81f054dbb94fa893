//! Call Target Predictor (CTP).
//!
//! A 4-entry LRU table mapping the PC of a direct call (JAL) to its last
//! resolved target, letting fetch redirect to the callee before the call
//! decodes.

use crate::common::constants::CTP_SIZE;

#[derive(Clone, Copy, Debug)]
struct CtpEntry {
    tag_pc: i32,
    target: i32,
    lru_time: u64,
    valid: bool,
}

impl Default for CtpEntry {
    fn default() -> Self {
        Self {
            tag_pc: -1,
            target: 0,
            lru_time: 0,
            valid: false,
        }
    }
}

/// Call target predictor with LRU replacement.
#[derive(Debug, Default)]
pub struct Ctp {
    table: [CtpEntry; CTP_SIZE],
}

impl Ctp {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a call PC, refreshing its LRU stamp on a hit.
    pub fn lookup(&mut self, pc: i32, now: u64) -> Option<i32> {
        for entry in &mut self.table {
            if entry.valid && entry.tag_pc == pc {
                entry.lru_time = now;
                return Some(entry.target);
            }
        }
        None
    }

    /// Inserts or refreshes the entry for a resolved call.
    pub fn update(&mut self, pc: i32, target: i32, now: u64) {
        let mut empty = None;
        let mut lru = 0;
        let mut lru_time = u64::MAX;
        let mut slot = None;
        for (i, entry) in self.table.iter().enumerate() {
            if !entry.valid {
                if empty.is_none() {
                    empty = Some(i);
                }
            } else {
                if entry.tag_pc == pc {
                    slot = Some(i);
                    break;
                }
                if entry.lru_time < lru_time {
                    lru_time = entry.lru_time;
                    lru = i;
                }
            }
        }
        let slot = slot.or(empty).unwrap_or(lru);
        self.table[slot] = CtpEntry {
            tag_pc: pc,
            target,
            lru_time: now,
            valid: true,
        };
    }

    /// Iterates valid entries as `(pc, target)` for display.
    pub fn entries(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.table
            .iter()
            .filter(|e| e.valid)
            .map(|e| (e.tag_pc, e.target))
    }
}
