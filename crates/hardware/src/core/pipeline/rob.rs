//! Reorder Buffer (ROB) for in-order retirement.
//!
//! The ROB is a circular buffer that tracks in-flight instructions from
//! dispatch through commit. It provides:
//! 1. **Allocation:** Claims the tail slot for each dispatched instruction.
//! 2. **Ownership:** The entry owns the instruction record; reservation
//!    stations, the LSQ and the execute latches refer to it by ROB index,
//!    so "is this slot still live" is a single range check.
//! 3. **Completion:** Entries move `Executing` → `Completed` when their
//!    producer forwards.
//! 4. **In-order Commit:** The head retires in program order.
//! 5. **Rollback:** Misprediction recovery truncates the tail back to one
//!    past the offending branch.

use crate::common::constants::ROB_SIZE;
use crate::common::{CcTag, PhysTag};
use crate::isa::Instruction;

/// Lifecycle state of a ROB entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RobState {
    /// Allocated; result not yet produced.
    #[default]
    Executing,
    /// Result produced; eligible to retire at the head.
    Completed,
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Debug)]
pub struct RobEntry {
    /// The instruction record owned by this entry.
    pub instr: Instruction,
    /// Current lifecycle state.
    pub state: RobState,
    /// Architectural destination, if any.
    pub arch_rd: Option<usize>,
    /// Physical destination allocated at rename.
    pub phys_rd: Option<PhysTag>,
    /// Mapping displaced from the RAT; freed when this entry retires.
    pub old_phys_rd: Option<PhysTag>,
    /// This instruction writes the condition-code register.
    pub writes_cc: bool,
    /// Physical CC register allocated at rename.
    pub phys_cc: Option<CcTag>,
    /// Displaced CC mapping; freed when this entry retires.
    pub old_phys_cc: Option<CcTag>,
    /// Branch-category instruction (owns a BIS snapshot).
    pub is_branch: bool,
    /// BIS slot, for branch-category instructions.
    pub bis_index: Option<usize>,
    /// LSQ slot, for memory instructions.
    pub lsq_index: Option<usize>,
}

/// Reorder Buffer — circular buffer for in-order commit.
#[derive(Debug)]
pub struct ReorderBuffer {
    slots: Vec<Option<RobEntry>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Default for ReorderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReorderBuffer {
    /// Creates an empty ROB of [`ROB_SIZE`] slots.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(ROB_SIZE);
        slots.resize_with(ROB_SIZE, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Number of occupied entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no entries are in flight.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when dispatch must stall.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Index of the oldest entry (the commit point).
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Index the next allocation will occupy.
    pub fn tail_index(&self) -> usize {
        self.tail
    }

    /// Claims the tail slot for `entry`. Returns the slot index, or `None`
    /// when the buffer is full.
    pub fn allocate(&mut self, entry: RobEntry) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.tail;
        self.slots[index] = Some(entry);
        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        Some(index)
    }

    /// Borrows the entry at `index`, if live.
    pub fn entry(&self, index: usize) -> Option<&RobEntry> {
        self.slots.get(index)?.as_ref()
    }

    /// Mutably borrows the entry at `index`, if live.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut RobEntry> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Borrows the head entry.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Pops and returns the head entry. The caller (the commit stage)
    /// decides whether the head is eligible before retiring it.
    pub fn retire_head(&mut self) -> Option<RobEntry> {
        if self.count == 0 {
            return None;
        }
        let entry = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        entry
    }

    /// Marks the entry at `index` completed.
    pub fn mark_completed(&mut self, index: usize) {
        if let Some(entry) = self.entry_mut(index) {
            entry.state = RobState::Completed;
        }
    }

    /// True when `index` lies in the live range `[head, tail)` modulo the
    /// buffer size. Anything outside this range was squashed or retired.
    pub fn contains(&self, index: usize) -> bool {
        if self.count == 0 || index >= self.slots.len() {
            return false;
        }
        if self.count == self.slots.len() {
            return true;
        }
        if self.head < self.tail {
            index >= self.head && index < self.tail
        } else {
            index >= self.head || index < self.tail
        }
    }

    /// Truncates the buffer so `new_tail` becomes the allocation point,
    /// dropping every entry at or after it. Used by misprediction recovery
    /// with `new_tail` one past the recovering branch, so at least one entry
    /// always survives: a recomputed distance of zero means the buffer is
    /// full, not empty.
    pub fn rollback(&mut self, new_tail: usize) {
        self.tail = new_tail % self.slots.len();
        let distance = (self.tail + self.slots.len() - self.head) % self.slots.len();
        self.count = if distance == 0 {
            self.slots.len()
        } else {
            distance
        };
        for index in 0..self.slots.len() {
            if !self.contains(index) {
                self.slots[index] = None;
            }
        }
    }

    /// Drops every entry (HALT commit).
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Iterates live indices from head to tail in program order.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |i| (self.head + i) % self.slots.len())
    }
}
