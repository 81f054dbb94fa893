//! Branch Information Stack (BIS).
//!
//! A circular FIFO of per-branch recovery snapshots, allocated at dispatch
//! of every branch-category instruction and retired in ROB commit order.
//! Each snapshot is a complete copy of the rename state at the moment the
//! branch itself had been renamed: the RAT (GPR and CC mappings), both free
//! lists, and the ROB slot the branch occupies. Misprediction recovery
//! restores a snapshot bitwise and truncates the stack back to the
//! recovering branch, reclaiming the snapshots of every squashed younger
//! branch.

use crate::common::constants::BIS_SIZE;
use crate::core::arch::{FreeList, RenameTable};

/// One branch snapshot.
#[derive(Clone, Debug)]
pub struct BranchSnapshot {
    /// PC of the branch that owns the snapshot.
    pub branch_pc: i32,
    /// ROB slot of the branch itself; recovery sets the tail one past it.
    pub rob_slot: usize,
    /// Rename table copy (GPR and CC mappings).
    pub rat: RenameTable,
    /// GPR free list copy.
    pub free_gpr: FreeList,
    /// CC free list copy.
    pub free_cc: FreeList,
}

/// Branch Information Stack — circular FIFO of snapshots.
#[derive(Debug)]
pub struct BranchStack {
    slots: Vec<Option<BranchSnapshot>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Default for BranchStack {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchStack {
    /// Creates an empty stack of [`BIS_SIZE`] slots.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(BIS_SIZE);
        slots.resize_with(BIS_SIZE, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Number of in-flight snapshots.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no branches are in flight.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when a branch cannot be dispatched.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Pushes a snapshot at the tail. Returns its slot index, or `None`
    /// when the stack is full.
    pub fn push(&mut self, snapshot: BranchSnapshot) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.tail;
        self.slots[index] = Some(snapshot);
        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        Some(index)
    }

    /// Borrows the snapshot in `slot`.
    pub fn get(&self, slot: usize) -> Option<&BranchSnapshot> {
        self.slots.get(slot)?.as_ref()
    }

    /// Releases the oldest snapshot when its branch commits.
    pub fn retire_head(&mut self) {
        if self.count == 0 {
            return;
        }
        self.slots[self.head] = None;
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
    }

    /// Truncates the stack so `slot` becomes the youngest live snapshot,
    /// dropping every snapshot pushed after it. The recovering branch's own
    /// snapshot survives, so a tail that wraps onto the head means full.
    pub fn rollback(&mut self, slot: usize) {
        let new_tail = (slot + 1) % self.slots.len();
        self.tail = new_tail;
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

    fn contains(&self, index: usize) -> bool {
        if self.count == 0 {
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
}
