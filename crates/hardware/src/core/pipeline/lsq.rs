//! Load/Store Queue (LSQ).
//!
//! A circular FIFO that serializes memory operations in program order.
//! Entries are allocated at dispatch with neither address nor data; the
//! integer FU fills the address (and store data) at execute, and forwarded
//! values can supply store data earlier. Only the head may issue to the
//! memory unit, and only once its instruction is also the ROB head — that
//! gate is what makes memory commit in-order.

use crate::common::constants::LSQ_SIZE;

/// A single load/store queue entry.
#[derive(Clone, Copy, Debug)]
pub struct LsqEntry {
    /// ROB slot of the owning instruction.
    pub rob_index: usize,
    /// True for stores, false for loads.
    pub is_store: bool,
    /// Effective address once computed.
    pub mem_address: i32,
    /// The address has been computed.
    pub address_valid: bool,
    /// Value to store (stores only).
    pub store_data: i32,
    /// The store data has been captured.
    pub data_valid: bool,
}

impl LsqEntry {
    /// A fresh entry for the instruction in ROB slot `rob_index`.
    pub fn new(rob_index: usize, is_store: bool) -> Self {
        Self {
            rob_index,
            is_store,
            mem_address: 0,
            address_valid: false,
            store_data: 0,
            data_valid: false,
        }
    }

    /// True when the memory unit may pick this entry up.
    pub fn access_ready(&self) -> bool {
        if self.is_store {
            self.address_valid && self.data_valid
        } else {
            self.address_valid
        }
    }
}

/// Load/Store Queue — circular FIFO over [`LSQ_SIZE`] slots.
#[derive(Debug)]
pub struct LoadStoreQueue {
    slots: Vec<Option<LsqEntry>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Default for LoadStoreQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadStoreQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(LSQ_SIZE);
        slots.resize_with(LSQ_SIZE, || None);
        Self {
            slots,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no memory operations are queued.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when a memory op cannot be dispatched.
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Allocates the tail slot. Returns the slot index, or `None` when full.
    pub fn allocate(&mut self, rob_index: usize, is_store: bool) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.tail;
        self.slots[index] = Some(LsqEntry::new(rob_index, is_store));
        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        Some(index)
    }

    /// Borrows the head entry, if any.
    pub fn head(&self) -> Option<&LsqEntry> {
        if self.count == 0 {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Releases the head slot after the memory unit completes its access.
    pub fn release_head(&mut self) {
        if self.count == 0 {
            return;
        }
        self.slots[self.head] = None;
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
    }

    /// Borrows the entry in `slot`, if occupied.
    pub fn get(&self, slot: usize) -> Option<&LsqEntry> {
        self.slots.get(slot)?.as_ref()
    }

    /// Mutably borrows the entry in `slot`, if occupied.
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut LsqEntry> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Iterates occupied slot indices from head to tail in program order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |i| (self.head + i) % self.slots.len())
    }

    /// Pops squashed entries from the tail while `dead(rob_index)` holds.
    ///
    /// Misprediction recovery kills the youngest contiguous suffix of the
    /// queue (the LSQ is in program order, so squashed memory ops are always
    /// last); popping from the tail keeps head/tail/count coherent.
    pub fn squash_tail(&mut self, mut dead: impl FnMut(usize) -> bool) {
        while self.count > 0 {
            let last = (self.tail + self.slots.len() - 1) % self.slots.len();
            let Some(entry) = self.slots[last] else { break };
            if !dead(entry.rob_index) {
                break;
            }
            self.slots[last] = None;
            self.tail = last;
            self.count -= 1;
        }
    }
}
