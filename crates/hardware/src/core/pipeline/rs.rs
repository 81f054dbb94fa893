//! Reservation stations.
//!
//! A reservation station is a small unordered buffer of dispatched
//! instructions waiting for their operands. Entries carry only the ROB index
//! (the ROB owns the instruction record) and a dispatch timestamp; issue
//! selects the ready entry with the smallest timestamp, giving oldest-first
//! priority without keeping the buffer sorted.

/// One reservation station slot.
#[derive(Clone, Copy, Debug)]
pub struct RsEntry {
    /// ROB slot of the waiting instruction.
    pub rob_index: usize,
    /// Global dispatch sequence number; smaller is older.
    pub dispatch_time: u64,
}

/// A fixed-capacity reservation station.
#[derive(Debug)]
pub struct ReservationStation {
    slots: Vec<Option<RsEntry>>,
}

impl ReservationStation {
    /// Creates a station with `capacity` slots.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of busy slots.
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when dispatch can place an entry here.
    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Inserts into the first free slot. Returns false when full.
    pub fn insert(&mut self, entry: RsEntry) -> bool {
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(entry);
                return true;
            }
        }
        false
    }

    /// Borrows the entry in `slot`, if busy.
    pub fn get(&self, slot: usize) -> Option<RsEntry> {
        self.slots.get(slot).copied().flatten()
    }

    /// Removes and returns the entry in `slot`.
    pub fn take(&mut self, slot: usize) -> Option<RsEntry> {
        self.slots.get_mut(slot)?.take()
    }

    /// Clears every slot whose instruction satisfies `dead(rob_index)`.
    pub fn squash(&mut self, mut dead: impl FnMut(usize) -> bool) {
        for slot in &mut self.slots {
            if let Some(entry) = *slot
                && dead(entry.rob_index)
            {
                *slot = None;
            }
        }
    }
}
