//! Per-cycle forwarding bus.
//!
//! Writebacks from the functional units push `{tag, value}` broadcasts into
//! a small fixed-capacity buffer during a cycle; at the top of the next
//! cycle the buffer is drained, making the values architecturally visible:
//! 1. The physical register file slot is written and marked valid.
//! 2. Reservation station entries waiting on the tag capture the value.
//! 3. Stores in the LSQ waiting on the data register capture it.
//! 4. Matching still-executing ROB entries are marked completed (this is
//!    the completion path for CC-only writers such as CMP).
//!
//! The buffer is a fixed array — no allocation on the writeback path.

use crate::common::constants::FORWARD_BUS_SLOTS;
use crate::common::{CcTag, PhysTag};
use crate::core::Cpu;

/// Destination of one forwarded value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardTag {
    /// A physical general-purpose register.
    Gpr(PhysTag),
    /// A physical condition-code register.
    Cc(CcTag),
}

/// One broadcast on the bus.
#[derive(Clone, Copy, Debug)]
pub struct Forward {
    /// Which physical register the value is for.
    pub tag: ForwardTag,
    /// The produced value (a flags word for CC tags).
    pub value: i32,
}

/// The bounded per-cycle broadcast buffer.
#[derive(Debug)]
pub struct ForwardingBus {
    slots: [Option<Forward>; FORWARD_BUS_SLOTS],
    len: usize,
}

impl Default for ForwardingBus {
    fn default() -> Self {
        Self {
            slots: [None; FORWARD_BUS_SLOTS],
            len: 0,
        }
    }
}

impl ForwardingBus {
    /// Queues a broadcast. The bus is sized for the worst-case writeback
    /// traffic of one cycle, so a full bus drops the entry silently only if
    /// a unit misbehaves.
    pub fn push(&mut self, tag: ForwardTag, value: i32) {
        debug_assert!(self.len < FORWARD_BUS_SLOTS, "forwarding bus overflow");
        if self.len < FORWARD_BUS_SLOTS {
            self.slots[self.len] = Some(Forward { tag, value });
            self.len += 1;
        }
    }

    /// Number of queued broadcasts.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops all queued broadcasts (misprediction recovery).
    pub fn clear(&mut self) {
        self.slots = [None; FORWARD_BUS_SLOTS];
        self.len = 0;
    }

    /// Takes the queued broadcasts, leaving the bus empty.
    fn take(&mut self) -> [Option<Forward>; FORWARD_BUS_SLOTS] {
        let out = self.slots;
        self.clear();
        out
    }
}

/// Applies and drains last cycle's broadcasts. Runs first in every cycle,
/// so forwarded values become visible exactly one cycle after writeback.
pub fn apply(cpu: &mut Cpu) {
    let broadcasts = cpu.forwarding.take();
    for forward in broadcasts.into_iter().flatten() {
        match forward.tag {
            ForwardTag::Gpr(tag) => {
                cpu.prf.write_back(tag.0, forward.value);
                wake_operands(cpu, tag, forward.value);
                supply_store_data(cpu, tag, forward.value);
            }
            ForwardTag::Cc(tag) => {
                cpu.cprf.write_back(tag.0, forward.value);
                wake_flags(cpu, tag, forward.value as u8);
            }
        }
        complete_rob_entries(cpu, forward.tag);
    }
}

/// Wakes reservation-station operands waiting on a GPR tag.
fn wake_operands(cpu: &mut Cpu, tag: PhysTag, value: i32) {
    let int_slots = cpu.int_rs.capacity();
    let mul_slots = cpu.mul_rs.capacity();
    for slot in 0..int_slots + mul_slots {
        let entry = if slot < int_slots {
            cpu.int_rs.get(slot)
        } else {
            cpu.mul_rs.get(slot - int_slots)
        };
        let Some(entry) = entry else { continue };
        let Some(instr) = cpu.rob.entry_mut(entry.rob_index).map(|e| &mut e.instr) else {
            continue;
        };
        if !instr.rs1_ready && instr.phys_rs1 == Some(tag) {
            instr.rs1_value = value;
            instr.rs1_ready = true;
        }
        if !instr.rs2_ready && instr.phys_rs2 == Some(tag) {
            instr.rs2_value = value;
            instr.rs2_ready = true;
        }
    }
}

/// Wakes integer-station flag consumers waiting on a CC tag.
fn wake_flags(cpu: &mut Cpu, tag: CcTag, flags: u8) {
    for slot in 0..cpu.int_rs.capacity() {
        let Some(entry) = cpu.int_rs.get(slot) else {
            continue;
        };
        let Some(instr) = cpu.rob.entry_mut(entry.rob_index).map(|e| &mut e.instr) else {
            continue;
        };
        if !instr.flags_ready && instr.phys_src_cc == Some(tag) {
            instr.flags_value = flags;
            instr.flags_ready = true;
        }
    }
}

/// Supplies data to stores in the LSQ whose data register matches `tag`.
fn supply_store_data(cpu: &mut Cpu, tag: PhysTag, value: i32) {
    for slot in 0..crate::common::constants::LSQ_SIZE {
        let Some(entry) = cpu.lsq.get(slot) else { continue };
        if !entry.is_store || entry.data_valid {
            continue;
        }
        let rob_index = entry.rob_index;
        let matches = cpu
            .rob
            .entry(rob_index)
            .is_some_and(|e| e.instr.phys_rs1 == Some(tag));
        if matches && let Some(entry) = cpu.lsq.get_mut(slot) {
            entry.store_data = value;
            entry.data_valid = true;
        }
    }
}

/// Marks still-executing ROB entries whose destination matches as completed.
fn complete_rob_entries(cpu: &mut Cpu, tag: ForwardTag) {
    for index in 0..crate::common::constants::ROB_SIZE {
        let Some(entry) = cpu.rob.entry_mut(index) else {
            continue;
        };
        if entry.state != super::rob::RobState::Executing {
            continue;
        }
        let matches = match tag {
            ForwardTag::Gpr(t) => entry.phys_rd == Some(t),
            ForwardTag::Cc(t) => entry.phys_cc == Some(t),
        };
        if matches {
            entry.state = super::rob::RobState::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_clear() {
        let mut bus = ForwardingBus::default();
        assert!(bus.is_empty());
        bus.push(ForwardTag::Gpr(PhysTag(3)), 42);
        bus.push(ForwardTag::Cc(CcTag(1)), 2);
        assert_eq!(bus.len(), 2);
        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn take_drains_the_bus() {
        let mut bus = ForwardingBus::default();
        bus.push(ForwardTag::Gpr(PhysTag(0)), 7);
        let out = bus.take();
        assert!(bus.is_empty());
        assert_eq!(out.iter().flatten().count(), 1);
    }
}
