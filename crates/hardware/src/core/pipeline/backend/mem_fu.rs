//! Memory access unit (2-stage pipeline).
//!
//! Input is selected from the LSQ head, and only when that instruction is
//! also the ROB head — the gate that keeps memory accesses in program
//! order. The output stage performs the data memory read or write, forwards
//! load results, completes the ROB entry, and releases the LSQ head.

use crate::core::Cpu;
use crate::core::pipeline::forward::ForwardTag;
use crate::core::pipeline::rob::RobState;
use crate::isa::Opcode;

/// Advances the memory unit and selects its next access.
pub fn memory_stage(cpu: &mut Cpu) {
    cpu.mau_pipeline[1] = cpu.mau_pipeline[0];
    cpu.mau_pipeline[0] = None;

    if let Some(rob_index) = cpu.mau_pipeline[1] {
        complete_access(cpu, rob_index);
        cpu.mau_pipeline[1] = None;
    }

    // Refill stage 1 from the LSQ head once it is the ROB head and its
    // address (and, for stores, data) is available.
    if cpu.mau_pipeline[0].is_none()
        && let Some(head) = cpu.lsq.head()
        && head.access_ready()
        && !cpu.rob.is_empty()
        && head.rob_index == cpu.rob.head_index()
    {
        cpu.mau_pipeline[0] = Some(head.rob_index);
    }
}

/// Performs the memory access for the instruction leaving the unit.
fn complete_access(cpu: &mut Cpu, rob_index: usize) {
    let Some((opcode, phys_rd)) = cpu
        .rob
        .entry(rob_index)
        .map(|e| (e.instr.opcode, e.instr.phys_rd))
    else {
        return;
    };
    let Some(access) = cpu.lsq.head().copied() else {
        return;
    };

    if opcode == Opcode::Load {
        let value = cpu.read_data(access.mem_address);
        if let Some(tag) = phys_rd {
            cpu.forwarding.push(ForwardTag::Gpr(tag), value);
        }
        tracing::trace!(addr = access.mem_address, value, "load");
    } else {
        cpu.write_data(access.mem_address, access.store_data);
        tracing::trace!(addr = access.mem_address, value = access.store_data, "store");
    }

    if let Some(entry) = cpu.rob.entry_mut(rob_index) {
        entry.state = RobState::Completed;
    }
    cpu.lsq.release_head();
}
