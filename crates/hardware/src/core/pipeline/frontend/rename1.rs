//! Decode/Rename1 stage: physical destination allocation.
//!
//! Claims a physical GPR for the destination (and a physical CC register
//! for flag-setting opcodes) from the free lists and moves the instruction
//! into the dispatch latch. Both free lists are checked before either is
//! dequeued, so a stall never leaks a register. On decoding a JUMP, the
//! stage blocks new fetches and discards the wrong-path instruction already
//! sitting in the Fetch1 latch; the block lifts when the JUMP resolves in
//! execute.

use crate::common::{CcTag, PhysTag};
use crate::core::Cpu;
use crate::isa::Opcode;

/// Executes the Decode/Rename1 stage.
pub fn rename_stage(cpu: &mut Cpu) {
    if cpu.fetch2_latch.is_none() || cpu.dispatch_latch.is_some() {
        return;
    }
    let Some(mut instr) = cpu.fetch2_latch.take() else {
        return;
    };

    if instr.opcode == Opcode::Jump {
        cpu.fetch_stalled = true;
        cpu.fetch1_latch = None;
    }

    let needs_gpr = instr.rd.is_some();
    let needs_cc = instr.opcode.writes_flags();
    if (needs_gpr && cpu.free_gpr.is_empty()) || (needs_cc && cpu.free_cc.is_empty()) {
        cpu.stats.rename_stalls += 1;
        cpu.fetch2_latch = Some(instr);
        return;
    }

    if needs_gpr && let Some(index) = cpu.free_gpr.pop() {
        instr.phys_rd = Some(PhysTag(index));
        cpu.prf.claim(index);
    }
    if needs_cc && let Some(index) = cpu.free_cc.pop() {
        instr.phys_cc = Some(CcTag(index));
        cpu.cprf.claim(index);
    }

    cpu.dispatch_latch = Some(instr);
}
