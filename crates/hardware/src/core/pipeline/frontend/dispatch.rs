//! Rename2/Dispatch stage.
//!
//! Moves at most one instruction per cycle from the dispatch latch into the
//! backend. The instruction claims a ROB slot (and an LSQ slot for memory
//! ops, a BIS slot for branch-category ops), captures its source operands
//! through the RAT, publishes its own destination mapping, and lands in a
//! reservation station stamped with a global dispatch sequence number. Any
//! missing resource leaves the latch occupied, stalling the front end.
//!
//! Ordering inside the stage matters: displaced mappings are recorded and
//! sources are captured *before* the RAT is updated (so an instruction
//! reading its own destination register sees the previous producer), and a
//! branch's snapshot is taken *after* (so recovery preserves the branch's
//! own rename).

use crate::core::Cpu;
use crate::core::pipeline::bis::BranchSnapshot;
use crate::core::pipeline::rob::{RobEntry, RobState};
use crate::core::pipeline::rs::RsEntry;
use crate::isa::{Instruction, Opcode};

/// Executes the Rename2/Dispatch stage.
pub fn dispatch_stage(cpu: &mut Cpu) {
    let Some(opcode) = cpu.dispatch_latch.as_ref().map(|i| i.opcode) else {
        return;
    };

    if cpu.rob.is_full()
        || (opcode.is_memory() && cpu.lsq.is_full())
        || (opcode.is_branch() && cpu.bis.is_full())
    {
        cpu.stats.dispatch_stalls += 1;
        cpu.stalled_this_cycle = true;
        return;
    }
    let station_free = if opcode == Opcode::Mul {
        cpu.mul_rs.has_free_slot()
    } else {
        cpu.int_rs.has_free_slot()
    };
    if !station_free {
        cpu.stats.dispatch_stalls += 1;
        cpu.stalled_this_cycle = true;
        return;
    }

    let Some(mut instr) = cpu.dispatch_latch.take() else {
        return;
    };
    let rob_index = cpu.rob.tail_index();

    // Displaced mappings, recorded before the RAT moves on.
    let old_phys_rd = instr.rd.and_then(|rd| cpu.rat.gpr(rd));
    let writes_cc = instr.phys_cc.is_some();
    let old_phys_cc = if writes_cc { cpu.rat.cc } else { None };

    capture_source(cpu, &mut instr, Operand::Rs1);
    capture_source(cpu, &mut instr, Operand::Rs2);

    // Branch-category ops read the current flags mapping; capture the value
    // immediately when the producing register has already written back.
    if instr.opcode.is_branch()
        && let Some(cc) = cpu.rat.cc
    {
        instr.phys_src_cc = Some(cc);
        let reg = cpu.cprf.get(cc.0);
        if reg.valid {
            instr.flags_value = reg.value as u8;
            instr.flags_ready = true;
        }
    }

    // Publish this instruction's own mappings.
    if let (Some(rd), Some(tag)) = (instr.rd, instr.phys_rd) {
        cpu.rat.set_gpr(rd, tag);
    }
    if let Some(cc) = instr.phys_cc {
        cpu.rat.cc = Some(cc);
    }

    if instr.opcode.is_branch() {
        instr.bis_index = cpu.bis.push(BranchSnapshot {
            branch_pc: instr.pc,
            rob_slot: rob_index,
            rat: cpu.rat.clone(),
            free_gpr: cpu.free_gpr.clone(),
            free_cc: cpu.free_cc.clone(),
        });
    }

    if instr.opcode.is_memory() {
        instr.lsq_index = cpu
            .lsq
            .allocate(rob_index, instr.opcode == Opcode::Store);
    }

    cpu.dispatch_seq += 1;
    let entry = RsEntry {
        rob_index,
        dispatch_time: cpu.dispatch_seq,
    };
    if instr.opcode == Opcode::Mul {
        let _ = cpu.mul_rs.insert(entry);
    } else {
        let _ = cpu.int_rs.insert(entry);
    }

    tracing::trace!(pc = instr.pc, op = %instr.opcode, rob = rob_index, "dispatch");

    let rob_entry = RobEntry {
        arch_rd: instr.rd,
        phys_rd: instr.phys_rd,
        old_phys_rd,
        writes_cc,
        phys_cc: instr.phys_cc,
        old_phys_cc,
        is_branch: instr.opcode.is_branch(),
        bis_index: instr.bis_index,
        lsq_index: instr.lsq_index,
        state: RobState::Executing,
        instr,
    };
    let _ = cpu.rob.allocate(rob_entry);
}

/// Which source operand to capture.
#[derive(Clone, Copy)]
enum Operand {
    Rs1,
    Rs2,
}

/// Captures one source operand through the RAT.
///
/// An unused operand is trivially ready. A register with no live mapping
/// reads its committed value from the ARF. A renamed register records the
/// producer tag and copies the physical register's `{value, valid}` pair,
/// mirroring `valid` into the ready bit so already-computed values are
/// captured the same cycle.
fn capture_source(cpu: &Cpu, instr: &mut Instruction, which: Operand) {
    let arch = match which {
        Operand::Rs1 => instr.rs1,
        Operand::Rs2 => instr.rs2,
    };
    let (value, ready, tag) = match arch {
        None => (0, true, None),
        Some(reg) => match cpu.rat.gpr(reg) {
            None => (cpu.arf.read(reg), true, None),
            Some(tag) => {
                let phys = cpu.prf.get(tag.0);
                (phys.value, phys.valid, Some(tag))
            }
        },
    };
    match which {
        Operand::Rs1 => {
            instr.rs1_value = value;
            instr.rs1_ready = ready;
            instr.phys_rs1 = tag;
        }
        Operand::Rs2 => {
            instr.rs2_value = value;
            instr.rs2_ready = ready;
            instr.phys_rs2 = tag;
        }
    }
}
