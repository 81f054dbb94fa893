//! Misprediction recovery.
//!
//! Total cancellation of everything younger than a mispredicted branch B:
//! restore the RAT and both free lists bitwise from B's snapshot, truncate
//! the ROB so B becomes the youngest entry, reclaim younger BIS snapshots,
//! discard the front-end latches and pending broadcasts, squash every
//! backend slot holding a now-dead ROB index, and redirect the PC to the
//! resolved path. After this runs, no structure contains an instruction
//! younger than B.

use crate::common::constants::{MAU_STAGES, MUL_STAGES, PC_STRIDE, ROB_SIZE};
use crate::core::Cpu;
use crate::isa::Instruction;

/// Recovers from branch `instr` mispredicting. The instruction must carry a
/// BIS index (branch-category ops always do).
pub fn recover(cpu: &mut Cpu, instr: &Instruction) {
    let Some(bis_index) = instr.bis_index else {
        return;
    };
    let Some(snapshot) = cpu.bis.get(bis_index).cloned() else {
        return;
    };

    cpu.flushed_this_cycle = true;
    cpu.stats.mispredictions += 1;
    cpu.stats.pipeline_flushes += 1;

    cpu.rat = snapshot.rat;
    cpu.free_gpr = snapshot.free_gpr;
    cpu.free_cc = snapshot.free_cc;
    cpu.rob.rollback((snapshot.rob_slot + 1) % ROB_SIZE);
    cpu.bis.rollback(bis_index);

    cpu.fetch1_latch = None;
    cpu.fetch2_latch = None;
    cpu.dispatch_latch = None;
    cpu.forwarding.clear();
    // A squashed younger JUMP must not leave the front end wedged.
    cpu.fetch_stalled = false;

    squash_dead(cpu);

    cpu.pc = if instr.opcode.is_conditional() {
        if instr.predicted_taken {
            instr.pc.wrapping_add(PC_STRIDE)
        } else {
            instr.pc.wrapping_add(instr.imm)
        }
    } else {
        // JAL/JALP/RET: the target computed in execute.
        instr.memory_address
    };

    tracing::debug!(
        branch_pc = instr.pc,
        op = %instr.opcode,
        redirect = cpu.pc,
        "misprediction recovery"
    );
}

/// Clears every backend slot whose ROB index fell out of the live range.
fn squash_dead(cpu: &mut Cpu) {
    let rob = &cpu.rob;
    cpu.int_rs.squash(|index| !rob.contains(index));
    cpu.mul_rs.squash(|index| !rob.contains(index));
    cpu.lsq.squash_tail(|index| !rob.contains(index));

    if cpu.int_fu_latch.is_some_and(|i| !cpu.rob.contains(i)) {
        cpu.int_fu_latch = None;
    }
    if cpu.mul_fu_latch.is_some_and(|i| !cpu.rob.contains(i)) {
        cpu.mul_fu_latch = None;
    }
    for stage in 0..MUL_STAGES {
        if cpu.mul_pipeline[stage].is_some_and(|i| !cpu.rob.contains(i)) {
            cpu.mul_pipeline[stage] = None;
        }
    }
    for stage in 0..MAU_STAGES {
        if cpu.mau_pipeline[stage].is_some_and(|i| !cpu.rob.contains(i)) {
            cpu.mau_pipeline[stage] = None;
        }
    }
}
