//! Integer functional unit (1 cycle).
//!
//! Everything except multiplies executes here: arithmetic and logic with
//! flag generation, effective-address generation for loads and stores
//! (results go to the LSQ entry, not the register file), and all control
//! flow. Branch-category instructions compare their resolved outcome
//! against the front end's prediction and trigger recovery on a mismatch;
//! JUMP redirects the PC directly since nothing younger was ever renamed
//! behind it.

use crate::common::constants::PC_STRIDE;
use crate::core::Cpu;
use crate::core::pipeline::backend::recovery;
use crate::core::pipeline::forward::ForwardTag;
use crate::core::pipeline::rob::RobState;
use crate::core::units::alu;
use crate::isa::Opcode;

/// Executes the integer FU for the instruction in its input latch.
pub fn integer_stage(cpu: &mut Cpu) {
    let Some(rob_index) = cpu.int_fu_latch.take() else {
        return;
    };
    let Some(mut instr) = cpu.rob.entry(rob_index).map(|e| e.instr.clone()) else {
        return;
    };

    let mut result = 0;
    let mut mispredicted = false;
    let mut actual_taken = false;

    match instr.opcode {
        Opcode::Add
        | Opcode::Addl
        | Opcode::Sub
        | Opcode::Subl
        | Opcode::Cmp
        | Opcode::Cml
        | Opcode::And
        | Opcode::Or
        | Opcode::Xor
        | Opcode::Movc => {
            result = alu::evaluate(instr.opcode, instr.rs1_value, instr.rs2_value, instr.imm);
        }
        Opcode::Load | Opcode::Store => {
            let base = if instr.opcode == Opcode::Load {
                instr.rs1_value
            } else {
                instr.rs2_value
            };
            instr.memory_address = base.wrapping_add(instr.imm);
            if let Some(slot) = instr.lsq_index
                && let Some(entry) = cpu.lsq.get_mut(slot)
            {
                entry.mem_address = instr.memory_address;
                entry.address_valid = true;
                if instr.opcode == Opcode::Store {
                    entry.store_data = instr.rs1_value;
                    entry.data_valid = true;
                }
            }
        }
        Opcode::Bz | Opcode::Bnz | Opcode::Bp | Opcode::Bn => {
            actual_taken = alu::branch_taken(instr.opcode, instr.flags_value);
            mispredicted = actual_taken != instr.predicted_taken;
            // Taken-path target; recorded for BTB training.
            instr.memory_address = instr.pc.wrapping_add(instr.imm);
        }
        Opcode::Jump => {
            cpu.pc = instr.rs1_value.wrapping_add(instr.imm);
            cpu.fetch1_latch = None;
            cpu.fetch2_latch = None;
            cpu.fetch_stalled = false;
            cpu.flushed_this_cycle = true;
            cpu.stats.pipeline_flushes += 1;
            tracing::debug!(pc = instr.pc, target = cpu.pc, "JUMP resolved");
        }
        Opcode::Jal | Opcode::Jalp => {
            result = instr.pc.wrapping_add(PC_STRIDE);
            instr.memory_address = if instr.opcode == Opcode::Jalp {
                instr.pc.wrapping_add(instr.imm)
            } else {
                instr.rs1_value.wrapping_add(instr.imm)
            };
            mispredicted = instr.memory_address != instr.predicted_target;
            if cpu.predictor_enabled {
                cpu.rap.push(result);
                if instr.opcode == Opcode::Jal {
                    cpu.ctp.update(instr.pc, instr.memory_address, cpu.clock);
                }
            }
        }
        Opcode::Ret => {
            instr.memory_address = instr.rs1_value;
            mispredicted = instr.memory_address != instr.predicted_target;
        }
        Opcode::Mul | Opcode::Nop | Opcode::Halt | Opcode::Invalid => {}
    }

    // Train the BTB with the resolved outcome, whichever way it went.
    if cpu.predictor_enabled && instr.opcode.is_conditional() {
        cpu.btb
            .update(instr.pc, instr.memory_address, actual_taken, cpu.clock);
    }

    if mispredicted && instr.bis_index.is_some() {
        recovery::recover(cpu, &instr);
    }

    // The branch's own results survive recovery: broadcasts are pushed
    // after the forwarding bus was cleared, and the entry itself is the
    // new ROB tail.
    if instr.opcode != Opcode::Load
        && let Some(tag) = instr.phys_rd
    {
        cpu.forwarding.push(ForwardTag::Gpr(tag), result);
    }
    if instr.opcode.writes_flags()
        && let Some(cc) = instr.phys_cc
    {
        cpu.forwarding
            .push(ForwardTag::Cc(cc), i32::from(alu::flags_for(result)));
    }

    if let Some(entry) = cpu.rob.entry_mut(rob_index) {
        entry.instr = instr.clone();
        if !instr.opcode.is_memory() {
            entry.state = RobState::Completed;
        }
    }
}
