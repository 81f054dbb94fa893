//! Multiply functional unit (3-stage pipeline).
//!
//! Entries advance one position per cycle with no stalls; the final stage
//! computes the product, forwards the result and flags, and completes the
//! ROB entry.

use crate::core::Cpu;
use crate::core::pipeline::forward::ForwardTag;
use crate::core::pipeline::rob::RobState;
use crate::core::units::alu;

/// Advances the multiply pipeline and completes its output stage.
pub fn multiply_stage(cpu: &mut Cpu) {
    cpu.mul_pipeline[2] = cpu.mul_pipeline[1];
    cpu.mul_pipeline[1] = cpu.mul_pipeline[0];
    cpu.mul_pipeline[0] = cpu.mul_fu_latch.take();

    let Some(rob_index) = cpu.mul_pipeline[2] else {
        return;
    };
    let Some(entry) = cpu.rob.entry(rob_index) else {
        cpu.mul_pipeline[2] = None;
        return;
    };

    let result = entry.instr.rs1_value.wrapping_mul(entry.instr.rs2_value);
    let phys_rd = entry.instr.phys_rd;
    let phys_cc = entry.instr.phys_cc;

    if let Some(tag) = phys_rd {
        cpu.forwarding.push(ForwardTag::Gpr(tag), result);
    }
    if let Some(cc) = phys_cc {
        cpu.forwarding
            .push(ForwardTag::Cc(cc), i32::from(alu::flags_for(result)));
    }
    if let Some(entry) = cpu.rob.entry_mut(rob_index) {
        entry.state = RobState::Completed;
    }
    cpu.mul_pipeline[2] = None;
}
