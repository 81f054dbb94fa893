//! Commit stage: in-order retirement from the ROB head.
//!
//! At most one instruction retires per cycle, and only when the head has
//! completed. Retirement makes the result architectural: the ARF takes the
//! physical register's value, the displaced mapping returns to its free
//! list, and a branch releases its BIS snapshot. HALT retires by clearing
//! the ROB and halting the simulation.

use crate::core::Cpu;
use crate::core::pipeline::rob::RobState;
use crate::isa::Opcode;

/// Executes the Commit stage.
pub fn commit_stage(cpu: &mut Cpu) {
    let Some(head) = cpu.rob.peek_head() else {
        return;
    };
    if head.state != RobState::Completed {
        return;
    }

    if head.instr.opcode == Opcode::Halt {
        cpu.retired += 1;
        cpu.halted = true;
        cpu.rob.clear();
        tracing::info!(
            retired = cpu.retired,
            cycle = cpu.clock,
            "HALT committed, simulation halted"
        );
        return;
    }

    let Some(entry) = cpu.rob.retire_head() else {
        return;
    };

    if let (Some(rd), Some(tag)) = (entry.arch_rd, entry.phys_rd) {
        cpu.arf.write(rd, cpu.prf.get(tag.0).value);
        if let Some(old) = entry.old_phys_rd {
            cpu.prf.release(old.0);
            cpu.free_gpr.push(old.0);
        }
    }
    if entry.writes_cc && let Some(old) = entry.old_phys_cc {
        cpu.cprf.release(old.0);
        cpu.free_cc.push(old.0);
    }
    if entry.is_branch {
        cpu.bis.retire_head();
    }

    cpu.retired += 1;
    tracing::trace!(pc = entry.instr.pc, op = %entry.instr.opcode, "commit");
}
