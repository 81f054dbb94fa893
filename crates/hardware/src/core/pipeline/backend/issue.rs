//! Issue stage: wakeup/select.
//!
//! For each idle functional-unit input latch, selects the oldest ready
//! entry (smallest dispatch timestamp) from the matching reservation
//! station. An integer entry is ready when both source ready bits are set
//! and, for flag consumers, the captured flags are ready — the scan also
//! opportunistically snapshots the CPRF for flag consumers whose producer
//! has already written back. Source values are re-read from the PRF at
//! selection time; wakeup guarantees they are valid by then.

use crate::core::Cpu;
use crate::isa::Opcode;

/// Executes the Issue stage for both functional units.
pub fn issue_stage(cpu: &mut Cpu) {
    if cpu.int_fu_latch.is_none() {
        cpu.int_fu_latch = select_integer(cpu);
    }
    if cpu.mul_fu_latch.is_none() {
        cpu.mul_fu_latch = select_multiply(cpu);
    }
}

/// Selects from the integer station; returns the chosen ROB index.
fn select_integer(cpu: &mut Cpu) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;

    for slot in 0..cpu.int_rs.capacity() {
        let Some(entry) = cpu.int_rs.get(slot) else {
            continue;
        };
        let Some(rob_entry) = cpu.rob.entry(entry.rob_index) else {
            continue;
        };
        let opcode = rob_entry.instr.opcode;
        if opcode == Opcode::Invalid {
            continue;
        }
        if !rob_entry.instr.rs1_ready || !rob_entry.instr.rs2_ready {
            continue;
        }

        // Late flag capture: the CC producer may have written back after
        // this entry was dispatched.
        if opcode.reads_flags() && !rob_entry.instr.flags_ready {
            let source = rob_entry.instr.phys_src_cc;
            if let Some(cc) = source {
                let reg = cpu.cprf.get(cc.0);
                if reg.valid
                    && let Some(e) = cpu.rob.entry_mut(entry.rob_index)
                {
                    e.instr.flags_value = reg.value as u8;
                    e.instr.flags_ready = true;
                }
            }
        }

        let Some(rob_entry) = cpu.rob.entry(entry.rob_index) else {
            continue;
        };
        if opcode.reads_flags() && !rob_entry.instr.flags_ready {
            continue;
        }

        if best.is_none_or(|(_, t)| entry.dispatch_time < t) {
            best = Some((slot, entry.dispatch_time));
        }
    }

    let (slot, _) = best?;
    let entry = cpu.int_rs.take(slot)?;
    refresh_operands(cpu, entry.rob_index);
    Some(entry.rob_index)
}

/// Selects from the multiply station; returns the chosen ROB index.
fn select_multiply(cpu: &mut Cpu) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;

    for slot in 0..cpu.mul_rs.capacity() {
        let Some(entry) = cpu.mul_rs.get(slot) else {
            continue;
        };
        let ready = cpu
            .rob
            .entry(entry.rob_index)
            .is_some_and(|e| e.instr.rs1_ready && e.instr.rs2_ready);
        if ready && best.is_none_or(|(_, t)| entry.dispatch_time < t) {
            best = Some((slot, entry.dispatch_time));
        }
    }

    let (slot, _) = best?;
    let entry = cpu.mul_rs.take(slot)?;
    refresh_operands(cpu, entry.rob_index);
    Some(entry.rob_index)
}

/// Re-reads physical source values at selection time. Operands captured
/// from the ARF at dispatch (no tag) keep their captured value.
fn refresh_operands(cpu: &mut Cpu, rob_index: usize) {
    let (rs1, rs2) = match cpu.rob.entry(rob_index) {
        Some(e) => (e.instr.phys_rs1, e.instr.phys_rs2),
        None => return,
    };
    let rs1_value = rs1.map(|tag| cpu.prf.get(tag.0).value);
    let rs2_value = rs2.map(|tag| cpu.prf.get(tag.0).value);
    if let Some(entry) = cpu.rob.entry_mut(rob_index) {
        if let Some(value) = rs1_value {
            entry.instr.rs1_value = value;
        }
        if let Some(value) = rs2_value {
            entry.instr.rs2_value = value;
        }
    }
}
