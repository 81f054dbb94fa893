//! Fetch1 stage: PC update and branch prediction.
//!
//! Reads code memory at the current PC and places the instruction in the
//! Fetch1 latch. With the predictor enabled the stage consults, by opcode:
//! the CTP for direct calls, the BTB for conditional branches (predict
//! taken only at history ≥ threshold), and the RAP for returns (the pop
//! happens here, at prediction time). A predicted-taken control instruction
//! redirects the PC so the next fetch follows the predicted path.

use crate::common::constants::PC_STRIDE;
use crate::core::Cpu;
use crate::isa::{Opcode, PredictionNote};

/// Executes the Fetch1 stage.
pub fn fetch1_stage(cpu: &mut Cpu) {
    if cpu.fetch1_latch.is_some() || cpu.fetch_stalled {
        cpu.stalled_this_cycle = true;
        cpu.stats.fetch_stalls += 1;
        return;
    }
    if cpu.halted {
        return;
    }

    let mut instr = cpu.code_at(cpu.pc);

    if cpu.predictor_enabled {
        match instr.opcode {
            Opcode::Jal => {
                cpu.stats.ctp_lookups += 1;
                if let Some(target) = cpu.ctp.lookup(cpu.pc, cpu.clock) {
                    cpu.stats.ctp_hits += 1;
                    instr.prediction = Some(PredictionNote::CtpHit { target });
                    instr.predicted_target = target;
                    cpu.pc = target;
                    cpu.fetch1_latch = Some(instr);
                    return;
                }
                instr.prediction = Some(PredictionNote::CtpMiss);
            }
            Opcode::Bz | Opcode::Bnz | Opcode::Bp | Opcode::Bn => {
                cpu.stats.btb_lookups += 1;
                if let Some(prediction) = cpu.btb.lookup(cpu.pc, cpu.clock) {
                    cpu.stats.btb_hits += 1;
                    instr.prediction = Some(PredictionNote::BtbHit {
                        target: prediction.target,
                        history: prediction.history,
                    });
                    if prediction.taken() {
                        instr.predicted_taken = true;
                        instr.predicted_target = prediction.target;
                        cpu.pc = prediction.target;
                        cpu.fetch1_latch = Some(instr);
                        return;
                    }
                } else {
                    instr.prediction = Some(PredictionNote::BtbMiss);
                }
            }
            Opcode::Ret => {
                if let Some(target) = cpu.rap.pop() {
                    cpu.stats.rap_hits += 1;
                    instr.prediction = Some(PredictionNote::RapHit { target });
                    instr.predicted_target = target;
                    cpu.pc = target;
                    cpu.fetch1_latch = Some(instr);
                    return;
                }
                cpu.stats.rap_misses += 1;
                instr.prediction = Some(PredictionNote::RapMiss);
            }
            _ => {}
        }
    }

    tracing::trace!(pc = instr.pc, op = %instr.opcode, "fetch");
    cpu.fetch1_latch = Some(instr);
    cpu.pc += PC_STRIDE;
}
