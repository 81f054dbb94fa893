//! State printer.
//!
//! Renders the per-cycle microarchitectural state as the tabular text the
//! driver prints after each `simulate`/`display` command: cycle header,
//! stage contents (with prediction annotations), rename table, a partial
//! view of the ARF, busy reservation stations, the ROB from head to tail,
//! and — when the predictor is enabled — the RAP/BTB/CTP contents.

use std::fmt::Write as _;

use crate::common::constants::{LSQ_SIZE, ROB_SIZE};
use crate::core::Cpu;
use crate::core::pipeline::rob::RobState;
use crate::isa::Instruction;

const RULE: &str =
    "+-----------------------------------------------------------------------------+";

/// Renders the complete state table for `cpu`.
pub fn render(cpu: &Cpu) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "| Cycle: {:<4} | PC: {:<5} | Stalled: {} | Flushed: {} | ROB: {:2}/{} | LSQ: {}/{} |",
        cpu.clock,
        cpu.pc,
        if cpu.stalled_this_cycle { "YES" } else { "NO " },
        if cpu.flushed_this_cycle { "YES" } else { "NO " },
        cpu.rob.len(),
        ROB_SIZE,
        cpu.lsq.len(),
        LSQ_SIZE,
    );
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| STAGE   | INSTRUCTION                                                       |");
    let _ = writeln!(out, "{RULE}");

    stage_line(&mut out, "F1", cpu.fetch1_latch.as_ref());
    stage_line(&mut out, "F2", cpu.fetch2_latch.as_ref());
    stage_line(&mut out, "D1/RN", cpu.dispatch_latch.as_ref());
    stage_line(&mut out, "IntFU", rob_instr(cpu, cpu.int_fu_latch));
    for (i, slot) in cpu.mul_pipeline.iter().enumerate() {
        stage_line(&mut out, &format!("MulFU-{}", i + 1), rob_instr(cpu, *slot));
    }
    for (i, slot) in cpu.mau_pipeline.iter().enumerate() {
        stage_line(&mut out, &format!("MemFU-{}", i + 1), rob_instr(cpu, *slot));
    }

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| RENAME TABLE (RAT)                                                          |");
    let _ = writeln!(out, "{RULE}");
    render_rat(&mut out, cpu);

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| ARCHITECTURAL REGISTER FILE (ARF) - R0..R15                                 |");
    let _ = writeln!(out, "{RULE}");
    for row in 0..2 {
        let _ = write!(out, "| ");
        for reg in row * 8..row * 8 + 8 {
            let _ = write!(out, "R{:02}:{:<4} ", reg, cpu.arch_reg(reg));
        }
        let _ = writeln!(out, "|");
    }

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| RESERVATION STATIONS (Busy Entries)                                         |");
    let _ = writeln!(out, "{RULE}");
    render_stations(&mut out, cpu);

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "| REORDER BUFFER (Head -> Tail)                                               |");
    let _ = writeln!(out, "{RULE}");
    render_rob(&mut out, cpu);

    if cpu.predictor_enabled {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "| PREDICTOR STATE                                                             |");
        let _ = writeln!(out, "{RULE}");
        render_predictors(&mut out, cpu);
    }

    let _ = writeln!(out, "{RULE}");
    out
}

/// Resolves an execute-side slot (ROB index) to its instruction.
fn rob_instr(cpu: &Cpu, slot: Option<usize>) -> Option<&Instruction> {
    slot.and_then(|index| cpu.rob.entry(index)).map(|e| &e.instr)
}

fn stage_line(out: &mut String, name: &str, instr: Option<&Instruction>) {
    let text = instr.map_or_else(
        || "(Empty)".to_string(),
        |i| match i.prediction {
            Some(note) => format!("{i} {note}"),
            None => i.to_string(),
        },
    );
    let _ = writeln!(out, "| {name:<7} | {text:<65} |");
}

fn render_rat(out: &mut String, cpu: &Cpu) {
    let mappings: Vec<String> = cpu
        .rat
        .entries()
        .map(|(reg, tag)| match tag {
            Some(tag) => format!("R{reg:02}:{:<3}", tag.to_string()),
            None => format!("R{reg:02}:-  "),
        })
        .collect();
    for row in mappings.chunks(8) {
        let _ = writeln!(out, "| {} |", row.join(" "));
    }
    let cc = cpu
        .rat
        .cc
        .map_or_else(|| "-".to_string(), |tag| tag.to_string());
    let _ = writeln!(out, "| CC-RAT: {cc:<4}                                                                |");
}

fn render_stations(out: &mut String, cpu: &Cpu) {
    let mut printed = 0;
    for (label, station) in [("IntRS", &cpu.int_rs), ("MulRS", &cpu.mul_rs)] {
        for slot in 0..station.capacity() {
            let Some(entry) = station.get(slot) else {
                continue;
            };
            let Some(instr) = cpu.rob.entry(entry.rob_index).map(|e| &e.instr) else {
                continue;
            };
            let _ = writeln!(
                out,
                "| {label}[{slot}]: {:<5} (R1r:{} R2r:{}) -> ROB[{}]",
                instr.opcode.mnemonic(),
                u8::from(instr.rs1_ready),
                u8::from(instr.rs2_ready),
                entry.rob_index,
            );
            printed += 1;
        }
    }
    if printed == 0 {
        let _ = writeln!(out, "| (All RS Entries Empty)                                                      |");
    }
}

fn render_rob(out: &mut String, cpu: &Cpu) {
    if cpu.rob.is_empty() {
        let _ = writeln!(out, "| (Empty)                                                                     |");
        return;
    }
    for index in cpu.rob.live_indices() {
        let Some(entry) = cpu.rob.entry(index) else {
            continue;
        };
        let status = match entry.state {
            RobState::Executing => "EXE",
            RobState::Completed => "CMT",
        };
        let rd = entry
            .arch_rd
            .map_or_else(|| "-".to_string(), |r| format!("R{r}"));
        let phys = entry
            .phys_rd
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        let _ = writeln!(
            out,
            "| ROB[{index:2}]: {:<6} Status:{status} (ArchRd: {rd:<3} PhysRd: {phys:<3})",
            entry.instr.opcode.mnemonic(),
        );
    }
}

fn render_predictors(out: &mut String, cpu: &Cpu) {
    let rap: Vec<String> = cpu.rap.entries().map(|a| a.to_string()).collect();
    let _ = writeln!(out, "| RAP Stack: {}", rap.join(" "));
    let _ = writeln!(out, "| BTB Valid Entries:");
    for (pc, target, history) in cpu.btb.entries() {
        let _ = writeln!(out, "|  PC:{pc} -> Tgt:{target} (Hist:{history})");
    }
    let _ = writeln!(out, "| CTP Valid Entries:");
    for (pc, target) in cpu.ctp.entries() {
        let _ = writeln!(out, "|  PC:{pc} -> Tgt:{target}");
    }
}
