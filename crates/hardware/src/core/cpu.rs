//! The CPU record.
//!
//! All simulated state lives in this single aggregate: architectural and
//! physical registers, rename state, every queue and station, the predictor
//! tables, the inter-stage latches, and both memories. Stage functions take
//! it by mutable reference; there are no process-wide singletons, and the
//! cycle driver is the only writer.

use crate::common::constants::{
    CC_REG_COUNT, CODE_BASE_PC, CODE_MEMORY_SIZE, DATA_MEMORY_SIZE, INT_RS_SIZE, MAU_STAGES,
    MUL_RS_SIZE, MUL_STAGES, PC_STRIDE, PHYS_REG_COUNT,
};
use crate::config::Config;
use crate::core::arch::{ArchRegFile, FreeList, PhysRegFile, RenameTable};
use crate::core::pipeline::bis::BranchStack;
use crate::core::pipeline::forward::ForwardingBus;
use crate::core::pipeline::lsq::LoadStoreQueue;
use crate::core::pipeline::rob::ReorderBuffer;
use crate::core::pipeline::rs::ReservationStation;
use crate::core::units::bru::{Btb, Ctp, Rap};
use crate::isa::Instruction;
use crate::stats::SimStats;

/// The complete state of the simulated processor.
#[derive(Debug)]
pub struct Cpu {
    /// Next fetch address.
    pub pc: i32,
    /// Cycles simulated since reset.
    pub clock: u64,
    /// Set when HALT commits or the cycle cap is hit.
    pub halted: bool,
    /// Instructions retired since reset.
    pub retired: u64,
    /// Speculative front end (BTB/CTP/RAP) active.
    pub predictor_enabled: bool,
    /// Hard cap on simulated cycles.
    pub max_cycles: u64,

    /// Committed architectural register file.
    pub arf: ArchRegFile,
    /// Register alias table (GPR and CC mappings).
    pub rat: RenameTable,
    /// Physical general-purpose register file.
    pub prf: PhysRegFile,
    /// Physical condition-code register file.
    pub cprf: PhysRegFile,
    /// Free PRF indices.
    pub free_gpr: FreeList,
    /// Free CPRF indices.
    pub free_cc: FreeList,

    /// Reorder buffer; owns every in-flight instruction record.
    pub rob: ReorderBuffer,
    /// Integer reservation station (also address generation for memory ops).
    pub int_rs: ReservationStation,
    /// Multiply reservation station.
    pub mul_rs: ReservationStation,
    /// Load/store queue.
    pub lsq: LoadStoreQueue,
    /// Branch information stack.
    pub bis: BranchStack,

    /// Branch target buffer.
    pub btb: Btb,
    /// Call target predictor.
    pub ctp: Ctp,
    /// Return address predictor.
    pub rap: Rap,

    /// Fetch1 output latch.
    pub fetch1_latch: Option<Instruction>,
    /// Fetch2 output latch.
    pub fetch2_latch: Option<Instruction>,
    /// Decode/Rename1 output latch, consumed by dispatch.
    pub dispatch_latch: Option<Instruction>,
    /// Integer FU input latch (ROB index).
    pub int_fu_latch: Option<usize>,
    /// Multiply FU input latch (ROB index).
    pub mul_fu_latch: Option<usize>,
    /// Multiply pipeline stages, oldest at the highest index.
    pub mul_pipeline: [Option<usize>; MUL_STAGES],
    /// Memory access unit stages, oldest at the highest index.
    pub mau_pipeline: [Option<usize>; MAU_STAGES],

    /// Code memory; NOP-filled beyond the loaded program.
    pub code: Vec<Instruction>,
    /// Word-addressable data memory.
    pub data: Vec<i32>,

    /// Per-cycle forwarding broadcasts.
    pub forwarding: ForwardingBus,

    /// The front end is blocked behind an unresolved JUMP.
    pub fetch_stalled: bool,
    /// Monotonic dispatch sequence; supplies oldest-first issue priority.
    pub dispatch_seq: u64,
    /// A flush happened this cycle (display flag).
    pub flushed_this_cycle: bool,
    /// A stage stalled this cycle (display flag).
    pub stalled_this_cycle: bool,

    /// Ambient run statistics.
    pub stats: SimStats,
}

impl Cpu {
    /// Creates a CPU at reset state under `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            pc: CODE_BASE_PC,
            clock: 0,
            halted: false,
            retired: 0,
            predictor_enabled: config.predictor_enabled,
            max_cycles: config.max_cycles,
            arf: ArchRegFile::default(),
            rat: RenameTable::default(),
            prf: PhysRegFile::new(PHYS_REG_COUNT),
            cprf: PhysRegFile::new(CC_REG_COUNT),
            free_gpr: FreeList::full(PHYS_REG_COUNT),
            free_cc: FreeList::full(CC_REG_COUNT),
            rob: ReorderBuffer::new(),
            int_rs: ReservationStation::new(INT_RS_SIZE),
            mul_rs: ReservationStation::new(MUL_RS_SIZE),
            lsq: LoadStoreQueue::new(),
            bis: BranchStack::new(),
            btb: Btb::new(),
            ctp: Ctp::new(),
            rap: Rap::new(),
            fetch1_latch: None,
            fetch2_latch: None,
            dispatch_latch: None,
            int_fu_latch: None,
            mul_fu_latch: None,
            mul_pipeline: [None; MUL_STAGES],
            mau_pipeline: [None; MAU_STAGES],
            code: (0..CODE_MEMORY_SIZE)
                .map(|i| Instruction::nop(CODE_BASE_PC + PC_STRIDE * i as i32))
                .collect(),
            data: vec![0; DATA_MEMORY_SIZE],
            forwarding: ForwardingBus::default(),
            fetch_stalled: false,
            dispatch_seq: 0,
            flushed_this_cycle: false,
            stalled_this_cycle: false,
            stats: SimStats::default(),
        }
    }

    /// Loads a parsed program into code memory starting at the base PC.
    /// Slots beyond the program stay NOP.
    pub fn load_program(&mut self, program: &[Instruction]) {
        for (i, instr) in program.iter().take(CODE_MEMORY_SIZE).enumerate() {
            self.code[i] = instr.clone();
        }
    }

    /// Fetches the instruction at `pc`; out-of-range addresses yield NOP.
    pub fn code_at(&self, pc: i32) -> Instruction {
        let offset = pc - CODE_BASE_PC;
        if offset < 0 || offset % PC_STRIDE != 0 {
            return Instruction::nop(pc);
        }
        let index = (offset / PC_STRIDE) as usize;
        self.code
            .get(index)
            .cloned()
            .unwrap_or_else(|| Instruction::nop(pc))
    }

    /// Wraps a data address into the finite memory array.
    pub fn data_index(address: i32) -> usize {
        address.rem_euclid(DATA_MEMORY_SIZE as i32) as usize
    }

    /// Reads the data memory word at `address`.
    pub fn read_data(&self, address: i32) -> i32 {
        self.data[Self::data_index(address)]
    }

    /// Writes the data memory word at `address`.
    pub fn write_data(&mut self, address: i32, value: i32) {
        self.data[Self::data_index(address)] = value;
    }

    /// Architectural register read (committed state).
    pub fn arch_reg(&self, index: usize) -> i32 {
        self.arf.read(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::Opcode;

    #[test]
    fn reset_state() {
        let cpu = Cpu::new(&Config::default());
        assert_eq!(cpu.pc, CODE_BASE_PC);
        assert_eq!(cpu.clock, 0);
        assert!(!cpu.halted);
        assert_eq!(cpu.free_gpr.len(), PHYS_REG_COUNT);
        assert_eq!(cpu.free_cc.len(), CC_REG_COUNT);
        assert_eq!(cpu.code.len(), CODE_MEMORY_SIZE);
        assert_eq!(cpu.code[0].opcode, Opcode::Nop);
    }

    #[test]
    fn code_at_maps_pcs() {
        let mut cpu = Cpu::new(&Config::default());
        let mut program = vec![Instruction::new(Opcode::Movc, CODE_BASE_PC)];
        program[0].rd = Some(1);
        cpu.load_program(&program);

        assert_eq!(cpu.code_at(CODE_BASE_PC).opcode, Opcode::Movc);
        assert_eq!(cpu.code_at(CODE_BASE_PC + 4).opcode, Opcode::Nop);
        assert_eq!(cpu.code_at(0).opcode, Opcode::Nop);
        assert_eq!(cpu.code_at(CODE_BASE_PC - 4).opcode, Opcode::Nop);
    }

    #[test]
    fn data_addresses_wrap() {
        let mut cpu = Cpu::new(&Config::default());
        cpu.write_data(4, 42);
        assert_eq!(cpu.read_data(4), 42);
        assert_eq!(cpu.read_data(4 + DATA_MEMORY_SIZE as i32), 42);
        assert_eq!(Cpu::data_index(-1), DATA_MEMORY_SIZE - 1);
    }
}
