//! Instruction records carried through the pipeline.
//!
//! An [`Instruction`] starts life in code memory with only its static fields
//! filled in. As it moves through the front end it accumulates renamed
//! physical tags, captured operand values and structure indices; the record
//! itself is owned by its reorder buffer entry once dispatched, and every
//! other structure refers to it by ROB index.

use std::fmt;

use crate::common::{CcTag, PhysTag};
use crate::isa::opcode::Opcode;

/// How the front end annotated a control-flow instruction at fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictionNote {
    /// Call target predictor supplied a target.
    CtpHit {
        /// Predicted call target.
        target: i32,
    },
    /// Direct call with no CTP entry.
    CtpMiss,
    /// BTB entry found for a conditional branch.
    BtbHit {
        /// Recorded target address.
        target: i32,
        /// 2-bit saturating history at lookup time.
        history: u8,
    },
    /// Conditional branch with no BTB entry.
    BtbMiss,
    /// Return address popped from the RAP.
    RapHit {
        /// Predicted return target.
        target: i32,
    },
    /// Return with an empty RAP.
    RapMiss,
}

impl fmt::Display for PredictionNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CtpHit { target } => write!(f, "[CTP HIT: Tgt={target}]"),
            Self::CtpMiss => write!(f, "[CTP MISS]"),
            Self::BtbHit { target, history } => {
                write!(f, "[BTB HIT: Tgt={target} Hist={history}]")
            }
            Self::BtbMiss => write!(f, "[BTB MISS]"),
            Self::RapHit { target } => write!(f, "[RAP HIT: Tgt={target}]"),
            Self::RapMiss => write!(f, "[RAP MISS]"),
        }
    }
}

/// One instruction, static through runtime state.
#[derive(Clone, Debug)]
pub struct Instruction {
    /// Decoded opcode.
    pub opcode: Opcode,
    /// Program counter this instruction was fetched from.
    pub pc: i32,
    /// Architectural destination register, if the opcode writes one.
    pub rd: Option<usize>,
    /// First architectural source register.
    pub rs1: Option<usize>,
    /// Second architectural source register.
    pub rs2: Option<usize>,
    /// Sign-extended immediate operand.
    pub imm: i32,

    /// Renamed physical destination.
    pub phys_rd: Option<PhysTag>,
    /// Renamed first source tag (`None` when read from the ARF at dispatch).
    pub phys_rs1: Option<PhysTag>,
    /// Renamed second source tag.
    pub phys_rs2: Option<PhysTag>,
    /// Physical CC register written, for flag-setting opcodes.
    pub phys_cc: Option<CcTag>,
    /// Physical CC register read, for flag-consuming opcodes.
    pub phys_src_cc: Option<CcTag>,

    /// Captured first source value.
    pub rs1_value: i32,
    /// First source value is available.
    pub rs1_ready: bool,
    /// Captured second source value.
    pub rs2_value: i32,
    /// Second source value is available.
    pub rs2_ready: bool,
    /// Captured flags word.
    pub flags_value: u8,
    /// Flags word is available.
    pub flags_ready: bool,

    /// Load/store queue slot, for memory opcodes.
    pub lsq_index: Option<usize>,
    /// Branch information stack slot, for branch-category opcodes.
    pub bis_index: Option<usize>,

    /// Effective address (memory ops) or resolved target (control flow).
    pub memory_address: i32,
    /// Front-end taken prediction for conditional branches.
    pub predicted_taken: bool,
    /// Front-end target prediction for control-flow opcodes.
    pub predicted_target: i32,
    /// Display annotation describing the predictor outcome at fetch.
    pub prediction: Option<PredictionNote>,
}

impl Instruction {
    /// Creates a blank instruction of the given opcode at `pc`. Operand
    /// fields start unused and all runtime state cleared.
    pub fn new(opcode: Opcode, pc: i32) -> Self {
        Self {
            opcode,
            pc,
            rd: None,
            rs1: None,
            rs2: None,
            imm: 0,
            phys_rd: None,
            phys_rs1: None,
            phys_rs2: None,
            phys_cc: None,
            phys_src_cc: None,
            rs1_value: 0,
            rs1_ready: false,
            rs2_value: 0,
            rs2_ready: false,
            flags_value: 0,
            flags_ready: false,
            lsq_index: None,
            bis_index: None,
            memory_address: 0,
            predicted_taken: false,
            predicted_target: 0,
            prediction: None,
        }
    }

    /// A NOP at `pc`; the fill value for unused code memory.
    pub fn nop(pc: i32) -> Self {
        Self::new(Opcode::Nop, pc)
    }
}

impl fmt::Display for Instruction {
    /// Renders the assembly-ish form used by the state printer,
    /// e.g. `ADD R3 R1 R2` or `BNZ #-4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        if let Some(rd) = self.rd {
            write!(f, " R{rd}")?;
        }
        if let Some(rs1) = self.rs1 {
            write!(f, " R{rs1}")?;
        }
        if let Some(rs2) = self.rs2 {
            write!(f, " R{rs2}")?;
        }
        if self.imm != 0 {
            write!(f, " #{}", self.imm)?;
        }
        Ok(())
    }
}
