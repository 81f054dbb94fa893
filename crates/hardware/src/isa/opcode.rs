//! The APEX opcode set and its static properties.
//!
//! Beyond the variants themselves, this module is the decode table: each
//! predicate (`writes_flags`, `is_branch`, `reads_flags`, ...) answers a
//! question some pipeline stage asks, so the stages never match on raw
//! mnemonics.

use std::fmt;

/// An APEX opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `ADD rd, rs1, rs2` — register add; sets flags.
    Add,
    /// `SUB rd, rs1, rs2` — register subtract; sets flags.
    Sub,
    /// `MUL rd, rs1, rs2` — register multiply (3-cycle unit); sets flags.
    Mul,
    /// `AND rd, rs1, rs2` — bitwise and; sets flags.
    And,
    /// `OR rd, rs1, rs2` — bitwise or; does not set flags.
    Or,
    /// `XOR rd, rs1, rs2` — bitwise xor; does not set flags.
    Xor,
    /// `ADDL rd, rs1, imm` — add immediate; sets flags.
    Addl,
    /// `SUBL rd, rs1, imm` — subtract immediate; sets flags.
    Subl,
    /// `CML rs1, imm` — compare immediate; sets flags only.
    Cml,
    /// `CMP rs1, rs2` — compare registers; sets flags only.
    Cmp,
    /// `LOAD rd, rs1, imm` — `rd = M[rs1 + imm]`.
    Load,
    /// `STORE rs1, rs2, imm` — `M[rs2 + imm] = rs1`.
    Store,
    /// `MOVC rd, imm` — move constant; does not set flags.
    Movc,
    /// `JUMP rs1, imm` — unconditional register-indirect jump; never speculated.
    Jump,
    /// `JAL rd, imm` — call to absolute target; `rd = pc + 4`.
    Jal,
    /// `RET rs1` — return to the address in `rs1`.
    Ret,
    /// `JALP rd, imm` — PC-relative call; `rd = pc + 4`.
    Jalp,
    /// `BZ imm` — branch if the zero flag is set.
    Bz,
    /// `BNZ imm` — branch if the zero flag is clear.
    Bnz,
    /// `BP imm` — branch if the positive flag is set.
    Bp,
    /// `BN imm` — branch if the negative flag is set.
    Bn,
    /// `NOP` — no operation.
    Nop,
    /// `HALT` — stop the simulation when it commits.
    Halt,
    /// Unparseable instruction; stored in code memory but never issued.
    Invalid,
}

impl Opcode {
    /// Decodes a mnemonic. Unknown mnemonics become [`Opcode::Invalid`].
    pub fn from_mnemonic(text: &str) -> Self {
        match text {
            "ADD" => Self::Add,
            "SUB" => Self::Sub,
            "MUL" => Self::Mul,
            "AND" => Self::And,
            "OR" => Self::Or,
            "XOR" => Self::Xor,
            "ADDL" => Self::Addl,
            "SUBL" => Self::Subl,
            "CML" => Self::Cml,
            "CMP" => Self::Cmp,
            "LOAD" => Self::Load,
            "STORE" => Self::Store,
            "MOVC" => Self::Movc,
            "JUMP" => Self::Jump,
            "JAL" => Self::Jal,
            "RET" => Self::Ret,
            "JALP" => Self::Jalp,
            "BZ" => Self::Bz,
            "BNZ" => Self::Bnz,
            "BP" => Self::Bp,
            "BN" => Self::Bn,
            "NOP" => Self::Nop,
            "HALT" => Self::Halt,
            _ => Self::Invalid,
        }
    }

    /// The assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
            Self::Addl => "ADDL",
            Self::Subl => "SUBL",
            Self::Cml => "CML",
            Self::Cmp => "CMP",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Movc => "MOVC",
            Self::Jump => "JUMP",
            Self::Jal => "JAL",
            Self::Ret => "RET",
            Self::Jalp => "JALP",
            Self::Bz => "BZ",
            Self::Bnz => "BNZ",
            Self::Bp => "BP",
            Self::Bn => "BN",
            Self::Nop => "NOP",
            Self::Halt => "HALT",
            Self::Invalid => "INVALID",
        }
    }

    /// True when the opcode writes the condition-code register.
    ///
    /// OR and XOR do not set flags while AND does; the asymmetry is part of
    /// the modeled ISA.
    pub fn writes_flags(self) -> bool {
        matches!(
            self,
            Self::Add
                | Self::Sub
                | Self::And
                | Self::Mul
                | Self::Addl
                | Self::Subl
                | Self::Cmp
                | Self::Cml
        )
    }

    /// True for the branch category that takes a BIS snapshot at dispatch:
    /// conditional branches, direct calls and returns. JUMP is excluded —
    /// the front end stalls behind it, so nothing younger is ever renamed.
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Bz | Self::Bnz | Self::Bp | Self::Bn | Self::Jal | Self::Jalp | Self::Ret
        )
    }

    /// True for the conditional branches (flag-driven taken-ness).
    pub fn is_conditional(self) -> bool {
        matches!(self, Self::Bz | Self::Bnz | Self::Bp | Self::Bn)
    }

    /// True when the opcode consumes the condition-code register.
    pub fn reads_flags(self) -> bool {
        self.is_conditional()
    }

    /// True for opcodes that occupy a load/store queue slot.
    pub fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_round_trip() {
        for op in [
            Opcode::Add,
            Opcode::Store,
            Opcode::Jalp,
            Opcode::Bnz,
            Opcode::Halt,
        ] {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), op);
        }
    }

    #[test]
    fn unknown_mnemonic_is_invalid() {
        assert_eq!(Opcode::from_mnemonic("FROB"), Opcode::Invalid);
        assert_eq!(Opcode::from_mnemonic("add"), Opcode::Invalid);
    }

    #[test]
    fn flag_asymmetry() {
        assert!(Opcode::And.writes_flags());
        assert!(!Opcode::Or.writes_flags());
        assert!(!Opcode::Xor.writes_flags());
        assert!(!Opcode::Movc.writes_flags());
    }

    #[test]
    fn jump_is_not_branch_category() {
        assert!(!Opcode::Jump.is_branch());
        assert!(Opcode::Jal.is_branch());
        assert!(Opcode::Ret.is_branch());
        assert!(Opcode::Bz.is_branch());
    }
}
