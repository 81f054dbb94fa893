//! Line-level assembly parsing.
//!
//! The program format is deliberately forgiving: tokens may be separated by
//! commas, spaces or tabs; `/` starts a comment; register operands are the
//! digit run inside a token like `R12`; immediates are signed decimal with
//! an optional `#` prefix. Anything that does not decode cleanly becomes an
//! [`Opcode::Invalid`] record rather than a parse error — the pipeline
//! refuses to issue such records, so malformed programs stall instead of
//! crashing the simulator.

use crate::isa::instruction::Instruction;
use crate::isa::opcode::Opcode;

/// Extracts a register index from a token such as `R12` or `r7`.
///
/// Collects the digit run anywhere in the token; returns `None` when the
/// token carries no digits.
fn parse_reg(token: Option<&str>) -> Option<usize> {
    let digits: String = token?.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Extracts a signed immediate from a token such as `#-12` or `42`.
///
/// Collects sign and digit characters; returns 0 for missing or digit-free
/// tokens, matching the lenient format.
fn parse_imm(token: Option<&str>) -> i32 {
    let Some(token) = token else { return 0 };
    let digits: String = token
        .chars()
        .filter(|c| *c == '-' || c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Parses one source line into an instruction at `pc`.
///
/// Returns `None` for blank and comment-only lines. Lines with an unknown
/// mnemonic parse to [`Opcode::Invalid`].
pub fn parse_line(line: &str, pc: i32) -> Option<Instruction> {
    let code = line.split('/').next().unwrap_or("");
    let mut parts = code.split([',', ' ', '\t']).filter(|t| !t.is_empty());

    let mnemonic = parts.next()?;
    let opcode = Opcode::from_mnemonic(mnemonic);
    let mut instr = Instruction::new(opcode, pc);

    match opcode {
        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::And | Opcode::Or | Opcode::Xor => {
            instr.rd = parse_reg(parts.next());
            instr.rs1 = parse_reg(parts.next());
            instr.rs2 = parse_reg(parts.next());
        }
        Opcode::Addl | Opcode::Subl | Opcode::Load => {
            instr.rd = parse_reg(parts.next());
            instr.rs1 = parse_reg(parts.next());
            instr.imm = parse_imm(parts.next());
        }
        Opcode::Store => {
            instr.rs1 = parse_reg(parts.next());
            instr.rs2 = parse_reg(parts.next());
            instr.imm = parse_imm(parts.next());
        }
        Opcode::Movc | Opcode::Jal | Opcode::Jalp => {
            instr.rd = parse_reg(parts.next());
            instr.imm = parse_imm(parts.next());
        }
        Opcode::Cmp => {
            instr.rs1 = parse_reg(parts.next());
            instr.rs2 = parse_reg(parts.next());
        }
        Opcode::Cml | Opcode::Jump => {
            instr.rs1 = parse_reg(parts.next());
            instr.imm = parse_imm(parts.next());
        }
        Opcode::Ret => {
            instr.rs1 = parse_reg(parts.next());
        }
        Opcode::Bz | Opcode::Bnz | Opcode::Bp | Opcode::Bn => {
            instr.imm = parse_imm(parts.next());
        }
        Opcode::Nop | Opcode::Halt | Opcode::Invalid => {}
    }

    Some(instr)
}
