//! Assembly program and memory image loading.
//!
//! Programs load at the base PC with a fixed stride; parsing is lenient
//! (see [`crate::isa::parse`]) so a bad line becomes an `INVALID` record
//! rather than a load failure. Memory images are plain text files of one
//! signed integer per line, seeded into data memory from address 0.

use std::fs;
use std::path::Path;

use crate::common::constants::{CODE_BASE_PC, PC_STRIDE};
use crate::common::SimError;
use crate::isa::Instruction;
use crate::isa::parse::parse_line;

/// Parses assembly source into instruction records at consecutive PCs.
pub fn parse_program(source: &str) -> Vec<Instruction> {
    let mut program = Vec::new();
    let mut pc = CODE_BASE_PC;
    for line in source.lines() {
        if let Some(instr) = parse_line(line, pc) {
            program.push(instr);
            pc += PC_STRIDE;
        }
    }
    program
}

/// Reads and parses an assembly program file.
///
/// # Errors
///
/// [`SimError::ProgramRead`] when the file cannot be read.
pub fn load_program(path: &Path) -> Result<Vec<Instruction>, SimError> {
    let source = fs::read_to_string(path).map_err(|source| SimError::ProgramRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_program(&source))
}

/// Reads a memory image: one signed integer per line, destined for
/// consecutive data memory words starting at address 0. Unparseable lines
/// are skipped.
///
/// # Errors
///
/// [`SimError::MemoryImageRead`] when the file cannot be read.
pub fn load_memory_image(path: &Path) -> Result<Vec<i32>, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::MemoryImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect())
}
