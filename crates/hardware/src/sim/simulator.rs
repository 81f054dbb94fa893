//! The `Simulator` facade.
//!
//! Owns the CPU and a pristine copy of the loaded program, and exposes the
//! operations the external command loop drives: `initialize`, `step(n)`,
//! `set_memory`, and `display`. Re-initializing reloads the retained
//! program and preserves the configuration, so the same trace replays
//! bit-identically.

use std::path::Path;

use crate::common::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::pipeline;
use crate::isa::Instruction;
use crate::sim::{display, loader};

/// Top-level simulator: CPU state plus the loaded program.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated processor.
    pub cpu: Cpu,
    config: Config,
    program: Vec<Instruction>,
}

impl Simulator {
    /// Creates a simulator with an empty (all-NOP) program.
    pub fn new(config: Config) -> Self {
        Self {
            cpu: Cpu::new(&config),
            config,
            program: Vec::new(),
        }
    }

    /// Loads a parsed program into code memory, retaining it for
    /// re-initialization.
    pub fn load_program(&mut self, program: Vec<Instruction>) {
        self.cpu.load_program(&program);
        self.program = program;
    }

    /// Reads, parses and loads a program file.
    ///
    /// # Errors
    ///
    /// [`SimError::ProgramRead`] when the file cannot be read; the
    /// simulator keeps its current (possibly empty) program.
    pub fn load_program_file(&mut self, path: &Path) -> Result<(), SimError> {
        let program = loader::load_program(path)?;
        self.load_program(program);
        Ok(())
    }

    /// Resets the CPU to power-on state and reloads the retained program.
    pub fn initialize(&mut self) {
        self.cpu = Cpu::new(&self.config);
        self.cpu.load_program(&self.program);
    }

    /// Advances up to `cycles` cycles, stopping early when the simulation
    /// halts. Returns the number of cycles actually run.
    pub fn step(&mut self, cycles: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..cycles {
            pipeline::cycle(&mut self.cpu);
            ran += 1;
            if self.halted() {
                break;
            }
        }
        ran
    }

    /// Seeds one data memory word.
    pub fn set_memory(&mut self, address: i32, value: i32) {
        self.cpu.write_data(address, value);
    }

    /// Seeds data memory from an image file: consecutive integers starting
    /// at address 0. Returns how many words were written.
    ///
    /// # Errors
    ///
    /// [`SimError::MemoryImageRead`] when the file cannot be read.
    pub fn load_memory_file(&mut self, path: &Path) -> Result<usize, SimError> {
        let words = loader::load_memory_image(path)?;
        for (address, value) in words.iter().enumerate() {
            self.cpu.write_data(address as i32, *value);
        }
        Ok(words.len())
    }

    /// Renders the current state table.
    pub fn display(&self) -> String {
        display::render(&self.cpu)
    }

    /// True once HALT has committed or the cycle cap was reached.
    pub fn halted(&self) -> bool {
        self.cpu.halted
    }
}
