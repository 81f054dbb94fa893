//! Test bench wrapping the `Simulator` facade.

use apex_core::common::constants::{CC_REG_COUNT, PHYS_REG_COUNT};
use apex_core::config::Config;
use apex_core::sim::loader::parse_program;
use apex_core::{Cpu, Simulator};

/// A simulator plus assertions used across the scenario tests.
pub struct TestBench {
    pub sim: Simulator,
}

impl TestBench {
    /// Builds a bench running `source` with the predictors disabled.
    pub fn new(source: &str) -> Self {
        Self::with_config(source, Config::default())
    }

    /// Builds a bench running `source` with the predictors enabled.
    pub fn with_predictor(source: &str) -> Self {
        Self::with_config(
            source,
            Config {
                predictor_enabled: true,
                ..Config::default()
            },
        )
    }

    /// Builds a bench with an explicit configuration.
    pub fn with_config(source: &str, config: Config) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        let mut sim = Simulator::new(config);
        sim.load_program(parse_program(source));
        Self { sim }
    }

    /// Runs until the simulation halts (the cycle cap bounds every run).
    pub fn run_to_halt(&mut self) -> &mut Self {
        while !self.sim.halted() {
            let _ = self.sim.step(1);
        }
        self
    }

    /// Committed value of architectural register `index`.
    pub fn arf(&self, index: usize) -> i32 {
        self.sim.cpu.arch_reg(index)
    }

    /// Data memory word at `address`.
    pub fn mem(&self, address: i32) -> i32 {
        self.sim.cpu.read_data(address)
    }

    /// Instructions retired so far.
    pub fn retired(&self) -> u64 {
        self.sim.cpu.retired
    }

    /// True when the run ended by committing HALT rather than hitting the
    /// cycle cap.
    pub fn halted_cleanly(&self) -> bool {
        self.sim.halted() && self.sim.cpu.clock < self.sim.cpu.max_cycles
    }

    /// Asserts the free-list/physical-file accounting identity for both
    /// register files. Holds at every cycle boundary of a run without
    /// speculation (recovery restores the free lists from snapshots taken
    /// before intervening commits, so the identity is only checked on
    /// branch-free programs).
    pub fn assert_register_accounting(&self) {
        let cpu: &Cpu = &self.sim.cpu;
        assert_eq!(
            cpu.free_gpr.len() + cpu.prf.allocated_count(),
            PHYS_REG_COUNT,
            "PRF: every register is exactly one of free or allocated"
        );
        assert_eq!(
            cpu.free_cc.len() + cpu.cprf.allocated_count(),
            CC_REG_COUNT,
            "CPRF: every register is exactly one of free or allocated"
        );
        for index in cpu.free_gpr.iter() {
            assert!(
                !cpu.prf.get(index).allocated,
                "free PRF slot {index} must not be marked allocated"
            );
        }
        for index in cpu.free_cc.iter() {
            assert!(
                !cpu.cprf.get(index).allocated,
                "free CPRF slot {index} must not be marked allocated"
            );
        }
    }
}
