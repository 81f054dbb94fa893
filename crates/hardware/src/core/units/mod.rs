//! Execution units and predictors.
//!
//! 1. **ALU:** integer arithmetic/logic evaluation and flag generation,
//!    shared by the integer and multiply units.
//! 2. **BRU predictors:** BTB, CTP and RAP used by speculative fetch.

/// Integer arithmetic, flag generation, and branch condition evaluation.
pub mod alu;

/// Branch-resolution unit predictors (BTB, CTP, RAP).
pub mod bru;
