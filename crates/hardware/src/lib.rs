//! APEX out-of-order pipeline simulator library.
//!
//! This crate implements a cycle-accurate functional simulator of a small
//! out-of-order superscalar processor ("APEX") with the following:
//! 1. **Core:** 9-stage pipeline (Fetch1/2, Decode/Rename1, Rename2/Dispatch,
//!    Issue, IntFU, MulFU×3, MemFU×2, Commit) over a shared CPU record.
//! 2. **Rename machinery:** RAT, physical GPR/CC register files, free-list
//!    allocators, and per-branch snapshots (BIS) for precise recovery.
//! 3. **Backend:** reservation stations with data-capture wakeup, a reorder
//!    buffer with in-order retirement, and a load/store queue that serializes
//!    memory accesses in program order.
//! 4. **Prediction:** optional BTB (conditional branches), CTP (direct calls)
//!    and RAP (returns), with full misprediction rollback.
//! 5. **Simulation:** `Simulator` facade, assembly loader, state printer,
//!    configuration, and statistics.

/// Common types and constants (structure sizes, tags, error types).
pub mod common;
/// Simulator configuration (defaults, JSON deserialization).
pub mod config;
/// CPU core (architectural state, pipeline structures, stages, units).
pub mod core;
/// Instruction set (opcodes, instruction records, assembly parsing).
pub mod isa;
/// Simulation: `Simulator` facade, program loader, and state printer.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU record; holds every pipeline structure.
pub use crate::core::Cpu;
/// Top-level simulator; owns the CPU and the loaded program side-by-side.
pub use crate::sim::simulator::Simulator;
