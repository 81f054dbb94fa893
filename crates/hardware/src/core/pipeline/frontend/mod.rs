//! Front-end pipeline stages.
//!
//! Fetch1 → Fetch2 → Decode/Rename1 → Rename2/Dispatch. Structural hazards
//! propagate backwards naturally: a stage that cannot move its instruction
//! forward leaves its input latch occupied and the stages behind it stall.

/// Rename2/Dispatch: ROB/LSQ/BIS allocation, source capture, RS insert.
pub mod dispatch;

/// Fetch1: PC update and branch prediction.
pub mod fetch1;

/// Fetch2: latch transfer.
pub mod fetch2;

/// Decode/Rename1: physical destination allocation, JUMP fetch gate.
pub mod rename1;
