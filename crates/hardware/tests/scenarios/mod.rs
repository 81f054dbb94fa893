/// Straight-line arithmetic and flag behaviour.
pub mod arithmetic;

/// Conditional branches, taken and not taken.
pub mod branches;

/// Calls, returns and unconditional jumps.
pub mod calls;

/// Cross-cutting invariants and round-trips.
pub mod invariants;

/// Loads and stores through the LSQ.
pub mod memory;

/// Misprediction recovery and predictor equivalence.
pub mod recovery;
