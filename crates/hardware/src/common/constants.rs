//! Fixed hardware parameters of the simulated machine.
//!
//! Every structure in the pipeline has a hard capacity; these are properties
//! of the modeled microarchitecture, not tunables, so they live here as
//! constants rather than in [`crate::config::Config`].

/// Number of architectural general-purpose registers.
pub const ARCH_REG_COUNT: usize = 32;

/// Number of physical general-purpose registers.
pub const PHYS_REG_COUNT: usize = 42;

/// Number of physical condition-code registers.
pub const CC_REG_COUNT: usize = 28;

/// Reorder buffer capacity.
pub const ROB_SIZE: usize = 16;

/// Integer reservation station capacity.
pub const INT_RS_SIZE: usize = 8;

/// Multiply reservation station capacity.
pub const MUL_RS_SIZE: usize = 4;

/// Load/store queue capacity.
pub const LSQ_SIZE: usize = 6;

/// Branch information stack capacity (in-flight branch snapshots).
pub const BIS_SIZE: usize = 8;

/// Branch target buffer entries.
pub const BTB_SIZE: usize = 8;

/// Call target predictor entries.
pub const CTP_SIZE: usize = 4;

/// Return address predictor stack depth.
pub const RAP_DEPTH: usize = 16;

/// Depth of the multiply pipeline in cycles.
pub const MUL_STAGES: usize = 3;

/// Depth of the memory access unit pipeline in cycles.
pub const MAU_STAGES: usize = 2;

/// Per-cycle forwarding bus slots.
pub const FORWARD_BUS_SLOTS: usize = 16;

/// Code memory capacity in instructions.
pub const CODE_MEMORY_SIZE: usize = 1024;

/// Data memory capacity in words.
pub const DATA_MEMORY_SIZE: usize = 4096;

/// Base program counter of the first instruction.
pub const CODE_BASE_PC: i32 = 4000;

/// Program counter stride between consecutive instructions.
pub const PC_STRIDE: i32 = 4;

/// Zero flag bit in the 3-bit flags word.
pub const FLAG_ZERO: u8 = 1;

/// Positive flag bit in the 3-bit flags word.
pub const FLAG_POSITIVE: u8 = 2;

/// Negative flag bit in the 3-bit flags word.
pub const FLAG_NEGATIVE: u8 = 4;

/// Saturating 2-bit branch history ceiling.
pub const BTB_HISTORY_MAX: u8 = 3;

/// History threshold at or above which the BTB predicts taken.
pub const BTB_TAKEN_THRESHOLD: u8 = 2;
