//! Register alias table.
//!
//! Maps each architectural register — and the single architectural
//! condition-code register — to the physical register holding its most
//! recent renamed value. `None` means the committed value in the ARF is
//! current. Overwritten in place at rename; the displaced mapping is
//! preserved in the ROB entry for reclamation at commit, and full copies of
//! the table are captured in branch snapshots for recovery.

use crate::common::constants::ARCH_REG_COUNT;
use crate::common::{CcTag, PhysTag};

/// Architectural→physical register mapping.
#[derive(Clone, Debug)]
pub struct RenameTable {
    gpr: [Option<PhysTag>; ARCH_REG_COUNT],
    /// Mapping for the condition-code register.
    pub cc: Option<CcTag>,
}

impl Default for RenameTable {
    fn default() -> Self {
        Self {
            gpr: [None; ARCH_REG_COUNT],
            cc: None,
        }
    }
}

impl RenameTable {
    /// Current mapping for architectural register `index`.
    pub fn gpr(&self, index: usize) -> Option<PhysTag> {
        self.gpr.get(index).copied().flatten()
    }

    /// Points architectural register `index` at a new physical register.
    pub fn set_gpr(&mut self, index: usize, tag: PhysTag) {
        if let Some(slot) = self.gpr.get_mut(index) {
            *slot = Some(tag);
        }
    }

    /// Iterates `(arch_index, mapping)` pairs for display and invariants.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Option<PhysTag>)> + '_ {
        self.gpr.iter().copied().enumerate()
    }
}
