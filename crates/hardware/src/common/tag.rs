//! Strong index types for physical registers.
//!
//! The rename machinery juggles indices into two distinct physical files
//! (general-purpose and condition-code). Newtype tags keep a GPR tag from
//! ever indexing the CC file and vice versa.

use std::fmt;

/// Index of a physical general-purpose register (a PRF slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhysTag(pub usize);

/// Index of a physical condition-code register (a CPRF slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CcTag(pub usize);

impl fmt::Display for PhysTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for CcTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}
