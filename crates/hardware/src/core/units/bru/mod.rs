//! Branch-resolution unit predictors.
//!
//! Three structures back the speculative front end:
//! 1. **BTB** — conditional branch targets with 2-bit taken history.
//! 2. **CTP** — direct-call targets.
//! 3. **RAP** — a return address stack.
//!
//! All three are consulted at fetch and trained at execute; none of them is
//! snapshotted for recovery, so a squandered RAP pop on a misspeculated
//! return is not undone.

/// Branch target buffer.
pub mod btb;

/// Call target predictor.
pub mod ctp;

/// Return address predictor.
pub mod rap;

pub use btb::Btb;
pub use ctp::Ctp;
pub use rap::Rap;
