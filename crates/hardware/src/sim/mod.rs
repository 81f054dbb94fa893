//! Simulation layer: the driver facade, the program loader, and the state
//! printer. Everything the interactive command loop talks to lives here.

/// State printer: renders the per-cycle table.
pub mod display;

/// Assembly program and memory image loading.
pub mod loader;

/// The `Simulator` facade.
pub mod simulator;

pub use simulator::Simulator;
