/// Test bench wrapping the `Simulator` facade.
pub mod harness;
