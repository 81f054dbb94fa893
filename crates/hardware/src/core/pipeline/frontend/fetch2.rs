//! Fetch2 stage: forwards the Fetch1 latch toward decode.

use crate::core::Cpu;

/// Executes the Fetch2 stage. Stalls when its own output latch is still
/// occupied, which backpressures Fetch1.
pub fn fetch2_stage(cpu: &mut Cpu) {
    if cpu.fetch1_latch.is_none() {
        return;
    }
    if cpu.fetch2_latch.is_some() {
        cpu.stalled_this_cycle = true;
        return;
    }
    cpu.fetch2_latch = cpu.fetch1_latch.take();
}
