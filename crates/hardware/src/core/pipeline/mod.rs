//! Pipeline structures and stage implementations.
//!
//! One call to [`cycle`] advances every stage exactly once, in reverse
//! pipeline order (commit side first, fetch side last). The reverse
//! traversal gives the one-cycle producer→consumer latency without
//! double-buffered latches: each stage reads the latch its predecessor
//! wrote on the *previous* cycle.

/// Branch information stack.
pub mod bis;

/// Per-cycle forwarding bus.
pub mod forward;

/// Load/store queue.
pub mod lsq;

/// Reorder buffer.
pub mod rob;

/// Reservation stations.
pub mod rs;

/// Front-end stages: fetch, decode/rename, dispatch.
pub mod frontend;

/// Back-end stages: issue, execution units, commit, recovery.
pub mod backend;

use crate::core::Cpu;

/// Advances the machine by one cycle.
///
/// Ordering guarantees (end of every cycle): ARF writes are in program
/// order; memory accesses are in program order; forwarded values reach the
/// reservation stations the cycle after writeback; a mispredicting branch
/// has invalidated all younger work before the cycle ends.
pub fn cycle(cpu: &mut Cpu) {
    if cpu.clock >= cpu.max_cycles {
        tracing::info!(cycles = cpu.clock, "cycle cap reached, force stopping");
        cpu.halted = true;
        return;
    }
    if cpu.halted && cpu.rob.is_empty() {
        return;
    }

    cpu.flushed_this_cycle = false;
    cpu.stalled_this_cycle = false;

    forward::apply(cpu);
    backend::commit::commit_stage(cpu);
    backend::mem_fu::memory_stage(cpu);
    backend::mul_fu::multiply_stage(cpu);
    backend::int_fu::integer_stage(cpu);
    backend::issue::issue_stage(cpu);
    frontend::dispatch::dispatch_stage(cpu);
    frontend::rename1::rename_stage(cpu);
    frontend::fetch2::fetch2_stage(cpu);
    frontend::fetch1::fetch1_stage(cpu);

    cpu.clock += 1;
}
