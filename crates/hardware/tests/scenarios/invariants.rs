//! Cross-cutting invariants and round-trips.

use crate::common::harness::TestBench;
use apex_core::common::constants::ROB_SIZE;
use pretty_assertions::assert_eq;

const STRAIGHT_LINE: &str = "MOVC R1,5\n\
                             MOVC R2,7\n\
                             ADD R3,R1,R2\n\
                             MUL R4,R3,R2\n\
                             SUBL R5,R4,#84\n\
                             AND R6,R3,R2\n\
                             XOR R7,R1,R2\n\
                             HALT\n";

#[test]
fn register_accounting_holds_every_cycle() {
    // Without speculation, every physical register is exactly one of
    // {free, allocated} at every cycle boundary.
    let mut bench = TestBench::new(STRAIGHT_LINE);
    while !bench.sim.halted() {
        let _ = bench.sim.step(1);
        bench.assert_register_accounting();
    }
    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(5), 0);
}

#[test]
fn rob_occupancy_never_exceeds_capacity() {
    let mut bench = TestBench::new(STRAIGHT_LINE);
    while !bench.sim.halted() {
        let _ = bench.sim.step(1);
        assert!(bench.sim.cpu.rob.len() <= ROB_SIZE);
    }
}

#[test]
fn initialize_replays_bit_identically() {
    let mut bench = TestBench::new(STRAIGHT_LINE);
    bench.run_to_halt();
    let first: Vec<i32> = (0..8).map(|r| bench.arf(r)).collect();
    let first_clock = bench.sim.cpu.clock;
    let first_retired = bench.retired();

    bench.sim.initialize();
    bench.run_to_halt();
    let second: Vec<i32> = (0..8).map(|r| bench.arf(r)).collect();

    assert_eq!(first, second);
    assert_eq!(first_clock, bench.sim.cpu.clock);
    assert_eq!(first_retired, bench.retired());
}

#[test]
fn predictors_are_inert_on_straight_line_code() {
    // On a branch-free program the predictor structures are never
    // consulted; the per-cycle architectural state must be identical.
    let mut plain = TestBench::new(STRAIGHT_LINE);
    let mut predicted = TestBench::with_predictor(STRAIGHT_LINE);

    while !plain.sim.halted() || !predicted.sim.halted() {
        let _ = plain.sim.step(1);
        let _ = predicted.sim.step(1);
        for reg in 0..8 {
            assert_eq!(
                plain.arf(reg),
                predicted.arf(reg),
                "R{reg} diverged at cycle {}",
                plain.sim.cpu.clock
            );
        }
    }
    assert_eq!(plain.sim.cpu.clock, predicted.sim.cpu.clock);
    assert_eq!(plain.retired(), predicted.retired());
}

#[test]
fn committed_state_matches_a_reference_interpreter() {
    // The committed prefix must equal straight interpretation of the
    // program: R3 = 5 + 7, R4 = 12 * 7, R5 = 84 - 84, R6 = 12 & 7,
    // R7 = 5 ^ 7.
    let mut bench = TestBench::new(STRAIGHT_LINE);
    bench.run_to_halt();

    assert_eq!(bench.arf(1), 5);
    assert_eq!(bench.arf(2), 7);
    assert_eq!(bench.arf(3), 12);
    assert_eq!(bench.arf(4), 84);
    assert_eq!(bench.arf(5), 0);
    assert_eq!(bench.arf(6), 4);
    assert_eq!(bench.arf(7), 2);
    assert_eq!(bench.retired(), 8);
}

#[test]
fn invalid_opcode_is_never_issued() {
    // A malformed line parses to INVALID, which dispatch accepts but issue
    // refuses; the program wedges and the cycle cap stops it, with nothing
    // after the invalid instruction committing.
    let mut bench = TestBench::new(
        "MOVC R1,5\n\
         FROB R2,R1\n\
         MOVC R3,7\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(!bench.halted_cleanly(), "run must end at the cycle cap");
    assert_eq!(bench.arf(1), 5, "instructions before INVALID commit");
    assert_eq!(bench.arf(3), 0, "instructions after INVALID never commit");
}
