//! Misprediction recovery and predictor equivalence.
//!
//! Prediction is a pure performance feature: with and without it, the same
//! program must commit the same architectural state and retire the same
//! number of instructions. Cycle counts are allowed to differ.

use crate::common::harness::TestBench;
use pretty_assertions::assert_eq;

const COUNTDOWN_LOOP: &str = "MOVC R1,3\n\
                              SUBL R1,R1,#1\n\
                              BNZ #-4\n\
                              HALT\n";

// A counted loop with a subroutine call in the body: exercises BTB
// training on the backward branch, CTP training on the repeated call
// site, and the RAP on every return.
const CALL_LOOP: &str = "MOVC R1,2\n\
                         JAL R5,#4024\n\
                         SUBL R1,R1,#1\n\
                         BNZ #-8\n\
                         HALT\n\
                         NOP\n\
                         ADDL R2,R2,#10\n\
                         RET R5\n";

#[test]
fn trained_branch_mispredicts_then_recovers() {
    // The loop branch is taken twice, which trains the BTB past the
    // predict-taken threshold; the final fall-through therefore
    // mispredicts and must unwind the speculated third iteration.
    let mut bench = TestBench::with_predictor(COUNTDOWN_LOOP);
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(1), 0);
    assert_eq!(bench.retired(), 8);
    assert!(
        bench.sim.cpu.stats.mispredictions >= 1,
        "the fall-through must have mispredicted"
    );
    assert!(bench.sim.cpu.stats.btb_hits >= 1);
}

#[test]
fn predictor_state_is_invisible_to_architecture() {
    let mut plain = TestBench::new(COUNTDOWN_LOOP);
    let mut predicted = TestBench::with_predictor(COUNTDOWN_LOOP);
    plain.run_to_halt();
    predicted.run_to_halt();

    for reg in 0..8 {
        assert_eq!(plain.arf(reg), predicted.arf(reg), "R{reg} diverged");
    }
    assert_eq!(plain.retired(), predicted.retired());
}

#[test]
fn call_loop_is_equivalent_with_and_without_prediction() {
    let mut plain = TestBench::new(CALL_LOOP);
    let mut predicted = TestBench::with_predictor(CALL_LOOP);
    plain.run_to_halt();
    predicted.run_to_halt();

    assert!(plain.halted_cleanly());
    assert!(predicted.halted_cleanly());
    assert_eq!(plain.arf(2), 20, "subroutine body ran exactly twice");
    for reg in 0..8 {
        assert_eq!(plain.arf(reg), predicted.arf(reg), "R{reg} diverged");
    }
    assert_eq!(plain.retired(), predicted.retired());
    assert!(
        predicted.sim.cpu.stats.ctp_hits >= 1,
        "the second call must hit the trained CTP"
    );
}

#[test]
fn recovery_restores_the_rename_snapshot() {
    // A branch that skips a writer of R3: the wrong-path write must leave
    // no trace in the committed state, and R3's mapping must fall back to
    // the ARF.
    let mut bench = TestBench::new(
        "MOVC R3,1\n\
         MOVC R1,1\n\
         MOVC R2,2\n\
         CMP R1,R2\n\
         BNZ #8\n\
         MOVC R3,99\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(3), 1, "speculated write rolled back");
}

#[test]
fn nested_speculation_unwinds_to_the_oldest_offender() {
    // Two dependent taken branches in a row (predictors off, so each
    // resolves as a misprediction): both shadows must stay uncommitted.
    let mut bench = TestBench::new(
        "MOVC R1,1\n\
         MOVC R2,2\n\
         CMP R1,R2\n\
         BNZ #8\n\
         MOVC R4,1\n\
         CMP R1,R2\n\
         BNZ #8\n\
         MOVC R5,1\n\
         MOVC R6,6\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert_eq!(bench.arf(4), 0);
    assert_eq!(bench.arf(5), 0);
    assert_eq!(bench.arf(6), 6);
}
