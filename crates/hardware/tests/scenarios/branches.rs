//! Conditional branch scenarios (predictors disabled: every branch is
//! predicted not-taken, so a taken branch exercises recovery).

use crate::common::harness::TestBench;
use pretty_assertions::assert_eq;

#[test]
fn branch_not_taken_falls_through() {
    // R1 == R2 sets Z, so BNZ falls through to the MOVC.
    let mut bench = TestBench::new(
        "MOVC R1,1\n\
         MOVC R2,1\n\
         CMP R1,R2\n\
         BNZ #8\n\
         MOVC R3,7\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(3), 7);
    assert_eq!(bench.retired(), 6);
}

#[test]
fn branch_taken_skips_the_shadow() {
    // R1 != R2 clears Z; BNZ #8 skips the MOVC R3 and lands on MOVC R4.
    let mut bench = TestBench::new(
        "MOVC R1,1\n\
         MOVC R2,2\n\
         CMP R1,R2\n\
         BNZ #8\n\
         MOVC R3,7\n\
         MOVC R4,9\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert_eq!(bench.arf(3), 0, "skipped instruction must not commit");
    assert_eq!(bench.arf(4), 9);
}

#[test]
fn bz_taken_on_zero() {
    let mut bench = TestBench::new(
        "MOVC R1,4\n\
         SUBL R2,R1,#4\n\
         BZ #8\n\
         MOVC R3,1\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.arf(3), 0);
    assert_eq!(bench.arf(2), 0);
}

#[test]
fn bp_and_bn_follow_the_sign_flags() {
    // CMP 5,3 leaves a positive result: BP taken (skips R3), BN not taken.
    let mut bench = TestBench::new(
        "MOVC R1,5\n\
         MOVC R2,3\n\
         CMP R1,R2\n\
         BP #8\n\
         MOVC R3,1\n\
         CMP R2,R1\n\
         BN #8\n\
         MOVC R4,1\n\
         MOVC R5,1\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.arf(3), 0, "BP was taken");
    assert_eq!(bench.arf(4), 0, "BN was taken");
    assert_eq!(bench.arf(5), 1);
}

#[test]
fn backward_branch_loop_counts_down() {
    let mut bench = TestBench::new(
        "MOVC R1,3\n\
         SUBL R1,R1,#1\n\
         BNZ #-4\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(1), 0);
    // One MOVC, three SUBL/BNZ pairs, one HALT.
    assert!(bench.retired() >= 8, "retired {}", bench.retired());
}
