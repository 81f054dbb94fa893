//! Straight-line arithmetic scenarios.

use crate::common::harness::TestBench;
use pretty_assertions::assert_eq;

#[test]
fn add_chain_commits_in_order() {
    let mut bench = TestBench::new(
        "MOVC R1,5\n\
         MOVC R2,7\n\
         ADD R3,R1,R2\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(1), 5);
    assert_eq!(bench.arf(2), 7);
    assert_eq!(bench.arf(3), 12);
    assert_eq!(bench.retired(), 4);
}

#[test]
fn logical_ops_and_immediates() {
    let mut bench = TestBench::new(
        "MOVC R1,12\n\
         MOVC R2,10\n\
         AND R3,R1,R2\n\
         OR R4,R1,R2\n\
         XOR R5,R1,R2\n\
         ADDL R6,R1,#-8\n\
         SUBL R7,R1,#20\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert_eq!(bench.arf(3), 8);
    assert_eq!(bench.arf(4), 14);
    assert_eq!(bench.arf(5), 6);
    assert_eq!(bench.arf(6), 4);
    assert_eq!(bench.arf(7), -8);
}

#[test]
fn multiply_uses_the_long_pipe() {
    let mut bench = TestBench::new(
        "MOVC R1,6\n\
         MOVC R2,-7\n\
         MUL R3,R1,R2\n\
         MUL R4,R3,R3\n\
         HALT\n",
    );
    bench.run_to_halt();

    assert!(bench.halted_cleanly());
    assert_eq!(bench.arf(3), -42);
    assert_eq!(bench.arf(4), 1764);
}

#[test]
fn dependent_chain_forwards_through_the_prf() {
    // Every instruction reads the previous result; correctness depends on
    // wakeup and capture, not on commit timing.
    let mut bench = TestBench::new(
        "MOVC R1,1\n\
         ADDL R1,R1,#2\n\
         ADDL R1,R1,#3\n\
         ADDL R1,R1,#4\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.arf(1), 10);
}

#[test]
fn nops_retire_without_side_effects() {
    let mut bench = TestBench::new(
        "NOP\n\
         MOVC R1,3\n\
         NOP\n\
         HALT\n",
    );
    bench.run_to_halt();
    assert_eq!(bench.arf(1), 3);
    assert_eq!(bench.retired(), 4);
}
